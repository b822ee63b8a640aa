mod cli;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use wavecue_core::{run, Config};

use crate::cli::build_cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = build_cli().get_matches();

    let offset_seconds = *matches.get_one::<f64>("offset").expect("required argument");
    let input_path = matches
        .get_one::<PathBuf>("input")
        .expect("required argument");
    let output_path = matches
        .get_one::<PathBuf>("output")
        .expect("required argument");

    if !input_path.is_file() {
        return Err(anyhow!(
            "input file does not exist: {}",
            input_path.display()
        ));
    }

    let config = Config::new(offset_seconds, input_path, output_path).with_context(|| {
        format!(
            "failed to create configuration for '{}'",
            input_path.display()
        )
    })?;

    let summary = run(config)
        .with_context(|| format!("failed to write cue metadata for '{}'", input_path.display()))?;

    println!(
        "Wrote {}: cue at sample {}, region length {}",
        output_path.display(),
        summary.position,
        summary.region_length
    );

    Ok(())
}
