use std::path::PathBuf;

use clap::{builder::ValueParser, value_parser, Arg, Command};

/// Parse a decimal offset string into a number of seconds.
///
/// The value may be fractional. Negative, infinite, and not-a-number
/// offsets are rejected here so the user sees a domain error rather than
/// a garbage cue position later.
pub fn parse_offset(value: &str) -> Result<f64, String> {
    let offset: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid offset '{value}': expected a decimal number of seconds"))?;

    if !offset.is_finite() || offset < 0.0 {
        return Err(format!(
            "offset must be a non-negative number of seconds, got {offset}"
        ));
    }

    Ok(offset)
}

pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .about("Append cue-point and labeled-region metadata to a WAVE file")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("offset")
                .value_name("OFFSET_SECONDS")
                .help("Cue position in seconds from the start of the audio (e.g. 1.5)")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(ValueParser::new(parse_offset)),
        )
        .arg(
            Arg::new("input")
                .value_name("INPUT_WAV")
                .help("Path to the source WAVE file")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT_WAV")
                .help("Path of the augmented WAVE file to create")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
}
