use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

/// Generate a small single-channel WAV file for testing.
///
/// The fixture is produced on the fly by emitting a PCM RIFF header
/// followed by a ramp of sample bytes, keeping the repository free from
/// committed binary assets.
fn write_test_wav<P: AsRef<Path>>(path: P, sample_rate: u32, data: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut file = File::create(path)?;
    let riff_size = 36 + data.len() as u32;
    file.write_all(b"RIFF")?;
    file.write_all(&riff_size.to_le_bytes())?;
    file.write_all(b"WAVE")?;
    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&1u16.to_le_bytes())?; // channels
    file.write_all(&sample_rate.to_le_bytes())?;
    file.write_all(&sample_rate.to_le_bytes())?; // byte rate, 8-bit mono
    file.write_all(&1u16.to_le_bytes())?; // block align
    file.write_all(&8u16.to_le_bytes())?; // bits per sample
    file.write_all(b"data")?;
    file.write_all(&(data.len() as u32).to_le_bytes())?;
    file.write_all(data)?;
    Ok(())
}

#[test]
fn cli_writes_cue_metadata() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let input_path = work_dir.path().join("input.wav");
    let output_path = work_dir.path().join("output.wav");

    let data: Vec<u8> = (0u8..100).collect();
    write_test_wav(&input_path, 100, &data)?;

    let mut cmd = Command::cargo_bin("wavecue")?;
    cmd.arg("0.5").arg(&input_path).arg(&output_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cue at sample 50, region length 49"));

    let bytes = fs::read(&output_path)?;
    assert_eq!(&bytes[..4], b"RIFF");
    assert_eq!(
        u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
        bytes.len() as u32 - 8
    );
    assert_eq!(&bytes[144..148], b"cue ");
    assert_eq!(&bytes[188..192], b"adtl");

    work_dir.close()?;
    Ok(())
}

#[test]
fn cli_rejects_non_numeric_offset() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("wavecue")?;
    cmd.args(["abc", "in.wav", "out.wav"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid offset 'abc'"));
    Ok(())
}

#[test]
fn cli_rejects_negative_offset() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("wavecue")?;
    cmd.args(["-1", "in.wav", "out.wav"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("non-negative number of seconds"));
    Ok(())
}

#[test]
fn cli_reports_missing_input_file() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let output_path = work_dir.path().join("output.wav");

    let mut cmd = Command::cargo_bin("wavecue")?;
    cmd.arg("0.5").arg("missing.wav").arg(&output_path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("input file does not exist"));

    work_dir.close()?;
    Ok(())
}

#[test]
fn cli_reports_missing_data_chunk() -> Result<(), Box<dyn Error>> {
    let work_dir = tempdir()?;
    let input_path = work_dir.path().join("no_data.wav");
    let output_path = work_dir.path().join("output.wav");

    let mut file = File::create(&input_path)?;
    file.write_all(b"RIFF")?;
    file.write_all(&28u32.to_le_bytes())?;
    file.write_all(b"WAVE")?;
    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&[0u8; 16])?;
    drop(file);

    let mut cmd = Command::cargo_bin("wavecue")?;
    cmd.arg("0.5").arg(&input_path).arg(&output_path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("chunk 'data' not found"));

    work_dir.close()?;
    Ok(())
}
