use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

mod markers;
mod riff;

pub use markers::{
    cue_position, region_length, CueChunk, CuePoint, LablChunk, ListChunk, LtxtChunk, NoteChunk,
};
pub use riff::{
    find_chunk, ChunkRegion, FmtChunk, FourCc, WavHeader, CHUNK_HEADER_LEN, DATA_TAG, FMT_TAG,
    RIFF_HEADER_LEN,
};

/// Errors that can occur while writing cue metadata into a WAVE file.
#[derive(Debug, Error)]
pub enum WaveCueError {
    /// Wrapper around IO errors encountered while reading or writing files.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Error returned when the requested offset is negative or not a number.
    #[error("offset must be a non-negative number of seconds, got {0}")]
    InvalidOffset(f64),

    /// Error returned when a required chunk is absent from the container.
    #[error("chunk '{0}' not found in container")]
    ChunkNotFound(FourCc),

    /// Error returned when a chunk header cannot be read in full.
    #[error("truncated chunk header at byte {offset}")]
    TruncatedHeader { offset: u64 },

    /// Error returned when the `fmt ` chunk is smaller than its fixed layout.
    #[error("fmt chunk holds {declared} bytes, expected at least {expected}")]
    MalformedFormatChunk { declared: u32, expected: u32 },
}

/// Configuration for one metadata-writing run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Time offset of the cue point, in seconds from the start of the audio.
    pub offset_seconds: f64,
    /// Canonicalized path of the source WAVE file.
    pub input_path: PathBuf,
    /// Path of the augmented WAVE file to create.
    pub output_path: PathBuf,
}

impl Config {
    /// Construct a new [`Config`], canonicalizing the input path and
    /// rejecting offsets that are negative or not finite.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        offset_seconds: f64,
        input: P,
        output: Q,
    ) -> Result<Self, WaveCueError> {
        if !offset_seconds.is_finite() || offset_seconds < 0.0 {
            return Err(WaveCueError::InvalidOffset(offset_seconds));
        }

        let input_path = fs::canonicalize(input)?;

        Ok(Self {
            offset_seconds,
            input_path,
            output_path: output.as_ref().to_path_buf(),
        })
    }
}

/// Outcome of a successful run.
#[derive(Clone, Copy, Debug)]
pub struct CueSummary {
    /// Interleaved-sample index of the emitted cue point.
    pub position: u32,
    /// Sample length recorded in the `ltxt` region descriptor.
    pub region_length: u32,
    /// Final byte length of the output file.
    pub output_len: u64,
}

/// Write the augmented WAVE file described by `config`.
///
/// The input container is scanned for its `fmt ` and `data` chunks, both
/// are copied to the output behind the original 12-byte prologue, and a
/// `cue ` chunk plus a `LIST`/`adtl` chunk (`ltxt`, `labl`, `note`) are
/// appended for a single marker at the requested offset. The RIFF size
/// field is finalized to the output length minus 8 once everything else
/// has been written. Chunks other than `fmt ` and `data` are not carried
/// over.
pub fn run(config: Config) -> Result<CueSummary, WaveCueError> {
    let mut input = File::open(&config.input_path)?;
    let container_len = input.metadata()?.len();

    let header = WavHeader::read_from(&mut input)?;

    let fmt_region = find_chunk(&mut input, FMT_TAG, container_len)?;
    let fmt = FmtChunk::read_at(&mut input, &fmt_region, container_len)?;

    let data_region = find_chunk(&mut input, DATA_TAG, container_len)?;

    let position = cue_position(config.offset_seconds, &fmt);
    let region_len = region_length(data_region.payload_len, position);

    let mut output = File::create(&config.output_path)?;
    header.write_to(&mut output)?;
    fmt.write_to(&mut output)?;

    let mut data = data_region.reader(&mut input, container_len)?;
    io::copy(&mut data, &mut output)?;

    CueChunk::single(CuePoint::for_data_position(position)).write_to(&mut output)?;
    ListChunk::adtl(position, region_len).write_to(&mut output)?;

    let output_len = output.stream_position()?;
    output.seek(SeekFrom::Start(0))?;
    let finalized = WavHeader {
        chunk_size: (output_len - 8) as u32,
        ..header
    };
    finalized.write_to(&mut output)?;

    info!(
        "wrote '{}': cue at sample {position}, region length {region_len}, {output_len} bytes",
        config.output_path.display()
    );

    Ok(CueSummary {
        position,
        region_length: region_len,
        output_len,
    })
}
