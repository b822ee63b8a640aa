use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Take, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::WaveCueError;

/// Width of the `RIFF`/size/`WAVE` prologue at the start of the container.
pub const RIFF_HEADER_LEN: u64 = 12;

/// Width of the universal tag + size prefix carried by every chunk.
pub const CHUNK_HEADER_LEN: u64 = 8;

pub const FMT_TAG: [u8; 4] = *b"fmt ";
pub const DATA_TAG: [u8; 4] = *b"data";

/// Serialized width of the `fmt ` descriptor fields, excluding the header.
pub const FMT_PAYLOAD_LEN: u32 = 16;

/// A four-character chunk tag with a human-readable rendering for
/// diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FourCc(pub [u8; 4]);

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// The 12-byte RIFF prologue. The tags are carried verbatim from the input
/// and are not validated; `chunk_size` is rewritten once the final output
/// length is known.
#[derive(Clone, Copy, Debug)]
pub struct WavHeader {
    pub tag: [u8; 4],
    pub chunk_size: u32,
    pub form_type: [u8; 4],
}

impl WavHeader {
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, WaveCueError> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag).map_err(|err| truncated(err, 0))?;
        let chunk_size = reader
            .read_u32::<LittleEndian>()
            .map_err(|err| truncated(err, 0))?;
        let mut form_type = [0u8; 4];
        reader
            .read_exact(&mut form_type)
            .map_err(|err| truncated(err, 0))?;

        Ok(Self {
            tag,
            chunk_size,
            form_type,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.tag)?;
        writer.write_u32::<LittleEndian>(self.chunk_size)?;
        writer.write_all(&self.form_type)?;
        Ok(())
    }
}

/// Decoded `fmt ` descriptor. Read-only input to the cue derivations; the
/// declared size is preserved so the chunk header round-trips unchanged.
#[derive(Clone, Copy, Debug)]
pub struct FmtChunk {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtChunk {
    /// Decode the descriptor found at `region`. Fails with
    /// [`WaveCueError::MalformedFormatChunk`] when either the declared size
    /// or the bytes remaining in the container fall short of the fixed
    /// 16-byte field block.
    pub fn read_at<R: Read + Seek>(
        source: &mut R,
        region: &ChunkRegion,
        container_len: u64,
    ) -> Result<Self, WaveCueError> {
        if region.payload_len < FMT_PAYLOAD_LEN {
            return Err(WaveCueError::MalformedFormatChunk {
                declared: region.payload_len,
                expected: FMT_PAYLOAD_LEN,
            });
        }

        let payload_start = region.offset + CHUNK_HEADER_LEN;
        let available = container_len.saturating_sub(payload_start);
        if available < u64::from(FMT_PAYLOAD_LEN) {
            return Err(WaveCueError::MalformedFormatChunk {
                declared: available as u32,
                expected: FMT_PAYLOAD_LEN,
            });
        }

        source.seek(SeekFrom::Start(payload_start))?;
        Ok(Self {
            chunk_size: region.payload_len,
            audio_format: source.read_u16::<LittleEndian>()?,
            channels: source.read_u16::<LittleEndian>()?,
            sample_rate: source.read_u32::<LittleEndian>()?,
            byte_rate: source.read_u32::<LittleEndian>()?,
            block_align: source.read_u16::<LittleEndian>()?,
            bits_per_sample: source.read_u16::<LittleEndian>()?,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&FMT_TAG)?;
        writer.write_u32::<LittleEndian>(self.chunk_size)?;
        writer.write_u16::<LittleEndian>(self.audio_format)?;
        writer.write_u16::<LittleEndian>(self.channels)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(self.byte_rate)?;
        writer.write_u16::<LittleEndian>(self.block_align)?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)?;
        Ok(())
    }
}

/// Bounded view over one chunk within the container, expressed as an index
/// range rather than an independent handle. `offset` addresses the chunk
/// header itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRegion {
    pub offset: u64,
    pub payload_len: u32,
}

impl ChunkRegion {
    /// Encoded length of the region: payload plus header plus the one-byte
    /// overshoot that lets the caller re-consume the chunk whole.
    pub fn encoded_len(&self) -> u64 {
        u64::from(self.payload_len) + CHUNK_HEADER_LEN + 1
    }

    /// Reader over the region, header included, clamped to the container
    /// bound so the view never yields bytes past end-of-container.
    pub fn reader<'a, R: Read + Seek>(
        &self,
        source: &'a mut R,
        container_len: u64,
    ) -> io::Result<Take<&'a mut R>> {
        source.seek(SeekFrom::Start(self.offset))?;
        let available = container_len.saturating_sub(self.offset);
        Ok(source.take(self.encoded_len().min(available)))
    }
}

/// Linear scan for the first chunk tagged `tag`, starting immediately after
/// the 12-byte prologue.
///
/// Chunks are identified by tag alone; payload bytes are skipped, not
/// inspected, and no alignment padding is applied. A declared size of zero
/// is legal and the scan continues directly past the header. Each call
/// re-scans from the top, which is O(n) but fine for the handful of
/// top-level chunks a WAVE container holds.
pub fn find_chunk<R: Read + Seek>(
    source: &mut R,
    tag: [u8; 4],
    container_len: u64,
) -> Result<ChunkRegion, WaveCueError> {
    let mut position = source.seek(SeekFrom::Start(RIFF_HEADER_LEN))?;

    loop {
        if position + CHUNK_HEADER_LEN > container_len {
            return Err(WaveCueError::ChunkNotFound(FourCc(tag)));
        }

        let mut id = [0u8; 4];
        source
            .read_exact(&mut id)
            .map_err(|err| truncated(err, position))?;
        let payload_len = source
            .read_u32::<LittleEndian>()
            .map_err(|err| truncated(err, position))?;

        if id == tag {
            log::debug!(
                "found chunk '{}' at byte {position} ({payload_len} payload bytes)",
                FourCc(tag)
            );
            return Ok(ChunkRegion {
                offset: position,
                payload_len,
            });
        }

        source.seek(SeekFrom::Current(i64::from(payload_len)))?;
        position += CHUNK_HEADER_LEN + u64::from(payload_len);
    }
}

fn truncated(err: io::Error, offset: u64) -> WaveCueError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        WaveCueError::TruncatedHeader { offset }
    } else {
        WaveCueError::Io(err)
    }
}
