use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::riff::FmtChunk;

pub const CUE_TAG: [u8; 4] = *b"cue ";
pub const LIST_TAG: [u8; 4] = *b"LIST";
pub const ADTL_FORM: [u8; 4] = *b"adtl";

/// Serialized width of one cue point record.
pub const CUE_POINT_LEN: u32 = 24;
/// Declared payload sizes of the metadata chunks (header excluded).
pub const LTXT_PAYLOAD_LEN: u32 = 20;
pub const LABL_PAYLOAD_LEN: u32 = 12;
pub const NOTE_PAYLOAD_LEN: u32 = 10;

const CHUNK_HEADER_LEN: u32 = 8;
const PURPOSE_MARK: [u8; 4] = *b"mark";
const LABEL_TEXT: [u8; 8] = *b"MARK001\0";
const NOTE_TEXT: [u8; 6] = *b"Range\0";

/// Absolute interleaved-sample index for a time offset.
///
/// Multiplies by the channel count as well as the sample rate, so for
/// multi-channel audio the result is an interleaved-sample index rather
/// than a frame index. That is the established behavior of this tool and
/// is kept as-is.
pub fn cue_position(offset_seconds: f64, fmt: &FmtChunk) -> u32 {
    (offset_seconds * f64::from(fmt.sample_rate) * f64::from(fmt.channels)).floor() as u32
}

/// Sample length of the labeled region: `data_payload_len - position - 1`,
/// computed with wrapping arithmetic. An offset at or past the end of the
/// audio wraps; the value is emitted as-is, never clamped.
pub fn region_length(data_payload_len: u32, position: u32) -> u32 {
    data_payload_len.wrapping_sub(position).wrapping_sub(1)
}

/// A single marker within the audio data.
#[derive(Clone, Copy, Debug)]
pub struct CuePoint {
    pub identifier: u32,
    pub position: u32,
    pub chunk_id: [u8; 4],
    pub chunk_start: u32,
    pub block_start: u32,
    pub sample_offset: u32,
}

impl CuePoint {
    /// Marker at an interleaved-sample position within the `data` chunk.
    pub fn for_data_position(position: u32) -> Self {
        Self {
            identifier: 1,
            position,
            chunk_id: *b"data",
            chunk_start: 0,
            block_start: 0,
            sample_offset: position,
        }
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.identifier)?;
        writer.write_u32::<LittleEndian>(self.position)?;
        writer.write_all(&self.chunk_id)?;
        writer.write_u32::<LittleEndian>(self.chunk_start)?;
        writer.write_u32::<LittleEndian>(self.block_start)?;
        writer.write_u32::<LittleEndian>(self.sample_offset)?;
        Ok(())
    }
}

/// `cue ` chunk: point count followed by the points in order. The declared
/// size covers the count field plus every point record.
#[derive(Clone, Debug)]
pub struct CueChunk {
    pub points: Vec<CuePoint>,
}

impl CueChunk {
    pub fn single(point: CuePoint) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn payload_len(&self) -> u32 {
        4 + CUE_POINT_LEN * self.points.len() as u32
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&CUE_TAG)?;
        writer.write_u32::<LittleEndian>(self.payload_len())?;
        writer.write_u32::<LittleEndian>(self.points.len() as u32)?;
        for point in &self.points {
            point.write_to(writer)?;
        }
        Ok(())
    }
}

/// `ltxt` region descriptor. `name` carries the cue position and
/// `sample_length` the derived region length.
#[derive(Clone, Copy, Debug)]
pub struct LtxtChunk {
    pub name: u32,
    pub sample_length: u32,
    pub purpose: [u8; 4],
    pub country: u16,
    pub language: u16,
    pub dialect: u16,
    pub code_page: u16,
}

impl LtxtChunk {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"ltxt")?;
        writer.write_u32::<LittleEndian>(LTXT_PAYLOAD_LEN)?;
        writer.write_u32::<LittleEndian>(self.name)?;
        writer.write_u32::<LittleEndian>(self.sample_length)?;
        writer.write_all(&self.purpose)?;
        writer.write_u16::<LittleEndian>(self.country)?;
        writer.write_u16::<LittleEndian>(self.language)?;
        writer.write_u16::<LittleEndian>(self.dialect)?;
        writer.write_u16::<LittleEndian>(self.code_page)?;
        Ok(())
    }
}

/// `labl` annotation: owning cue identifier plus a fixed-width,
/// zero-padded text buffer.
#[derive(Clone, Copy, Debug)]
pub struct LablChunk {
    pub cue_id: u32,
    pub text: [u8; 8],
}

impl LablChunk {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"labl")?;
        writer.write_u32::<LittleEndian>(LABL_PAYLOAD_LEN)?;
        writer.write_u32::<LittleEndian>(self.cue_id)?;
        writer.write_all(&self.text)?;
        Ok(())
    }
}

/// `note` annotation, same shape as `labl` with a shorter buffer.
#[derive(Clone, Copy, Debug)]
pub struct NoteChunk {
    pub cue_id: u32,
    pub text: [u8; 6],
}

impl NoteChunk {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"note")?;
        writer.write_u32::<LittleEndian>(NOTE_PAYLOAD_LEN)?;
        writer.write_u32::<LittleEndian>(self.cue_id)?;
        writer.write_all(&self.text)?;
        Ok(())
    }
}

/// `LIST`/`adtl` chunk wrapping the three annotation sub-chunks. The
/// declared size spans the form-type tag plus the full serialized width of
/// each nested chunk, headers included, since the nested chunks are
/// self-describing.
#[derive(Clone, Copy, Debug)]
pub struct ListChunk {
    pub ltxt: LtxtChunk,
    pub labl: LablChunk,
    pub note: NoteChunk,
}

impl ListChunk {
    /// Annotation list for a single region starting at `position` and
    /// spanning `region_length` samples, with the tool's fixed label and
    /// note texts.
    pub fn adtl(position: u32, region_length: u32) -> Self {
        Self {
            ltxt: LtxtChunk {
                name: position,
                sample_length: region_length,
                purpose: PURPOSE_MARK,
                country: 1,
                language: 0,
                dialect: 0,
                code_page: 0,
            },
            labl: LablChunk {
                cue_id: 1,
                text: LABEL_TEXT,
            },
            note: NoteChunk {
                cue_id: 1,
                text: NOTE_TEXT,
            },
        }
    }

    pub fn payload_len(&self) -> u32 {
        4 + (CHUNK_HEADER_LEN + LTXT_PAYLOAD_LEN)
            + (CHUNK_HEADER_LEN + LABL_PAYLOAD_LEN)
            + (CHUNK_HEADER_LEN + NOTE_PAYLOAD_LEN)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&LIST_TAG)?;
        writer.write_u32::<LittleEndian>(self.payload_len())?;
        writer.write_all(&ADTL_FORM)?;
        self.ltxt.write_to(writer)?;
        self.labl.write_to(writer)?;
        self.note.write_to(writer)?;
        Ok(())
    }
}
