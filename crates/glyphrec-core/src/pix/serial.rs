//! SPIX serialization - raw binary image format
//!
//! Fast, uncompressed serialization of `Pix` images, used to embed
//! training samples in a serialized recognizer.
//!
//! # Format layout
//!
//! ```text
//! Offset       Size          Field
//! ------       ----          -----
//! 0            4             "spix" magic bytes
//! 4            4             width (u32)
//! 8            4             height (u32)
//! 12           4             depth (u32)
//! 16           4             wpl (u32, words per line)
//! 20           4             ncolors (u32, always 0)
//! 24           4             raster data size (= 4 * wpl * h)
//! 28           rdatasize     raw raster data
//! ```
//!
//! All integers and raster words are little-endian. The text field is not
//! stored; callers that need labels serialize them separately.

use crate::error::{Error, Result};
use crate::pix::{Pix, PixelDepth};
use std::io::{Read, Write};

const SPIX_MAGIC: &[u8; 4] = b"spix";
const HEADER_SIZE: usize = 28;

/// SPIX header information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpixHeader {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub wpl: u32,
    pub ncolors: u32,
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

impl Pix {
    /// Read only the SPIX header without loading raster data.
    pub fn read_spix_header(data: &[u8]) -> Result<SpixHeader> {
        if data.len() < HEADER_SIZE {
            return Err(Error::DecodeError(format!(
                "spix header needs {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            )));
        }
        let mut cursor = data;
        Self::read_header(&mut cursor)
    }

    fn read_header(reader: &mut impl Read) -> Result<SpixHeader> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != SPIX_MAGIC {
            return Err(Error::DecodeError("missing spix magic".into()));
        }
        Ok(SpixHeader {
            width: read_u32(reader)?,
            height: read_u32(reader)?,
            depth: read_u32(reader)?,
            wpl: read_u32(reader)?,
            ncolors: read_u32(reader)?,
        })
    }

    /// Deserialize a `Pix` from SPIX binary format via a reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeError`] for a bad magic, inconsistent header
    /// fields or a colormapped image, and [`Error::Io`] on truncation.
    pub fn read_spix(reader: &mut impl Read) -> Result<Self> {
        let header = Self::read_header(reader)?;
        let depth = PixelDepth::from_bits(header.depth)
            .map_err(|_| Error::DecodeError(format!("unsupported spix depth {}", header.depth)))?;
        if header.ncolors != 0 {
            return Err(Error::DecodeError("colormapped spix not supported".into()));
        }
        let expected_wpl = (u64::from(header.width) * u64::from(header.depth)).div_ceil(32);
        if u64::from(header.wpl) != expected_wpl {
            return Err(Error::DecodeError(format!(
                "wpl {} inconsistent with width {}",
                header.wpl, header.width
            )));
        }
        let rdatasize = read_u32(reader)? as u64;
        let nwords = u64::from(header.wpl) * u64::from(header.height);
        if rdatasize != 4 * nwords {
            return Err(Error::DecodeError(format!(
                "raster size {} does not match {} words",
                rdatasize, nwords
            )));
        }
        let mut bytes = vec![0u8; rdatasize as usize];
        reader.read_exact(&mut bytes)?;
        let data = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Pix::from_raw(header.width, header.height, depth, data)
            .map_err(|e| Error::DecodeError(e.to_string()))
    }

    /// Deserialize a `Pix` from SPIX bytes.
    pub fn read_spix_from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = data;
        Self::read_spix(&mut cursor)
    }

    /// Serialize this `Pix` to SPIX binary format via a writer.
    pub fn write_spix(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_all(SPIX_MAGIC)?;
        for v in [self.width(), self.height(), self.depth().bits(), self.wpl(), 0] {
            writer.write_all(&v.to_le_bytes())?;
        }
        writer.write_all(&(4 * self.data().len() as u32).to_le_bytes())?;
        for w in self.data() {
            writer.write_all(&w.to_le_bytes())?;
        }
        Ok(())
    }

    /// Serialize this `Pix` to SPIX bytes.
    pub fn write_spix_to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(HEADER_SIZE + 4 * self.data().len());
        self.write_spix(&mut out)?;
        Ok(out)
    }
}
