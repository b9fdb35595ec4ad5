// src/compression.rs
//! Decompression of repository index payloads
//!
//! Repositories publish the primary index compressed with gzip, xz, or
//! bzip2. The format is detected from magic bytes; anything else is an
//! `UnsupportedFormat` error, never a silent pass-through.

use std::io::Read;

use crate::error::{Error, Result};

/// Compression formats the index fetch path understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Gzip compression (.gz)
    Gzip,
    /// XZ/LZMA compression (.xz)
    Xz,
    /// Bzip2 compression (.bz2)
    Bzip2,
}

impl CompressionFormat {
    /// Detect compression format from magic bytes
    ///
    /// Magic bytes:
    /// - Gzip: `1f 8b`
    /// - XZ: `fd 37 7a 58 5a 00` (FD + "7zXZ" + NUL)
    /// - Bzip2: `42 5a 68` ("BZh")
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b {
            Some(Self::Gzip)
        } else if data.len() >= 6
            && data[0] == 0xfd
            && data[1] == 0x37
            && data[2] == 0x7a
            && data[3] == 0x58
            && data[4] == 0x5a
            && data[5] == 0x00
        {
            Some(Self::Xz)
        } else if data.len() >= 3 && data[0] == 0x42 && data[1] == 0x5a && data[2] == 0x68 {
            Some(Self::Bzip2)
        } else {
            None
        }
    }

    /// Human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Xz => "xz",
            Self::Bzip2 => "bzip2",
        }
    }
}

impl std::fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decompress a byte slice using the specified format
pub fn decompress(data: &[u8], format: CompressionFormat) -> Result<Vec<u8>> {
    let mut decoder: Box<dyn Read> = match format {
        CompressionFormat::Gzip => Box::new(flate2::read::GzDecoder::new(data)),
        CompressionFormat::Xz => Box::new(xz2::read::XzDecoder::new(data)),
        CompressionFormat::Bzip2 => Box::new(bzip2::read::BzDecoder::new(data)),
    };

    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| Error::ParseError(format!("Failed to decompress {} data: {}", format, e)))?;
    Ok(output)
}

/// Decompress a byte slice, detecting the format from magic bytes
///
/// Fails with `UnsupportedFormat` when the magic bytes match no known
/// compression family.
pub fn decompress_auto(data: &[u8]) -> Result<Vec<u8>> {
    let format = CompressionFormat::from_magic_bytes(data).ok_or_else(|| {
        let head: Vec<String> = data.iter().take(6).map(|b| format!("{b:02x}")).collect();
        Error::UnsupportedFormat(format!("unrecognized magic bytes [{}]", head.join(" ")))
    })?;
    decompress(data, format)
}
