//! Binary data decoding for mzML
//!
//! mzML stores numerical arrays as Base64 text, optionally zlib-compressed,
//! holding little-endian float32 or float64 values.

use std::io::Read;

use base64::prelude::*;
use byteorder::{ByteOrder, LittleEndian};
use flate2::read::ZlibDecoder;

use super::MzMLError;

/// Binary encoding precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryEncoding {
    /// 32-bit floating point (MS:1000521)
    Float32,
    /// 64-bit floating point (MS:1000523)
    #[default]
    Float64,
}

impl BinaryEncoding {
    fn byte_size(self) -> usize {
        match self {
            BinaryEncoding::Float32 => 4,
            BinaryEncoding::Float64 => 8,
        }
    }
}

/// Compression applied before Base64 encoding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression (MS:1000576)
    #[default]
    None,
    /// zlib (MS:1000574)
    Zlib,
    /// MS-Numpress or anything else we cannot decode, by accession
    Unsupported(String),
}

/// Decode one `<binary>` payload
///
/// `expected_length` comes from the spectrum's `defaultArrayLength`.
pub fn decode_array(
    base64_data: &str,
    encoding: BinaryEncoding,
    compression: &Compression,
    expected_length: Option<usize>,
) -> Result<Vec<f64>, MzMLError> {
    let trimmed = base64_data.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let decoded = BASE64_STANDARD.decode(trimmed)?;
    let bytes = match compression {
        Compression::None => decoded,
        Compression::Zlib => {
            let mut inflated = Vec::with_capacity(decoded.len() * 2);
            ZlibDecoder::new(&decoded[..]).read_to_end(&mut inflated)?;
            inflated
        }
        Compression::Unsupported(accession) => {
            return Err(MzMLError::UnsupportedCompression(accession.clone()))
        }
    };

    let size = encoding.byte_size();
    if bytes.len() % size != 0 {
        return Err(MzMLError::InvalidLength {
            expected: bytes.len() / size * size,
            actual: bytes.len(),
        });
    }

    let values: Vec<f64> = match encoding {
        BinaryEncoding::Float32 => bytes
            .chunks_exact(4)
            .map(|chunk| LittleEndian::read_f32(chunk) as f64)
            .collect(),
        BinaryEncoding::Float64 => bytes.chunks_exact(8).map(LittleEndian::read_f64).collect(),
    };

    if let Some(expected) = expected_length {
        if values.len() != expected {
            return Err(MzMLError::InvalidLength {
                expected,
                actual: values.len(),
            });
        }
    }

    Ok(values)
}
