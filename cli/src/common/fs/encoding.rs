//! # Text Encodings (`common::fs::encoding`)
//!
//! File: cli/src/common/fs/encoding.rs
//!
//! Decoding and encoding of the charsets a deployment descriptor realistically
//! declares: UTF-8, US-ASCII, ISO-8859-1, and the UTF-16 family. Names are
//! matched case-insensitively with the common aliases (`utf8`, `latin1`, ...).
//!
//! A byte-order mark is kept as a `U+FEFF` character for every charset except
//! plain `UTF-16`, whose decoder consumes it to pick the byte order and whose
//! encoder writes a big-endian mark back.
//!
use crate::core::error::{EjbError, Result};
use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    UsAscii,
    Latin1,
    Utf16,
    Utf16Le,
    Utf16Be,
}

impl Charset {
    pub fn from_name(name: &str) -> Result<Self> {
        let key = name.trim().to_ascii_uppercase().replace('_', "-");
        let charset = match key.as_str() {
            "UTF-8" | "UTF8" => Charset::Utf8,
            "US-ASCII" | "ASCII" => Charset::UsAscii,
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Charset::Latin1,
            "UTF-16" | "UTF16" => Charset::Utf16,
            "UTF-16LE" => Charset::Utf16Le,
            "UTF-16BE" => Charset::Utf16Be,
            _ => {
                return Err(anyhow!(EjbError::Filtering(format!(
                    "Unsupported encoding '{}'",
                    name
                ))))
            }
        };
        Ok(charset)
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| malformed("UTF-8", e.to_string())),
            Charset::UsAscii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(malformed("US-ASCII", format!("non-ASCII byte at offset {}", pos)));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Charset::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                _ => decode_utf16(bytes, u16::from_be_bytes),
            },
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::UsAscii => encode_single_byte(text, 0x7F, "US-ASCII"),
            Charset::Latin1 => encode_single_byte(text, 0xFF, "ISO-8859-1"),
            Charset::Utf16 => {
                let mut out = vec![0xFE, 0xFF];
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                Ok(out)
            }
            Charset::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Charset::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(malformed("UTF-16", "odd number of bytes".to_string()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| malformed("UTF-16", e.to_string()))
}

fn encode_single_byte(text: &str, max: u32, label: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c))
                .ok()
                .filter(|b| u32::from(*b) <= max)
                .ok_or_else(|| {
                    anyhow!(EjbError::Filtering(format!(
                        "Character '{}' cannot be encoded as {}",
                        c, label
                    )))
                })
        })
        .collect()
}

fn malformed(label: &str, reason: String) -> anyhow::Error {
    anyhow!(EjbError::Filtering(format!(
        "Input is not valid {}: {}",
        label, reason
    )))
}
