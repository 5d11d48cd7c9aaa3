//! On-disk width of coverage flag values
//!
//! The simulator stores each flag as a 16-bit signed integer even though
//! only the signed-byte range carries meaning. `I16` is the canonical
//! width; `I8` and `I32` exist for containers produced by other writers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{FormatError, FormatResult};

/// Fixed per-element width of the value blocks in a nested container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementWidth {
    /// 1 byte, signed
    I8,
    /// 2 bytes, signed, little-endian
    #[default]
    I16,
    /// 4 bytes, signed, little-endian
    I32,
}

impl ElementWidth {
    /// Bytes per stored element
    pub fn bytes(self) -> u64 {
        match self {
            ElementWidth::I8 => 1,
            ElementWidth::I16 => 2,
            ElementWidth::I32 => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementWidth::I8 => "i8",
            ElementWidth::I16 => "i16",
            ElementWidth::I32 => "i32",
        }
    }

    /// Narrows a value block into `out`.
    ///
    /// `block_offset` is the absolute offset of `block` in the input and is
    /// used to locate out-of-range values.
    pub fn narrow_into(self, block: &[u8], block_offset: usize, out: &mut Vec<i8>) -> FormatResult<()> {
        let width = self.bytes() as usize;
        for (i, chunk) in block.chunks_exact(width).enumerate() {
            let value: i64 = match self {
                ElementWidth::I8 => i64::from(chunk[0] as i8),
                ElementWidth::I16 => i64::from(i16::from_le_bytes([chunk[0], chunk[1]])),
                ElementWidth::I32 => i64::from(i32::from_le_bytes([
                    chunk[0], chunk[1], chunk[2], chunk[3],
                ])),
            };
            let narrowed = i8::try_from(value).map_err(|_| FormatError::ValueOutOfRange {
                offset: (block_offset + i * width) as u64,
                value,
            })?;
            out.push(narrowed);
        }
        Ok(())
    }

    /// Appends one value at this width.
    pub fn widen_into(self, value: i8, out: &mut Vec<u8>) {
        match self {
            ElementWidth::I8 => out.push(value as u8),
            ElementWidth::I16 => out.extend_from_slice(&i16::from(value).to_le_bytes()),
            ElementWidth::I32 => out.extend_from_slice(&i32::from(value).to_le_bytes()),
        }
    }
}

impl fmt::Display for ElementWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ElementWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i8" => Ok(ElementWidth::I8),
            "i16" => Ok(ElementWidth::I16),
            "i32" => Ok(ElementWidth::I32),
            other => Err(format!(
                "invalid element width '{}', expected one of i8, i16, i32",
                other
            )),
        }
    }
}
