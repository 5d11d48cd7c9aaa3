//! Self-describing array file format
//!
//! ```text
//! +------------------+
//! | Magic "SCTA"     | (4 bytes)
//! +------------------+
//! | Format Version   | (u8, = 1)
//! +------------------+
//! | Element Type     | (u8, see ElementType)
//! +------------------+
//! | Rank             | (u8, = 3)
//! +------------------+
//! | Reserved         | (u8, = 0)
//! +------------------+
//! | Shape            | (rank x u64 LE)
//! +------------------+
//! | Payload          | (product(shape) elements, row-major)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum is CRC32 over every byte before it.

use super::checksum::compute_checksum;
use crate::decoder::{ByteCursor, FormatError, FormatResult};
use crate::tensor::{element_count, CoverageTensor, Shape, RANK};

/// File magic
pub const MAGIC: [u8; 4] = *b"SCTA";

/// Current array file format version
pub const FORMAT_VERSION: u8 = 1;

/// Fixed header bytes before the shape
const PREAMBLE_LEN: usize = 8;
const CHECKSUM_LEN: usize = 4;

/// Element type tags stored in the array file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElementType {
    /// Signed 8-bit integer
    I8 = 1,
}

impl ElementType {
    /// Convert from u8, returns None for unknown tags
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ElementType::I8),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Bytes per element
    pub fn size(self) -> usize {
        match self {
            ElementType::I8 => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementType::I8 => "i8",
        }
    }
}

/// Serializes a tensor into array file bytes.
pub fn serialize(tensor: &CoverageTensor) -> Vec<u8> {
    let shape = tensor.shape();
    let mut buf =
        Vec::with_capacity(PREAMBLE_LEN + RANK * 8 + tensor.len() + CHECKSUM_LEN);

    buf.extend_from_slice(&MAGIC);
    buf.push(FORMAT_VERSION);
    buf.push(ElementType::I8.as_u8());
    buf.push(RANK as u8);
    buf.push(0);

    for dim in shape {
        buf.extend_from_slice(&(dim as u64).to_le_bytes());
    }
    buf.extend(tensor.as_slice().iter().map(|&v| v as u8));

    let checksum = compute_checksum(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    buf
}

/// Parses array file bytes back into a tensor.
///
/// # Errors
///
/// - `Truncated` if the file is shorter than its header
/// - `BadMagic` / `UnsupportedVersion` for foreign files
/// - `ChecksumMismatch` if the contents were damaged
/// - `UnsupportedType` for an unknown element tag
/// - `ShapeMismatch` if the rank is not 3 or the payload length disagrees
///   with the shape
pub fn deserialize(bytes: &[u8]) -> FormatResult<CoverageTensor> {
    if bytes.len() < PREAMBLE_LEN + CHECKSUM_LEN {
        return Err(FormatError::truncated(
            0,
            (PREAMBLE_LEN + CHECKSUM_LEN) as u64,
            bytes.len(),
        ));
    }

    let mut cursor = ByteCursor::new(bytes);
    let magic = cursor.take(4)?;
    if magic != MAGIC {
        let mut found = [0u8; 4];
        found.copy_from_slice(magic);
        return Err(FormatError::BadMagic { found });
    }
    let version = cursor.read_u8()?;
    if version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(version));
    }

    // Checksum before trusting any field that drives allocation.
    let checksum_offset = bytes.len() - CHECKSUM_LEN;
    let mut stored = [0u8; 4];
    stored.copy_from_slice(&bytes[checksum_offset..]);
    let stored = u32::from_le_bytes(stored);
    let computed = compute_checksum(&bytes[..checksum_offset]);
    if stored != computed {
        return Err(FormatError::ChecksumMismatch { stored, computed });
    }
    let body = &bytes[..checksum_offset];
    let mut cursor = ByteCursor::new(body);
    cursor.take(5)?;

    let tag = cursor.read_u8()?;
    let element_type = ElementType::from_u8(tag).ok_or(FormatError::UnsupportedType(tag))?;
    let rank = cursor.read_u8()? as usize;
    let _reserved = cursor.read_u8()?;

    let mut dims = Vec::with_capacity(rank.min(RANK));
    for _ in 0..rank {
        dims.push(cursor.read_u64()?);
    }
    if rank != RANK {
        return Err(FormatError::shape_mismatch(
            &dims,
            format!("rank {} is not a coverage tensor rank of {}", rank, RANK),
        ));
    }

    let mut shape: Shape = [0; RANK];
    for (slot, &dim) in shape.iter_mut().zip(&dims) {
        *slot = usize::try_from(dim)
            .map_err(|_| FormatError::shape_mismatch(&dims, "dimension exceeds usize"))?;
    }

    let payload_len = cursor.remaining();
    let expected_len = element_count(&shape)
        .and_then(|n| n.checked_mul(element_type.size()))
        .ok_or_else(|| FormatError::shape_mismatch(&dims, "element count overflows usize"))?;
    if payload_len != expected_len {
        return Err(FormatError::shape_mismatch(
            &dims,
            format!(
                "payload holds {} bytes, shape needs {}",
                payload_len, expected_len
            ),
        ));
    }

    let payload = cursor.take(payload_len as u64)?;
    let data: Vec<i8> = payload.iter().map(|&b| b as i8).collect();
    CoverageTensor::from_vec(shape, data)
        .map_err(|e| FormatError::shape_mismatch(&dims, e.to_string()))
}
