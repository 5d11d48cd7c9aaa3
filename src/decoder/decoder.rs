//! Nested container decoder
//!
//! Input layout (all counts `u64` LE):
//!
//! ```text
//! outer_count
//! repeat outer_count:
//!     mid_count
//!     repeat mid_count:
//!         inner_count
//!         inner_count x value (ElementWidth, LE)
//! ```
//!
//! Decoding runs in three phases and returns nothing until all of them
//! succeed:
//!
//! 1. Layout scan: walk the whole input reading only length records,
//!    skipping value blocks. Any short read is `Truncated`.
//! 2. Rectangularity check over the recorded lengths (`Ragged`).
//! 3. One dense allocation of `product(shape)` bytes, filled by a second
//!    walk over the value blocks.
//!
//! The jagged form is never materialized; peak memory is the input buffer,
//! the length records and the dense output.

use std::fs;
use std::io::Read;
use std::path::Path;

use super::cursor::ByteCursor;
use super::element::ElementWidth;
use super::errors::{FormatError, FormatResult, ReadError, ReadResult};
use crate::tensor::{element_count, CoverageTensor, Shape};

/// Summary of a successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    /// Shape of the produced tensor
    pub shape: Shape,
    /// Bytes covered by the declared structure
    pub bytes_consumed: u64,
    /// Bytes after the declared structure, ignored
    pub trailing_bytes: u64,
    /// Width the value blocks were read at
    pub element_width: ElementWidth,
}

/// Length records collected by the layout scan.
struct Layout {
    /// `mid_count` of each outer entry
    mid_counts: Vec<u64>,
    /// `inner_count` of each (outer, middle) entry, in file order
    inner_counts: Vec<u64>,
    /// Offset just past the declared structure
    end_offset: usize,
}

/// Decoder for the simulator's nested length-prefixed container.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDecoder {
    width: ElementWidth,
}

impl FormatDecoder {
    pub fn new(width: ElementWidth) -> Self {
        Self { width }
    }

    pub fn element_width(&self) -> ElementWidth {
        self.width
    }

    /// Decodes a full container into a dense tensor.
    ///
    /// # Errors
    ///
    /// - `Truncated` if the input ends inside the declared structure
    /// - `Ragged` if sibling sequences differ in length
    /// - `ValueOutOfRange` if a stored value does not fit in `i8`
    pub fn decode(&self, bytes: &[u8]) -> FormatResult<CoverageTensor> {
        self.decode_with_stats(bytes).map(|(tensor, _)| tensor)
    }

    /// Like [`decode`](Self::decode), also returning [`DecodeStats`].
    pub fn decode_with_stats(&self, bytes: &[u8]) -> FormatResult<(CoverageTensor, DecodeStats)> {
        let layout = self.scan_layout(bytes)?;
        let shape = Self::validate_rectangular(&layout)?;
        let tensor = self.densify(bytes, shape)?;

        let stats = DecodeStats {
            shape,
            bytes_consumed: layout.end_offset as u64,
            trailing_bytes: (bytes.len() - layout.end_offset) as u64,
            element_width: self.width,
        };
        Ok((tensor, stats))
    }

    /// Reads `reader` to the end, then decodes the bytes.
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> ReadResult<CoverageTensor> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| ReadError::io("Failed to read input stream", e))?;
        Ok(self.decode(&bytes)?)
    }

    /// Reads the file at `path` into memory, then decodes it.
    pub fn decode_file(&self, path: &Path) -> ReadResult<CoverageTensor> {
        self.decode_file_with_stats(path).map(|(tensor, _)| tensor)
    }

    /// Like [`decode_file`](Self::decode_file), also returning [`DecodeStats`].
    pub fn decode_file_with_stats(&self, path: &Path) -> ReadResult<(CoverageTensor, DecodeStats)> {
        let bytes = fs::read(path)
            .map_err(|e| ReadError::io(format!("Failed to read input: {}", path.display()), e))?;
        Ok(self.decode_with_stats(&bytes)?)
    }

    fn scan_layout(&self, bytes: &[u8]) -> FormatResult<Layout> {
        let mut cursor = ByteCursor::new(bytes);
        let outer_count = cursor.read_u64()?;

        // Counts come from untrusted input; vectors grow with what is
        // actually present rather than what is declared.
        let mut mid_counts = Vec::new();
        let mut inner_counts = Vec::new();

        for _ in 0..outer_count {
            let mid_count = cursor.read_u64()?;
            mid_counts.push(mid_count);

            for _ in 0..mid_count {
                let inner_count = cursor.read_u64()?;
                let block_len = inner_count.saturating_mul(self.width.bytes());
                cursor.take(block_len)?;
                inner_counts.push(inner_count);
            }
        }

        Ok(Layout {
            mid_counts,
            inner_counts,
            end_offset: cursor.offset(),
        })
    }

    fn validate_rectangular(layout: &Layout) -> FormatResult<Shape> {
        let outer = layout.mid_counts.len();
        let mid = layout.mid_counts.first().copied().unwrap_or(0);

        if let Some((idx, &found)) = layout
            .mid_counts
            .iter()
            .enumerate()
            .find(|&(_, &count)| count != mid)
        {
            return Err(FormatError::ragged(vec![idx], mid, found));
        }

        let inner = layout.inner_counts.first().copied().unwrap_or(0);
        if let Some((flat, &found)) = layout
            .inner_counts
            .iter()
            .enumerate()
            .find(|&(_, &count)| count != inner)
        {
            // All outer entries share `mid` entries at this point.
            let mid = mid as usize;
            return Err(FormatError::ragged(vec![flat / mid, flat % mid], inner, found));
        }

        let to_usize = |v: u64| {
            usize::try_from(v).map_err(|_| {
                FormatError::shape_mismatch(&[outer as u64, mid, inner], "dimension exceeds usize")
            })
        };
        let shape = [outer, to_usize(mid)?, to_usize(inner)?];

        if element_count(&shape).is_none() {
            return Err(FormatError::shape_mismatch(
                &[outer as u64, mid, inner],
                "element count overflows usize",
            ));
        }
        Ok(shape)
    }

    fn densify(&self, bytes: &[u8], shape: Shape) -> FormatResult<CoverageTensor> {
        let total = element_count(&shape).unwrap_or(0);
        let mut data = Vec::with_capacity(total);

        let mut cursor = ByteCursor::new(bytes);
        let outer_count = cursor.read_u64()?;
        for _ in 0..outer_count {
            let mid_count = cursor.read_u64()?;
            for _ in 0..mid_count {
                let inner_count = cursor.read_u64()?;
                let block_offset = cursor.offset();
                let block = cursor.take(inner_count.saturating_mul(self.width.bytes()))?;
                self.width.narrow_into(block, block_offset, &mut data)?;
            }
        }

        let shape_u64: Vec<u64> = shape.iter().map(|&d| d as u64).collect();
        CoverageTensor::from_vec(shape, data)
            .map_err(|e| FormatError::shape_mismatch(&shape_u64, e.to_string()))
    }
}

/// Decodes `bytes` at the canonical `i16` element width.
pub fn decode(bytes: &[u8]) -> FormatResult<CoverageTensor> {
    FormatDecoder::default().decode(bytes)
}

/// Decodes a stream at the canonical `i16` element width.
pub fn decode_reader<R: Read>(reader: R) -> ReadResult<CoverageTensor> {
    FormatDecoder::default().decode_reader(reader)
}

/// Decodes a file at the canonical `i16` element width.
pub fn decode_file(path: &Path) -> ReadResult<CoverageTensor> {
    FormatDecoder::default().decode_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::encoder::encode_jagged;

    fn push_u64(buf: &mut Vec<u8>, v: u64) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn push_i16(buf: &mut Vec<u8>, v: i16) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    #[test]
    fn test_decode_single_row_by_hand() {
        let mut bytes = Vec::new();
        push_u64(&mut bytes, 1); // outer_count
        push_u64(&mut bytes, 1); // mid_count
        push_u64(&mut bytes, 2); // inner_count
        push_i16(&mut bytes, 1);
        push_i16(&mut bytes, 0);

        let tensor = decode(&bytes).unwrap();
        assert_eq!(tensor.shape(), [1, 1, 2]);
        assert_eq!(tensor.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_decode_empty_outer() {
        let bytes = 0u64.to_le_bytes();
        let tensor = decode(&bytes).unwrap();
        assert_eq!(tensor.shape(), [0, 0, 0]);
        assert!(tensor.is_empty());
    }

    #[test]
    fn test_decode_satellites_without_timesteps() {
        let mut bytes = Vec::new();
        push_u64(&mut bytes, 3);
        for _ in 0..3 {
            push_u64(&mut bytes, 0);
        }
        let tensor = decode(&bytes).unwrap();
        assert_eq!(tensor.shape(), [3, 0, 0]);
    }

    #[test]
    fn test_ragged_middle_names_outer_index() {
        let jagged = vec![
            vec![vec![1, 0], vec![0, 1], vec![1, 1]],
            vec![vec![1, 0], vec![0, 1]],
        ];
        let bytes = encode_jagged(&jagged, ElementWidth::I16);

        let err = decode(&bytes).unwrap_err();
        assert_eq!(err, FormatError::ragged(vec![1], 3, 2));
    }

    #[test]
    fn test_ragged_inner_names_full_path() {
        let jagged = vec![
            vec![vec![1, 0, 1], vec![0, 1, 0]],
            vec![vec![1, 0, 1], vec![0, 1]],
        ];
        let bytes = encode_jagged(&jagged, ElementWidth::I16);

        let err = decode(&bytes).unwrap_err();
        assert_eq!(err, FormatError::ragged(vec![1, 1], 3, 2));
    }

    #[test]
    fn test_truncated_outer_entry() {
        // Declares two satellites, carries one.
        let mut bytes = Vec::new();
        push_u64(&mut bytes, 2);
        push_u64(&mut bytes, 1);
        push_u64(&mut bytes, 2);
        push_i16(&mut bytes, 1);
        push_i16(&mut bytes, 0);

        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            FormatError::Truncated {
                offset: bytes.len() as u64,
                needed: 8,
                available: 0
            }
        );
    }

    #[test]
    fn test_truncated_value_block() {
        let mut bytes = Vec::new();
        push_u64(&mut bytes, 1);
        push_u64(&mut bytes, 1);
        push_u64(&mut bytes, 4);
        push_i16(&mut bytes, 1);

        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            FormatError::Truncated {
                offset: 24,
                needed: 8,
                available: 2
            }
        );
    }

    #[test]
    fn test_truncation_wins_over_raggedness() {
        // Ragged in the first two satellites, then cut short in the third.
        let mut bytes = encode_jagged(
            &[vec![vec![1]], vec![vec![1], vec![0]], vec![vec![1]]],
            ElementWidth::I16,
        );
        bytes.truncate(bytes.len() - 1);

        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { .. }));
    }

    #[test]
    fn test_huge_declared_count_is_truncation() {
        let mut bytes = Vec::new();
        push_u64(&mut bytes, u64::MAX);
        push_u64(&mut bytes, 0);

        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { offset: 16, .. }));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = encode_jagged(&[vec![vec![1, 0]]], ElementWidth::I16);
        let consumed = bytes.len() as u64;
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe]);

        let (tensor, stats) = FormatDecoder::default().decode_with_stats(&bytes).unwrap();
        assert_eq!(tensor.shape(), [1, 1, 2]);
        assert_eq!(stats.bytes_consumed, consumed);
        assert_eq!(stats.trailing_bytes, 3);
    }

    #[test]
    fn test_value_out_of_range_rejected() {
        let mut bytes = Vec::new();
        push_u64(&mut bytes, 1);
        push_u64(&mut bytes, 1);
        push_u64(&mut bytes, 2);
        push_i16(&mut bytes, 1);
        push_i16(&mut bytes, 200);

        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            FormatError::ValueOutOfRange {
                offset: 26,
                value: 200
            }
        );
    }

    #[test]
    fn test_decode_other_width() {
        let bytes = encode_jagged(&[vec![vec![-1, 1]], vec![vec![0, 1]]], ElementWidth::I32);
        let tensor = FormatDecoder::new(ElementWidth::I32).decode(&bytes).unwrap();
        assert_eq!(tensor.shape(), [2, 1, 2]);
        assert_eq!(tensor.as_slice(), &[-1, 1, 0, 1]);
    }

    #[test]
    fn test_width_mismatch_does_not_yield_tensor() {
        // Written at i8, read at i16: the value blocks are half as long as expected.
        let bytes = encode_jagged(&[vec![vec![1, 0, 1, 0]]], ElementWidth::I8);
        assert!(FormatDecoder::new(ElementWidth::I16).decode(&bytes).is_err());
    }

    #[test]
    fn test_decode_reader_reads_to_end() {
        let bytes = encode_jagged(&[vec![vec![1, 1]]], ElementWidth::I16);
        let tensor = decode_reader(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(tensor.as_slice(), &[1, 1]);
    }

    #[test]
    fn test_decode_file_missing_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = decode_file(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
    }

    #[test]
    fn test_decode_file_ragged_is_format_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, encode_jagged(&[vec![vec![1]], vec![]], ElementWidth::I16)).unwrap();

        let err = decode_file(&path).unwrap_err();
        assert!(matches!(err, ReadError::Format(FormatError::Ragged { .. })));
    }
}
