//! Writer for the nested container format
//!
//! Produces exactly the byte layout the decoder reads. Used to check that a
//! saved tensor still matches its source container and to build fixtures.

use super::element::ElementWidth;
use crate::tensor::CoverageTensor;

fn push_count(out: &mut Vec<u8>, count: usize) {
    out.extend_from_slice(&(count as u64).to_le_bytes());
}

/// Encodes a dense tensor as a nested container.
pub fn encode(tensor: &CoverageTensor, width: ElementWidth) -> Vec<u8> {
    let [sats, steps, flags] = tensor.shape();
    let mut out =
        Vec::with_capacity(8 * (1 + sats + sats * steps) + tensor.len() * width.bytes() as usize);

    push_count(&mut out, sats);
    for s in 0..sats {
        push_count(&mut out, steps);
        for t in 0..steps {
            push_count(&mut out, flags);
            for &value in tensor.row(s, t).unwrap_or(&[]) {
                width.widen_into(value, &mut out);
            }
        }
    }
    out
}

/// Encodes nested sequences as-is, ragged or not.
pub fn encode_jagged(nested: &[Vec<Vec<i8>>], width: ElementWidth) -> Vec<u8> {
    let mut out = Vec::new();
    push_count(&mut out, nested.len());
    for middle in nested {
        push_count(&mut out, middle.len());
        for inner in middle {
            push_count(&mut out, inner.len());
            for &value in inner {
                width.widen_into(value, &mut out);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let tensor = CoverageTensor::from_vec([1, 1, 2], vec![1, 0]).unwrap();
        let bytes = encode(&tensor, ElementWidth::I16);

        let mut expected = Vec::new();
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(&[1, 0, 0, 0]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_encode_matches_jagged_for_rectangular_input() {
        let nested = vec![vec![vec![1, 0, 1], vec![0, 0, 1]], vec![vec![1, 1, 1], vec![0, 0, 0]]];
        let flat: Vec<i8> = nested.iter().flatten().flatten().copied().collect();
        let tensor = CoverageTensor::from_vec([2, 2, 3], flat).unwrap();

        assert_eq!(
            encode(&tensor, ElementWidth::I16),
            encode_jagged(&nested, ElementWidth::I16)
        );
    }

    #[test]
    fn test_encode_zero_timesteps_keeps_satellite_records() {
        let tensor = CoverageTensor::zeros([2, 0, 5]).unwrap();
        let bytes = encode(&tensor, ElementWidth::I16);
        // outer_count + two zero mid_counts
        assert_eq!(bytes.len(), 24);
    }
}
