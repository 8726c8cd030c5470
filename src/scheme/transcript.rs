//! Byte layout of a fractional-scheme transcript.
//!
//! ```text
//! sign(1) || X(field) || sign(1) || Y(field)      DH share bG
//! [enc0 || enc1] * γ                               masked recipient labels
//! label * (inputs - γ)                             revealed sender labels
//! packed garbled circuit
//! ```
//!
//! Coordinates are unsigned, so both sign bytes are always zero.

use num_bigint::BigUint;

use crate::{
    circuit::packed_len,
    core::label::{LABEL_LEN, Label},
    group::{Curve, GroupElement, GroupError, to_fixed_be},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Transcript is {actual} bytes, layout requires {expected}")]
    Length { expected: usize, actual: usize },
    #[error("Sign byte at offset {offset} is {value:#04x}, expected 0")]
    SignByte { offset: usize, value: u8 },
}

/// Sizes fixing the layout of one transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub field_len: usize,
    pub gamma: usize,
    pub sender_wires: usize,
    pub packed_len: usize,
}

impl Layout {
    pub fn for_circuit(curve: &impl Curve, circuit: &crate::circuit::Circuit, gamma: usize) -> Self {
        Self {
            field_len: curve.field_byte_len(),
            gamma,
            sender_wires: circuit.num_input_wires().saturating_sub(gamma),
            packed_len: packed_len(circuit),
        }
    }

    pub fn share_len(&self) -> usize {
        2 * (1 + self.field_len)
    }

    pub fn total_len(&self) -> usize {
        self.share_len() + (2 * self.gamma + self.sender_wires) * LABEL_LEN + self.packed_len
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    pub share: GroupElement,
    /// `encrypted[i][b]`: label `b` of recipient wire `i` under its pad.
    pub encrypted: Vec<[Label; 2]>,
    pub sender_labels: Vec<Label>,
    pub garbled: Vec<u8>,
}

impl Transcript {
    pub fn encode(&self, field_len: usize) -> Result<Vec<u8>, GroupError> {
        let mut out = Vec::with_capacity(
            2 * (1 + field_len)
                + (2 * self.encrypted.len() + self.sender_labels.len()) * LABEL_LEN
                + self.garbled.len(),
        );

        out.push(0);
        out.extend(to_fixed_be(&self.share.x, field_len)?);
        out.push(0);
        out.extend(to_fixed_be(&self.share.y, field_len)?);

        for [enc0, enc1] in &self.encrypted {
            out.extend_from_slice(&enc0.0);
            out.extend_from_slice(&enc1.0);
        }
        for label in &self.sender_labels {
            out.extend_from_slice(&label.0);
        }
        out.extend_from_slice(&self.garbled);

        Ok(out)
    }

    pub fn decode(bytes: &[u8], layout: &Layout) -> Result<Self, TranscriptError> {
        let expected = layout.total_len();
        if bytes.len() != expected {
            return Err(TranscriptError::Length {
                expected,
                actual: bytes.len(),
            });
        }

        let mut reader = Reader { bytes, offset: 0 };

        let x = reader.coordinate(layout.field_len)?;
        let y = reader.coordinate(layout.field_len)?;

        let encrypted = (0..layout.gamma)
            .map(|_| [reader.label(), reader.label()])
            .collect();
        let sender_labels = (0..layout.sender_wires).map(|_| reader.label()).collect();
        let garbled = reader.rest().to_vec();

        Ok(Self {
            share: GroupElement::new(x, y),
            encrypted,
            sender_labels,
            garbled,
        })
    }
}

/// Cursor over a buffer whose total length was checked up front.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take(&mut self, len: usize) -> &[u8] {
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        slice
    }

    fn coordinate(&mut self, field_len: usize) -> Result<BigUint, TranscriptError> {
        let offset = self.offset;
        let sign = self.take(1)[0];
        if sign != 0 {
            return Err(TranscriptError::SignByte {
                offset,
                value: sign,
            });
        }
        Ok(BigUint::from_bytes_be(self.take(field_len)))
    }

    fn label(&mut self) -> Label {
        let mut label = Label::ZERO;
        label.0.copy_from_slice(self.take(LABEL_LEN));
        label
    }

    fn rest(&mut self) -> &[u8] {
        let offset = self.offset;
        self.offset = self.bytes.len();
        &self.bytes[offset..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout {
            field_len: 4,
            gamma: 2,
            sender_wires: 3,
            packed_len: 5,
        }
    }

    fn sample() -> Transcript {
        Transcript {
            share: GroupElement::new(BigUint::from(0x0102u32), BigUint::from(0xabcdefu32)),
            encrypted: vec![
                [Label([1; LABEL_LEN]), Label([2; LABEL_LEN])],
                [Label([3; LABEL_LEN]), Label([4; LABEL_LEN])],
            ],
            sender_labels: vec![Label([5; LABEL_LEN]), Label([6; LABEL_LEN]), Label([7; LABEL_LEN])],
            garbled: vec![9, 8, 7, 6, 5],
        }
    }

    #[test]
    fn test_layout_offsets() {
        let bytes = sample().encode(4).unwrap();
        assert_eq!(bytes.len(), layout().total_len());
        assert_eq!(&bytes[..10], &[0, 0, 0, 1, 2, 0, 0, 0xab, 0xcd, 0xef]);
        assert_eq!(bytes[10], 1);
        assert_eq!(bytes[10 + 3 * LABEL_LEN], 4);
        assert_eq!(&bytes[bytes.len() - 5..], &[9, 8, 7, 6, 5]);
        assert_eq!(Transcript::decode(&bytes, &layout()).unwrap(), sample());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let bytes = sample().encode(4).unwrap();
        assert_eq!(
            Transcript::decode(&bytes[1..], &layout()),
            Err(TranscriptError::Length {
                expected: bytes.len(),
                actual: bytes.len() - 1
            })
        );
    }

    #[test]
    fn test_sign_byte_rejected() {
        let mut bytes = sample().encode(4).unwrap();
        bytes[5] = 1;
        assert_eq!(
            Transcript::decode(&bytes, &layout()),
            Err(TranscriptError::SignByte {
                offset: 5,
                value: 1
            })
        );
    }
}
