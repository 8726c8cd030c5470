use bitvec::{order::Lsb0, slice::BitSlice};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::{
    errors::Error,
    group::{Curve, GroupElement, GroupError},
};

/// Power-of-two scheme ciphertext.
///
/// `bits` packs one bit per public key slot, least significant bit first
/// within each byte. `y` solves `v + y·r = z (mod order)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub u: GroupElement,
    pub bits: Vec<u8>,
    pub y: BigUint,
}

impl Ciphertext {
    pub fn bit_slice(&self) -> &BitSlice<u8, Lsb0> {
        BitSlice::from_slice(&self.bits)
    }

    pub fn num_bits(&self) -> usize {
        self.bits.len() * 8
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(bincode::serialize(self)?)
    }

    /// Inverse of [`Ciphertext::encode`]; trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let ciphertext: Self = bincode::deserialize(bytes)?;
        let used = bincode::serialized_size(&ciphertext)? as usize;
        if used != bytes.len() {
            return Err(Error::CiphertextTrailingBytes(bytes.len() - used));
        }
        Ok(ciphertext)
    }

    /// Compressed `U || y || bits`, the smallest form of the triple.
    pub fn to_compact_bytes(&self, curve: &impl Curve) -> Result<Vec<u8>, GroupError> {
        let mut out = curve.marshal_compressed(&self.u)?;
        out.extend(self.y.to_bytes_be());
        out.extend_from_slice(&self.bits);
        Ok(out)
    }
}
