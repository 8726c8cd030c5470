//! Prime-order elliptic-curve group used by both detection schemes.
//!
//! The arithmetic itself comes from a backend crate; this module only fixes
//! the interface the schemes need and the SEC1 encodings fed to the hash
//! oracles.

pub mod p256;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

pub use self::p256::P256;

/// Affine point with both coordinates as unsigned integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupElement {
    pub x: BigUint,
    pub y: BigUint,
}

impl GroupElement {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("Point ({x:#x}, {y:#x}) is not on the curve")]
    NotOnCurve { x: BigUint, y: BigUint },
    #[error("Operation produced the point at infinity")]
    Identity,
    #[error("Coordinate needs {actual} bytes, field elements take {max}")]
    CoordinateTooWide { actual: usize, max: usize },
    #[error("Scalar is not a canonical field element")]
    NonCanonicalScalar,
}

/// Group operations the schemes are written against.
pub trait Curve {
    /// Order of the generator.
    fn order(&self) -> &BigUint;

    /// Byte length of one field element.
    fn field_byte_len(&self) -> usize;

    /// `k·G`. Scalars are reduced modulo the order first.
    fn base_mul(&self, k: &BigUint) -> Result<GroupElement, GroupError>;

    /// `k·P`. Scalars are reduced modulo the order first.
    fn mul(&self, point: &GroupElement, k: &BigUint) -> Result<GroupElement, GroupError>;

    fn add(&self, a: &GroupElement, b: &GroupElement) -> Result<GroupElement, GroupError>;

    /// Bit length of the group order.
    fn order_bits(&self) -> u64 {
        self.order().bits()
    }

    /// Uncompressed SEC1 encoding, `0x04 || x || y`.
    fn marshal(&self, point: &GroupElement) -> Result<Vec<u8>, GroupError> {
        let len = self.field_byte_len();
        let mut out = Vec::with_capacity(1 + 2 * len);
        out.push(0x04);
        out.extend(to_fixed_be(&point.x, len)?);
        out.extend(to_fixed_be(&point.y, len)?);
        Ok(out)
    }

    /// Compressed SEC1 encoding, `(0x02 | parity(y)) || x`.
    fn marshal_compressed(&self, point: &GroupElement) -> Result<Vec<u8>, GroupError> {
        let len = self.field_byte_len();
        let mut out = Vec::with_capacity(1 + len);
        out.push(0x02 | point.y.bit(0) as u8);
        out.extend(to_fixed_be(&point.x, len)?);
        Ok(out)
    }
}

/// Big-endian bytes of `value`, left-padded with zeros to exactly `len`.
pub fn to_fixed_be(value: &BigUint, len: usize) -> Result<Vec<u8>, GroupError> {
    let bytes = value.to_bytes_be();
    // BigUint encodes zero as a single zero byte
    let bytes = if bytes == [0] { Vec::new() } else { bytes };
    if bytes.len() > len {
        return Err(GroupError::CoordinateTooWide {
            actual: bytes.len(),
            max: len,
        });
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend(bytes);
    Ok(out)
}
