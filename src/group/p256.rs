use num_bigint::BigUint;
use p256::{
    AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar,
    elliptic_curve::{
        PrimeField,
        sec1::{FromEncodedPoint, ToEncodedPoint},
    },
};

use super::{Curve, GroupElement, GroupError, to_fixed_be};

const FIELD_BYTES: usize = 32;

/// Big-endian order of the P-256 base point.
const ORDER_BE: [u8; FIELD_BYTES] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84, 0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63, 0x25, 0x51,
];

/// NIST P-256 backed by the `p256` crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct P256 {
    order: BigUint,
}

impl Default for P256 {
    fn default() -> Self {
        Self::new()
    }
}

impl P256 {
    pub fn new() -> Self {
        Self {
            order: BigUint::from_bytes_be(&ORDER_BE),
        }
    }

    fn scalar(&self, k: &BigUint) -> Result<Scalar, GroupError> {
        let reduced = k % &self.order;
        let bytes = to_fixed_be(&reduced, FIELD_BYTES)?;
        // reduced below the order, so the canonical check cannot fail
        Option::from(Scalar::from_repr(FieldBytes::clone_from_slice(&bytes)))
            .ok_or(GroupError::NonCanonicalScalar)
    }

    fn affine(&self, point: &GroupElement) -> Result<AffinePoint, GroupError> {
        let x = to_fixed_be(&point.x, FIELD_BYTES)?;
        let y = to_fixed_be(&point.y, FIELD_BYTES)?;
        let encoded = EncodedPoint::from_affine_coordinates(
            &FieldBytes::clone_from_slice(&x),
            &FieldBytes::clone_from_slice(&y),
            false,
        );
        Option::from(AffinePoint::from_encoded_point(&encoded)).ok_or_else(|| {
            GroupError::NotOnCurve {
                x: point.x.clone(),
                y: point.y.clone(),
            }
        })
    }

    fn element(point: ProjectivePoint) -> Result<GroupElement, GroupError> {
        let encoded = AffinePoint::from(point).to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Ok(GroupElement::new(
                BigUint::from_bytes_be(x),
                BigUint::from_bytes_be(y),
            )),
            _ => Err(GroupError::Identity),
        }
    }
}

impl Curve for P256 {
    fn order(&self) -> &BigUint {
        &self.order
    }

    fn field_byte_len(&self) -> usize {
        FIELD_BYTES
    }

    fn base_mul(&self, k: &BigUint) -> Result<GroupElement, GroupError> {
        Self::element(ProjectivePoint::GENERATOR * self.scalar(k)?)
    }

    fn mul(&self, point: &GroupElement, k: &BigUint) -> Result<GroupElement, GroupError> {
        Self::element(ProjectivePoint::from(self.affine(point)?) * self.scalar(k)?)
    }

    fn add(&self, a: &GroupElement, b: &GroupElement) -> Result<GroupElement, GroupError> {
        Self::element(ProjectivePoint::from(self.affine(a)?) + ProjectivePoint::from(self.affine(b)?))
    }
}
