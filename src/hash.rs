//! Domain-separated random oracles over SHA-256.
//!
//! - `H(A, B, C)` → one bit, keys the per-slot pads of the power-of-two scheme.
//! - `G(U, bits)` → scalar mod the group order, the challenge of the same scheme.
//! - `I(bG, shared)` → 16-byte pad masking garbled input labels in the
//!   fractional scheme.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::{
    core::label::{LABEL_LEN, Label},
    group::{Curve, GroupElement, GroupError},
};

const TAG_H: &[u8] = b"HashH";
const TAG_G: &[u8] = b"HashG";
const TAG_I: &[u8] = b"HashI";

/// Extra bits drawn for `G` beyond the order width, so reduction is close
/// to uniform.
const G_SLACK_BITS: u64 = 64;

/// Low bit of the first digest byte of `"HashH" || A || B || C`.
pub fn hash_h(
    curve: &impl Curve,
    a: &GroupElement,
    b: &GroupElement,
    c: &GroupElement,
) -> Result<bool, GroupError> {
    let digest = Sha256::new()
        .chain_update(TAG_H)
        .chain_update(curve.marshal(a)?)
        .chain_update(curve.marshal(b)?)
        .chain_update(curve.marshal(c)?)
        .finalize();
    Ok(digest[0] & 1 == 1)
}

/// Scalar derived from `U` and the packed bit vector.
///
/// Digest block `i` hashes `"HashG" || U || bits || "X" * i`. Blocks are
/// concatenated until at least `bitlen(order) + 64` bits are available, read
/// as one big-endian integer and reduced modulo the order.
pub fn hash_g(
    curve: &impl Curve,
    u: &GroupElement,
    bits: &[u8],
) -> Result<BigUint, GroupError> {
    let mut serialized = Vec::with_capacity(TAG_G.len() + 1 + 2 * curve.field_byte_len() + bits.len());
    serialized.extend_from_slice(TAG_G);
    serialized.extend(curve.marshal(u)?);
    serialized.extend_from_slice(bits);

    let needed = curve.order_bits() + G_SLACK_BITS;
    let mut stream = Vec::new();

    while (stream.len() as u64) * 8 < needed {
        stream.extend_from_slice(&Sha256::digest(&serialized));
        serialized.push(b'X');
    }

    Ok(BigUint::from_bytes_be(&stream) % curve.order())
}

/// One-time pad for a garbled label: the first 16 bytes of
/// `SHA-256("HashI" || bG || shared)`.
pub fn hash_i(
    curve: &impl Curve,
    share: &GroupElement,
    shared: &GroupElement,
) -> Result<Label, GroupError> {
    let digest = Sha256::new()
        .chain_update(TAG_I)
        .chain_update(curve.marshal(share)?)
        .chain_update(curve.marshal(shared)?)
        .finalize();

    let mut pad = [0u8; LABEL_LEN];
    pad.copy_from_slice(&digest[..LABEL_LEN]);
    Ok(Label(pad))
}
