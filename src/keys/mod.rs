//! Public and secret key vectors shared by both schemes.

mod persist;

use num_bigint::BigUint;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};

use crate::{
    errors::Error,
    group::{Curve, GroupElement},
};

/// Ordered public points. Index `i` is tied to detection slot `i`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    keys: Vec<GroupElement>,
}

impl PubKey {
    pub fn new(keys: Vec<GroupElement>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[GroupElement] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Ordered secret scalars plus the scheme-specific `prob` field: the
/// subkey count for the power-of-two scheme, the threshold for the
/// fractional one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecKey {
    keys: Vec<BigUint>,
    prob: u32,
}

impl SecKey {
    /// `prob` of an unextracted fractional key.
    pub const FULL_KEY: u32 = u32::MAX;

    pub fn new(keys: Vec<BigUint>, prob: u32) -> Self {
        Self { keys, prob }
    }

    pub fn keys(&self) -> &[BigUint] {
        &self.keys
    }

    pub fn prob(&self) -> u32 {
        self.prob
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Uniform non-zero scalar below the group order.
///
/// Draws `ceil(bitlen(order) / 8)` bytes, masks the excess high bits of the
/// first byte and rejects anything `>= order` or zero. A failing source is
/// reported, never retried.
pub fn sample_scalar<R: TryRngCore + ?Sized>(
    curve: &impl Curve,
    rng: &mut R,
) -> Result<BigUint, Error> {
    let bits = curve.order_bits() as usize;
    let len = bits.div_ceil(8);
    let mask = 0xffu8 >> (len * 8 - bits);
    let mut buf = vec![0u8; len];

    loop {
        rng.try_fill_bytes(&mut buf).map_err(Error::entropy)?;
        buf[0] &= mask;

        let candidate = BigUint::from_bytes_be(&buf);
        if candidate.bits() != 0 && &candidate < curve.order() {
            return Ok(candidate);
        }
        log::trace!("sample_scalar: rejected candidate");
    }
}

/// One key pair `(k, k·G)`.
pub fn keygen_single<R: TryRngCore + ?Sized>(
    curve: &impl Curve,
    rng: &mut R,
) -> Result<(BigUint, GroupElement), Error> {
    let secret = sample_scalar(curve, rng)?;
    let public = curve.base_mul(&secret)?;
    Ok((secret, public))
}

/// `n` independent key pairs; `prob` of the secret key is set by the caller.
pub fn keygen<R: TryRngCore + ?Sized>(
    curve: &impl Curve,
    n: usize,
    prob: u32,
    rng: &mut R,
) -> Result<(SecKey, PubKey), Error> {
    let (secrets, publics) = (0..n)
        .map(|_| keygen_single(curve, rng))
        .collect::<Result<(Vec<_>, Vec<_>), _>>()?;

    log::debug!("keygen: {n} key pairs");
    Ok((SecKey::new(secrets, prob), PubKey::new(publics)))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::group::P256;

    /// Source that yields a fixed byte pattern, then fails.
    struct Scripted {
        chunks: Vec<Vec<u8>>,
    }

    impl TryRngCore for Scripted {
        type Error = std::io::Error;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            let mut b = [0u8; 4];
            self.try_fill_bytes(&mut b)?;
            Ok(u32::from_le_bytes(b))
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            let mut b = [0u8; 8];
            self.try_fill_bytes(&mut b)?;
            Ok(u64::from_le_bytes(b))
        }

        fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
            if self.chunks.is_empty() {
                return Err(std::io::Error::other("exhausted"));
            }
            let chunk = self.chunks.remove(0);
            dst.copy_from_slice(&chunk);
            Ok(())
        }
    }

    #[test]
    fn test_sample_scalar_rejects_zero_and_overflow() {
        let curve = P256::new();
        let mut rng = Scripted {
            chunks: vec![vec![0u8; 32], vec![0xffu8; 32], {
                let mut v = vec![0u8; 32];
                v[31] = 9;
                v
            }],
        };
        assert_eq!(
            sample_scalar(&curve, &mut rng).unwrap(),
            BigUint::from(9u32)
        );
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let curve = P256::new();
        let mut rng = Scripted { chunks: vec![] };
        assert!(matches!(
            sample_scalar(&curve, &mut rng),
            Err(Error::Entropy(_))
        ));
    }

    #[test]
    fn test_keygen_pairs_are_aligned() {
        let curve = P256::new();
        let mut rng = StdRng::seed_from_u64(11);
        let (sk, pk) = keygen(&curve, 4, 4, &mut rng).unwrap();

        assert_eq!(sk.len(), 4);
        assert_eq!(pk.len(), 4);
        assert_eq!(sk.prob(), 4);
        for (s, p) in sk.keys().iter().zip(pk.keys()) {
            assert_eq!(&curve.base_mul(s).unwrap(), p);
            assert!(s < curve.order());
        }
    }

    #[test]
    fn test_sampled_scalars_differ() {
        let curve = P256::new();
        let mut rng = StdRng::seed_from_u64(12);
        let a = sample_scalar(&curve, &mut rng).unwrap();
        let b = sample_scalar(&curve, &mut rng).unwrap();
        assert_ne!(a, b);
    }
}
