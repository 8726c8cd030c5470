use bitvec::{order::Lsb0, vec::BitVec};
use num_traits::Zero;
use rand::TryRngCore;

use super::{FuzzyScheme, check_selector, ciphertext::Ciphertext};
use crate::{
    errors::Error,
    group::{Curve, P256},
    hash::{hash_g, hash_h},
    keys::{PubKey, SecKey, keygen, sample_scalar},
};

/// Discrete-log scheme: a detection key with `k` subkeys matches unrelated
/// ciphertexts with probability `2^-k`.
#[derive(Clone, Debug, Default)]
pub struct Power2Scheme<C = P256> {
    curve: C,
}

impl<C: Curve> Power2Scheme<C> {
    pub fn new(curve: C) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Flag without the byte encoding.
    pub fn flag_ciphertext<R: TryRngCore + ?Sized>(
        &self,
        pk: &PubKey,
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        let curve = &self.curve;
        let order = curve.order();

        let r = sample_scalar(curve, rng)?;
        let z = sample_scalar(curve, rng)?;
        let u = curve.base_mul(&r)?;
        let big_z = curve.base_mul(&z)?;

        let mut bits = BitVec::<u8, Lsb0>::repeat(false, pk.len());
        for (i, pk_i) in pk.keys().iter().enumerate() {
            let shared = curve.mul(pk_i, &r)?;
            bits.set(i, !hash_h(curve, &u, &shared, &big_z)?);
        }
        let bits = bits.into_vec();

        let v = hash_g(curve, &u, &bits)?;
        // order is prime: r^-1 = r^(order - 2)
        let r_inv = r.modpow(&(order - 2u32), order);
        let y = ((&z + order - &v) % order * r_inv) % order;

        log::debug!("flag: power2 slots={}", pk.len());
        Ok(Ciphertext { u, bits, y })
    }

    /// Test without the byte decoding.
    pub fn test_ciphertext(&self, ct: &Ciphertext, dsk: &SecKey) -> Result<bool, Error> {
        if ct.num_bits() < dsk.len() {
            log::warn!(
                "test: ciphertext carries {} bits for {} subkeys",
                ct.num_bits(),
                dsk.len()
            );
            return Err(Error::BitVectorTooShort {
                bits: ct.num_bits(),
                keys: dsk.len(),
            });
        }
        if dsk.is_empty() {
            return Ok(true);
        }

        let curve = &self.curve;
        let v = hash_g(curve, &ct.u, &ct.bits)?;
        let big_z = if ct.y.is_zero() {
            curve.base_mul(&v)?
        } else {
            curve.add(&curve.base_mul(&v)?, &curve.mul(&ct.u, &ct.y)?)?
        };

        let bits = ct.bit_slice();
        for (i, sk_i) in dsk.keys().iter().enumerate() {
            let shared = curve.mul(&ct.u, sk_i)?;
            if hash_h(curve, &ct.u, &shared, &big_z)? == bits[i] {
                log::trace!("test: slot {i} rejects");
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl<C: Curve> FuzzyScheme for Power2Scheme<C> {
    fn keygen<R: TryRngCore + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<(SecKey, PubKey), Error> {
        let prob = u32::try_from(size).map_err(|_| Error::KeySize {
            expected: format!("at most {}", u32::MAX),
            actual: size,
        })?;
        keygen(&self.curve, size, prob, rng)
    }

    fn flag<R: TryRngCore + ?Sized>(&self, pk: &PubKey, rng: &mut R) -> Result<Vec<u8>, Error> {
        self.flag_ciphertext(pk, rng)?.encode()
    }

    /// The first `selector` subkeys.
    fn extract(&self, selector: i64, sk: &SecKey) -> Result<SecKey, Error> {
        let k = check_selector(selector, sk.len() as u64 + 1)? as usize;
        Ok(SecKey::new(sk.keys()[..k].to_vec(), k as u32))
    }

    fn test(&self, transcript: &[u8], dsk: &SecKey) -> Result<bool, Error> {
        let ct = Ciphertext::decode(transcript)?;
        self.test_ciphertext(&ct, dsk)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_full_key_always_matches() {
        let scheme = Power2Scheme::<P256>::default();
        let mut rng = StdRng::seed_from_u64(1);
        let (sk, pk) = scheme.keygen(6, &mut rng).unwrap();

        for _ in 0..5 {
            let ct = scheme.flag_ciphertext(&pk, &mut rng).unwrap();
            assert_eq!(ct.bits.len(), 1);
            assert!(scheme.test_ciphertext(&ct, &sk).unwrap());
        }
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let scheme = Power2Scheme::<P256>::default();
        let mut rng = StdRng::seed_from_u64(3);
        let (sk, pk) = scheme.keygen(16, &mut rng).unwrap();
        let ct = scheme.flag_ciphertext(&pk, &mut rng).unwrap();
        assert!(&ct.y < scheme.curve().order());

        // a different y moves Z, which rekeys every pad
        let mut bad_y = ct.clone();
        bad_y.y += 1u32;
        assert!(!scheme.test_ciphertext(&bad_y, &sk).unwrap());

        // a different bit vector moves the challenge v
        let mut bad_bits = ct.clone();
        bad_bits.bits[0] ^= 1;
        assert!(!scheme.test_ciphertext(&bad_bits, &sk).unwrap());
    }

    #[test]
    fn test_short_bit_vector_rejected() {
        let scheme = Power2Scheme::<P256>::default();
        let mut rng = StdRng::seed_from_u64(4);
        let (sk, pk) = scheme.keygen(9, &mut rng).unwrap();
        let mut ct = scheme.flag_ciphertext(&pk, &mut rng).unwrap();
        ct.bits.truncate(1);
        assert!(matches!(
            scheme.test_ciphertext(&ct, &sk),
            Err(Error::BitVectorTooShort { bits: 8, keys: 9 })
        ));
    }

    #[test]
    fn test_extract_prefix() {
        let scheme = Power2Scheme::<P256>::default();
        let mut rng = StdRng::seed_from_u64(5);
        let (sk, _) = scheme.keygen(4, &mut rng).unwrap();

        let dsk = scheme.extract(2, &sk).unwrap();
        assert_eq!(dsk.keys(), &sk.keys()[..2]);
        assert_eq!(dsk.prob(), 2);

        assert!(scheme.extract(0, &sk).unwrap().is_empty());
        assert_eq!(scheme.extract(4, &sk).unwrap(), sk);
        assert!(matches!(
            scheme.extract(5, &sk),
            Err(Error::InvalidSelector { selector: 5, bound: 5 })
        ));
        assert!(matches!(
            scheme.extract(-1, &sk),
            Err(Error::InvalidSelector { selector: -1, .. })
        ));
    }
}
