use std::ops::{BitXor, Deref};

use rand::Rng;

use super::label::{LABEL_LEN, Label};

/// A wrapper type for the global Free-XOR delta `Δ`,
/// ensuring that its permutation bit (LSB of the last byte) is always `1`.
///
/// This is **required** for compatibility with point-and-permute:
/// when computing `label1 = label0 ⊕ Δ`, the resulting labels must differ
/// in their permutation bit so that the evaluator can use it to select
/// the correct entry in the garbled table.
///
/// # Invariant
/// ```text
/// delta.0[15] & 1 == 1
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delta(Label);

impl Delta {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut s = rng.random::<[u8; LABEL_LEN]>();
        s[LABEL_LEN - 1] |= 1;
        Self(Label(s))
    }
}

impl Deref for Delta {
    type Target = Label;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl BitXor<&Delta> for Label {
    type Output = Label;

    fn bitxor(self, rhs: &Delta) -> Self::Output {
        self ^ &rhs.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_permute_bit_always_set() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..64 {
            assert!(Delta::generate(&mut rng).permute_bit());
        }
    }

    #[test]
    fn test_offset_flips_permute_bit() {
        let mut rng = StdRng::seed_from_u64(2);
        let delta = Delta::generate(&mut rng);
        let label0 = Label::random(&mut rng);
        let label1 = label0 ^ &delta;
        assert_ne!(label0.permute_bit(), label1.permute_bit());
    }
}
