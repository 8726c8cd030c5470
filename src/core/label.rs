use std::{
    fmt,
    ops::{BitXor, BitXorAssign},
};

use rand::Rng;

/// Width of a wire label in bytes.
pub const LABEL_LEN: usize = 16;

/// Number of label bytes fed to the row hash. The last byte carries the
/// permutation bit and is left out.
pub const LABEL_KEY_LEN: usize = LABEL_LEN - 1;

/// Leading bytes cleared on freshly sampled labels.
const CLEARED_PREFIX: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Label(pub [u8; LABEL_LEN]);

impl Label {
    pub const ZERO: Self = Self([0u8; LABEL_LEN]);

    pub fn to_hex(&self) -> String {
        self.0
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<Vec<String>>()
            .join("")
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self(rng.random::<[u8; LABEL_LEN]>())
    }

    /// Random label with the leading bytes zeroed, used for every
    /// non-XOR, non-output wire before the Δ offset is applied.
    pub fn random_keyed(rng: &mut impl Rng) -> Self {
        let mut label = Self::random(rng);
        label.0[..CLEARED_PREFIX].fill(0);
        label
    }

    /// Random prefix with the plaintext bit in the final byte.
    pub fn structured(rng: &mut impl Rng, bit: bool) -> Self {
        let mut label = Self::random(rng);
        label.0[LABEL_LEN - 1] = bit as u8;
        label
    }

    /// Point-and-permute bit: low bit of the last byte.
    pub fn permute_bit(&self) -> bool {
        self.0[LABEL_LEN - 1] & 1 == 1
    }

    /// The part of the label that keys a table row.
    pub fn key_bytes(&self) -> &[u8] {
        &self.0[..LABEL_KEY_LEN]
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({})", self.to_hex())
    }
}

impl BitXor for &Label {
    type Output = Label;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut out = [0u8; LABEL_LEN];

        #[allow(clippy::needless_range_loop)]
        for i in 0..LABEL_LEN {
            out[i] = self.0[i] ^ rhs.0[i];
        }

        Label(out)
    }
}

impl BitXor<&Label> for Label {
    type Output = Label;

    fn bitxor(mut self, rhs: &Label) -> Self::Output {
        self ^= rhs;
        self
    }
}

impl BitXorAssign<&Label> for Label {
    fn bitxor_assign(&mut self, rhs: &Label) {
        for (l, r) in self.0.iter_mut().zip(rhs.0) {
            *l ^= r;
        }
    }
}

/// Pair of labels for one wire: index 0 encodes `false`, index 1 `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GarbledWire {
    pub label0: Label,
    pub label1: Label,
}

impl GarbledWire {
    pub fn new(label0: Label, label1: Label) -> Self {
        Self { label0, label1 }
    }

    pub fn select(&self, bit: bool) -> Label {
        match bit {
            false => self.label0,
            true => self.label1,
        }
    }
}
