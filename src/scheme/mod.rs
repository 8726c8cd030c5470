//! The two fuzzy detection schemes behind one interface.
//!
//! | scheme | key size | `extract` selector | detection probability |
//! |---|---|---|---|
//! | [`Power2Scheme`] | `n` | subkey count `k ≤ n` | `2^-k` |
//! | [`FractionalScheme`] | `2γ` | threshold `t < 2^γ` | `t / 2^γ` |

pub mod ciphertext;
pub mod fractional;
pub mod power2;
pub mod transcript;

use rand::TryRngCore;

pub use ciphertext::Ciphertext;
pub use fractional::FractionalScheme;
pub use power2::Power2Scheme;
pub use transcript::{Transcript, TranscriptError};

use crate::{
    errors::Error,
    keys::{PubKey, SecKey},
};

pub trait FuzzyScheme {
    /// Full key pair. `size` is the key count `n` for the power-of-two
    /// scheme and γ for the fractional one.
    fn keygen<R: TryRngCore + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<(SecKey, PubKey), Error>;

    /// Fresh transcript addressed to `pk`.
    fn flag<R: TryRngCore + ?Sized>(&self, pk: &PubKey, rng: &mut R) -> Result<Vec<u8>, Error>;

    /// Detection key for `selector`. Out-of-range selectors fail with
    /// [`Error::InvalidSelector`].
    fn extract(&self, selector: i64, sk: &SecKey) -> Result<SecKey, Error>;

    /// `Ok(false)` is a non-match; `Err` means the transcript or key is
    /// malformed.
    fn test(&self, transcript: &[u8], dsk: &SecKey) -> Result<bool, Error>;
}

/// `selector` as an index in `0..bound`.
fn check_selector(selector: i64, bound: u64) -> Result<u64, Error> {
    u64::try_from(selector)
        .ok()
        .filter(|s| *s < bound)
        .ok_or(Error::InvalidSelector { selector, bound })
}
