//! Fractional detection over a garbled comparator.
//!
//! The sender garbles a circuit computing `(m + t) mod 2^γ` from its random
//! value `m` and the recipient threshold `t`, reveals the labels of `m`, and
//! masks both labels of every threshold wire with a pad only the owner of
//! the matching secret scalar can rebuild. The recipient unmasks the labels
//! of its own threshold bits, evaluates, and matches iff the sum wrapped,
//! which happens with probability `t / 2^γ`.

use bitvec::{order::Lsb0, slice::BitSlice};
use rand::{SeedableRng, TryRngCore};
use rand_chacha::ChaCha20Rng;

use super::{
    FuzzyScheme, check_selector,
    transcript::{Layout, Transcript},
};
use crate::{
    circuit::{Circuit, EvaluatorCircuit, bits_to_u64, decode_output_labels},
    config::CircuitTable,
    core::label::Label,
    errors::Error,
    group::{Curve, P256},
    hash::hash_i,
    keys::{PubKey, SecKey, keygen, keygen_single},
};

#[derive(Clone, Debug)]
pub struct FractionalScheme<C = P256> {
    curve: C,
    circuits: CircuitTable,
}

impl Default for FractionalScheme<P256> {
    fn default() -> Self {
        Self::new(P256::new(), CircuitTable::builtin())
    }
}

impl<C: Curve> FractionalScheme<C> {
    pub fn new(curve: C, circuits: CircuitTable) -> Self {
        Self { curve, circuits }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn circuits(&self) -> &CircuitTable {
        &self.circuits
    }

    fn layout(&self, circuit: &Circuit, gamma: usize) -> Layout {
        Layout::for_circuit(&self.curve, circuit, gamma)
    }

    /// γ of a full key: two scalars per threshold bit.
    fn full_key_gamma(&self, len: usize) -> Result<usize, Error> {
        if len % 2 != 0 || !self.circuits.supports(len / 2) {
            return Err(Error::KeySize {
                expected: format!(
                    "2γ for γ in {:?}",
                    self.circuits.gammas().collect::<Vec<_>>()
                ),
                actual: len,
            });
        }
        Ok(len / 2)
    }
}

impl<C: Curve> FuzzyScheme for FractionalScheme<C> {
    /// `2γ` key pairs: `pk[2i]` encodes bit `i = 0`, `pk[2i + 1]` bit `i = 1`.
    fn keygen<R: TryRngCore + ?Sized>(
        &self,
        gamma: usize,
        rng: &mut R,
    ) -> Result<(SecKey, PubKey), Error> {
        if !self.circuits.supports(gamma) {
            return Err(Error::UnsupportedGamma(gamma));
        }
        keygen(&self.curve, 2 * gamma, SecKey::FULL_KEY, rng)
    }

    fn flag<R: TryRngCore + ?Sized>(&self, pk: &PubKey, rng: &mut R) -> Result<Vec<u8>, Error> {
        let curve = &self.curve;
        let gamma = self.full_key_gamma(pk.len())?;
        let circuit = self.circuits.circuit(gamma)?;
        let sender_wires = circuit.num_input_wires() - gamma;

        let (b, share) = keygen_single(curve, rng)?;

        let mut seed = [0u8; 32];
        rng.try_fill_bytes(&mut seed).map_err(Error::entropy)?;
        let garbled = circuit.garble(&mut ChaCha20Rng::from_seed(seed))?;

        let encrypted = (0..gamma)
            .map(|i| {
                let wire = garbled.wires[sender_wires + i];
                let mut pair = [wire.label0, wire.label1];
                for (bit, label) in pair.iter_mut().enumerate() {
                    let shared = curve.mul(&pk.keys()[2 * i + bit], &b)?;
                    *label ^= &hash_i(curve, &share, &shared)?;
                }
                Ok(pair)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut m = vec![0u8; sender_wires.div_ceil(8)];
        rng.try_fill_bytes(&mut m).map_err(Error::entropy)?;
        let m = BitSlice::<u8, Lsb0>::from_slice(&m);

        let sender_labels = garbled.wires[..sender_wires]
            .iter()
            .zip(m.iter().by_vals())
            .map(|(wire, bit)| wire.select(bit))
            .collect::<Vec<Label>>();

        let transcript = Transcript {
            share,
            encrypted,
            sender_labels,
            garbled: garbled.pack(),
        }
        .encode(curve.field_byte_len())?;

        log::debug!(
            "flag: fractional γ={gamma} sender_wires={sender_wires} bytes={}",
            transcript.len()
        );
        Ok(transcript)
    }

    /// One scalar per threshold bit: `dsk[i] = sk[2i + bit_i(t)]`.
    fn extract(&self, selector: i64, sk: &SecKey) -> Result<SecKey, Error> {
        let gamma = self.full_key_gamma(sk.len())?;
        let threshold = check_selector(selector, 1u64 << gamma)?;

        let keys = (0..gamma)
            .map(|i| sk.keys()[2 * i + ((threshold >> i) & 1) as usize].clone())
            .collect();

        let prob = u32::try_from(threshold).map_err(|_| Error::InvalidSelector {
            selector,
            bound: u64::from(u32::MAX),
        })?;
        Ok(SecKey::new(keys, prob))
    }

    fn test(&self, transcript: &[u8], dsk: &SecKey) -> Result<bool, Error> {
        let curve = &self.curve;
        let gamma = dsk.len();
        let circuit = self.circuits.circuit(gamma)?;
        let threshold = dsk.prob();
        check_selector(i64::from(threshold), 1u64 << gamma)?;

        let transcript = Transcript::decode(transcript, &self.layout(circuit, gamma))
            .inspect_err(|err| log::warn!("test: rejecting transcript: {err}"))?;

        let recipient_labels = dsk
            .keys()
            .iter()
            .zip(&transcript.encrypted)
            .enumerate()
            .map(|(i, (sk_i, pair))| {
                let shared = curve.mul(&transcript.share, sk_i)?;
                let pad = hash_i(curve, &transcript.share, &shared)?;
                Ok(pair[((threshold >> i) & 1) as usize] ^ &pad)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut inputs = transcript.sender_labels;
        inputs.extend(recipient_labels);

        let evaluator = EvaluatorCircuit::unpack(&transcript.garbled, circuit)?;
        let output = bits_to_u64(&decode_output_labels(&evaluator.evaluate(&inputs)?));

        log::debug!("test: fractional γ={gamma} matched={}", output < u64::from(threshold));
        Ok(output < u64::from(threshold))
    }
}
