use crate::{
    circuit::{self, CircuitError, PackingError, ParseError},
    group::GroupError,
    scheme::transcript::TranscriptError,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Random source failed: {0}")]
    Entropy(String),
    #[error("Selector {selector} outside the valid range 0..{bound}")]
    InvalidSelector { selector: i64, bound: u64 },
    #[error("No circuit registered for γ = {0}")]
    UnsupportedGamma(usize),
    #[error("Circuit for γ = {gamma} has the wrong shape: {reason}")]
    CircuitShape { gamma: usize, reason: String },
    #[error("Key holds {actual} scalars, expected {expected}")]
    KeySize { expected: String, actual: usize },
    #[error("Bit vector carries {bits} bits, detection key needs {keys}")]
    BitVectorTooShort { bits: usize, keys: usize },
    #[error("Ciphertext encoding: {0}")]
    Ciphertext(#[from] bincode::Error),
    #[error("Ciphertext has {0} trailing bytes")]
    CiphertextTrailingBytes(usize),
    #[error("Malformed transcript: {0}")]
    Transcript(#[from] TranscriptError),
    #[error("Key file line {line}: {reason}")]
    KeyFile { line: usize, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Evaluation(#[from] circuit::Error),
    #[error(transparent)]
    Packing(#[from] PackingError),
}

impl Error {
    pub(crate) fn entropy(err: impl std::fmt::Display) -> Self {
        Error::Entropy(err.to_string())
    }
}
