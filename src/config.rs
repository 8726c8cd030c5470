//! Mapping from the fractional scheme's γ to the circuit it garbles.

use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::PathBuf,
    sync::OnceLock,
};

use crate::{
    circuit::{Circuit, parse_bristol},
    errors::Error,
};

const CMP_48_8: &str = include_str!("../circuits/cmp_48_8.circ");
const CMP_64_24: &str = include_str!("../circuits/cmp_64_24.circ");

/// Where a circuit description comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CircuitSource {
    Embedded(&'static str),
    Path(PathBuf),
}

impl CircuitSource {
    fn load(&self) -> Result<Circuit, Error> {
        match self {
            CircuitSource::Embedded(text) => Ok(parse_bristol(text.as_bytes())?),
            CircuitSource::Path(path) => {
                log::debug!("circuit: loading {}", path.display());
                Ok(parse_bristol(BufReader::new(File::open(path)?))?)
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Entry {
    source: CircuitSource,
    parsed: OnceLock<Circuit>,
}

/// γ → comparator circuit. Each description is parsed at most once per
/// table.
///
/// A circuit registered for γ must take two input variables, the sender
/// value first and the γ-bit threshold last, and produce γ output wires.
#[derive(Clone, Debug, Default)]
pub struct CircuitTable {
    entries: BTreeMap<usize, Entry>,
}

impl CircuitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// γ = 8 (48-bit sender value) and γ = 24 (64-bit sender value).
    pub fn builtin() -> Self {
        Self::new()
            .with(8, CircuitSource::Embedded(CMP_48_8))
            .with(24, CircuitSource::Embedded(CMP_64_24))
    }

    #[must_use]
    pub fn with(mut self, gamma: usize, source: CircuitSource) -> Self {
        self.insert(gamma, source);
        self
    }

    pub fn insert(&mut self, gamma: usize, source: CircuitSource) {
        self.entries.insert(
            gamma,
            Entry {
                source,
                parsed: OnceLock::new(),
            },
        );
    }

    pub fn supports(&self, gamma: usize) -> bool {
        self.entries.contains_key(&gamma)
    }

    pub fn gammas(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    pub fn circuit(&self, gamma: usize) -> Result<&Circuit, Error> {
        let entry = self
            .entries
            .get(&gamma)
            .ok_or(Error::UnsupportedGamma(gamma))?;

        if let Some(circuit) = entry.parsed.get() {
            return Ok(circuit);
        }

        let circuit = entry.source.load()?;
        check_shape(gamma, &circuit)?;
        log::debug!(
            "circuit: γ={gamma} inputs={:?} gates={}",
            circuit.input_widths(),
            circuit.gates().len()
        );
        Ok(entry.parsed.get_or_init(|| circuit))
    }
}

fn check_shape(gamma: usize, circuit: &Circuit) -> Result<(), Error> {
    let shape = |reason: String| Error::CircuitShape { gamma, reason };

    match circuit.input_widths() {
        [sender, threshold] if *threshold == gamma && *sender > 0 => {}
        widths => {
            return Err(shape(format!(
                "expected inputs [sender, {gamma}], found {widths:?}"
            )));
        }
    }
    if circuit.num_output_wires() != gamma {
        return Err(shape(format!(
            "expected {gamma} output wires, found {}",
            circuit.num_output_wires()
        )));
    }
    if gamma > 32 {
        return Err(shape("thresholds are limited to 32 bits".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = CircuitTable::builtin();
        assert_eq!(table.gammas().collect::<Vec<_>>(), vec![8, 24]);

        let small = table.circuit(8).unwrap();
        assert_eq!(small.input_widths(), &[48, 8]);
        assert_eq!(small.num_output_wires(), 8);

        let large = table.circuit(24).unwrap();
        assert_eq!(large.input_widths(), &[64, 24]);

        // second lookup hits the cache
        assert!(std::ptr::eq(small, table.circuit(8).unwrap()));
    }

    #[test]
    fn test_unsupported_gamma() {
        assert!(matches!(
            CircuitTable::builtin().circuit(16),
            Err(Error::UnsupportedGamma(16))
        ));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let table = CircuitTable::new().with(
            1,
            CircuitSource::Embedded("1 3\n1 2\n1 1\n2 1 0 1 2 AND\n"),
        );
        assert!(matches!(
            table.circuit(1),
            Err(Error::CircuitShape { gamma: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let table = CircuitTable::new().with(
            8,
            CircuitSource::Path(PathBuf::from("/nonexistent/circuit.circ")),
        );
        assert!(matches!(table.circuit(8), Err(Error::Io(_))));
    }
}
