use digest::Digest;

use super::{errors::CircuitError, structure::Circuit};
use crate::core::{
    gate::{GateId, GateType, garbling::degarble},
    label::{GarbledWire, LABEL_LEN, Label},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Circuit expects {expected} input wires, got {actual}")]
    InputCount { expected: usize, actual: usize },
    #[error("Malformed circuit: {0}")]
    Circuit(#[from] CircuitError),
    #[error("Gate {gate} table has {actual} rows, expected {expected}")]
    TableSize {
        gate: GateId,
        expected: usize,
        actual: usize,
    },
    #[error("Expected {expected} gate tables, got {actual}")]
    TableCount { expected: usize, actual: usize },
    #[error("Gate {gate} could not be evaluated from its inputs")]
    Degarble { gate: GateId },
    #[error("Output label {index} matches neither label of its wire")]
    UnknownOutputLabel { index: usize },
}

/// Walk the gates feeding the outputs in dependency order and recover one
/// active label per gate. Returns the active labels of the output wires.
pub(crate) fn evaluate_tables<H: Digest + Default>(
    circuit: &Circuit,
    tables: &[Vec<Label>],
    inputs: &[Label],
) -> Result<Vec<Label>, Error> {
    if inputs.len() != circuit.num_input_wires() {
        return Err(Error::InputCount {
            expected: circuit.num_input_wires(),
            actual: inputs.len(),
        });
    }
    if tables.len() != circuit.gates().len() {
        return Err(Error::TableCount {
            expected: circuit.gates().len(),
            actual: tables.len(),
        });
    }

    log::debug!(
        "evaluate: start inputs={} gates={}",
        inputs.len(),
        circuit.gates().len()
    );

    let mut active = vec![Label::ZERO; circuit.gates().len()];

    for id in circuit.topological_order(circuit.output_gates())? {
        let gate = &circuit.gates()[id];

        if gate.gate_type == GateType::Input {
            active[id] = inputs[id];
            continue;
        }

        let table = &tables[id];
        let expected = gate.gate_type.table_rows();
        if table.len() != expected {
            return Err(Error::TableSize {
                gate: id,
                expected,
                actual: table.len(),
            });
        }

        let mut args = [Label::ZERO; 2];
        for (slot, input) in args.iter_mut().zip(gate.inputs.iter()) {
            *slot = active[input];
        }

        active[id] = degarble::<H>(gate.gate_type, table, &args[..gate.inputs.len()])
            .ok_or(Error::Degarble { gate: id })?;

        log::trace!("evaluate: gate[{id}] {:?} -> {:?}", gate.gate_type, active[id]);
    }

    let outputs = circuit
        .output_gates()
        .map(|id| active[id])
        .collect::<Vec<_>>();

    log::debug!("evaluate: complete outputs={}", outputs.len());
    Ok(outputs)
}

/// Read plaintext bits straight off structured output labels.
pub fn decode_output_labels(labels: &[Label]) -> Vec<bool> {
    labels
        .iter()
        .map(|label| label.0[LABEL_LEN - 1] & 1 == 1)
        .collect()
}

/// Decode output labels against the garbler's label pairs.
pub fn decode_with_mapping(labels: &[Label], mapping: &[GarbledWire]) -> Result<Vec<bool>, Error> {
    labels
        .iter()
        .zip(mapping)
        .enumerate()
        .map(|(index, (label, wire))| {
            if *label == wire.label0 {
                Ok(false)
            } else if *label == wire.label1 {
                Ok(true)
            } else {
                Err(Error::UnknownOutputLabel { index })
            }
        })
        .collect()
}

/// Interpret bits as an unsigned integer, index 0 being the least
/// significant bit. Bits past the 64th are ignored.
pub fn bits_to_u64(bits: &[bool]) -> u64 {
    bits.iter()
        .take(u64::BITS as usize)
        .enumerate()
        .fold(0, |acc, (i, bit)| acc | ((*bit as u64) << i))
}

/// `width` bits of `value`, least significant first.
pub fn u64_to_bits(value: u64, width: usize) -> Vec<bool> {
    (0..width)
        .map(|i| i < u64::BITS as usize && (value >> i) & 1 == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_round_trip() {
        assert_eq!(bits_to_u64(&[true, false, true]), 5);
        assert_eq!(bits_to_u64(&[]), 0);
        assert_eq!(u64_to_bits(6, 4), vec![false, true, true, false]);
        assert_eq!(bits_to_u64(&u64_to_bits(0xdead_beef, 32)), 0xdead_beef);
    }

    #[test]
    fn test_decode_structured_labels() {
        let mut zero = Label([7u8; LABEL_LEN]);
        zero.0[LABEL_LEN - 1] = 0;
        let mut one = Label([9u8; LABEL_LEN]);
        one.0[LABEL_LEN - 1] = 1;
        assert_eq!(decode_output_labels(&[one, zero, one]), vec![true, false, true]);
    }

    #[test]
    fn test_decode_with_mapping() {
        let wire = GarbledWire::new(Label([1u8; LABEL_LEN]), Label([2u8; LABEL_LEN]));
        assert_eq!(
            decode_with_mapping(&[wire.label1, wire.label0], &[wire, wire]),
            Ok(vec![true, false])
        );
        assert_eq!(
            decode_with_mapping(&[Label::ZERO], &[wire]),
            Err(Error::UnknownOutputLabel { index: 0 })
        );
    }
}
