//! Flat byte form of a garbled circuit.
//!
//! ```text
//! [label0 || label1] for every input wire, in wire order
//! [row_0 || row_1 || ...] for every non-input gate, in gate order
//! ```
//!
//! Every entry is one 16-byte label. Row counts are implied by gate types,
//! so the circuit structure is required to unpack.

use super::{
    evaluation::{Error, evaluate_tables},
    garbling::{DefaultHasher, GarbledCircuit},
    structure::Circuit,
};
use crate::core::{
    gate::GateType,
    label::{GarbledWire, LABEL_LEN, Label},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PackingError {
    #[error("Packed circuit truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Packed circuit has {0} trailing bytes")]
    TrailingBytes(usize),
}

/// Exact byte length of the packed form of `circuit`.
pub fn packed_len(circuit: &Circuit) -> usize {
    let rows = circuit.gates()[circuit.num_input_wires()..]
        .iter()
        .map(|gate| gate.gate_type.table_rows())
        .sum::<usize>();
    (2 * circuit.num_input_wires() + rows) * LABEL_LEN
}

impl GarbledCircuit {
    pub fn pack(&self) -> Vec<u8> {
        let n_in = self.structure.num_input_wires();
        let mut out = Vec::with_capacity(packed_len(&self.structure));

        for wire in &self.wires[..n_in] {
            out.extend_from_slice(&wire.label0.0);
            out.extend_from_slice(&wire.label1.0);
        }
        for table in &self.tables[n_in..] {
            for row in table {
                out.extend_from_slice(&row.0);
            }
        }

        log::debug!("pack: {} bytes", out.len());
        out
    }
}

/// Evaluator's view of a garbled circuit, rebuilt from its packed form.
#[derive(Debug, Clone)]
pub struct EvaluatorCircuit<'c> {
    circuit: &'c Circuit,
    input_wires: Vec<GarbledWire>,
    tables: Vec<Vec<Label>>,
}

impl<'c> EvaluatorCircuit<'c> {
    pub fn unpack(bytes: &[u8], circuit: &'c Circuit) -> Result<Self, PackingError> {
        let expected = packed_len(circuit);
        if bytes.len() < expected {
            return Err(PackingError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(PackingError::TrailingBytes(bytes.len() - expected));
        }

        let mut labels = bytes
            .chunks_exact(LABEL_LEN)
            .filter_map(Label::from_slice);

        let input_wires = (0..circuit.num_input_wires())
            .map(|_| {
                let label0 = labels.next().unwrap_or_default();
                let label1 = labels.next().unwrap_or_default();
                GarbledWire::new(label0, label1)
            })
            .collect();

        let tables = circuit
            .gates()
            .iter()
            .map(|gate| match gate.gate_type {
                GateType::Input => Vec::new(),
                gate_type => labels.by_ref().take(gate_type.table_rows()).collect(),
            })
            .collect();

        Ok(Self {
            circuit,
            input_wires,
            tables,
        })
    }

    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    pub fn input_wire(&self, index: usize) -> Option<&GarbledWire> {
        self.input_wires.get(index)
    }

    pub fn input_wires(&self) -> &[GarbledWire] {
        &self.input_wires
    }

    pub fn evaluate(&self, inputs: &[Label]) -> Result<Vec<Label>, Error> {
        self.evaluate_with::<DefaultHasher>(inputs)
    }

    pub fn evaluate_with<H: digest::Digest + Default>(
        &self,
        inputs: &[Label],
    ) -> Result<Vec<Label>, Error> {
        evaluate_tables::<H>(self.circuit, &self.tables, inputs)
    }
}
