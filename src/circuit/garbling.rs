use rand::Rng;

use super::{
    errors::CircuitError,
    evaluation::{Error, evaluate_tables},
    structure::Circuit,
};
use crate::core::{
    delta::Delta,
    gate::{
        GateType,
        garbling::{garble, random_wire},
    },
    label::{GarbledWire, Label},
};

pub type DefaultHasher = blake3::Hasher;

/// Garbler's view of a circuit: both labels of every gate plus the tables.
///
/// `wires[i]` and `tables[i]` belong to gate `i`. Input gates and XOR gates
/// have empty tables.
#[derive(Debug, Clone)]
pub struct GarbledCircuit {
    pub structure: Circuit,
    pub delta: Delta,
    pub wires: Vec<GarbledWire>,
    pub tables: Vec<Vec<Label>>,
}

impl Circuit {
    pub fn garble(&self, rng: &mut impl Rng) -> Result<GarbledCircuit, CircuitError> {
        self.garble_with::<DefaultHasher>(rng)
    }

    pub fn garble_with<H: digest::Digest + Default>(
        &self,
        rng: &mut impl Rng,
    ) -> Result<GarbledCircuit, CircuitError> {
        log::debug!(
            "garble: start inputs={} outputs={} gates={} nonfree={}",
            self.num_input_wires(),
            self.num_output_wires(),
            self.gates().len(),
            self.gate_count().nonfree()
        );

        let delta = Delta::generate(rng);
        log::debug!("garble: delta={delta:?}");

        let gates = self.gates();
        let order = self.topological_order(0..gates.len())?;

        let mut wires = vec![GarbledWire::new(Label::ZERO, Label::ZERO); gates.len()];

        for &id in &order {
            let gate = &gates[id];
            wires[id] = match (gate.gate_type, gate.inputs.left(), gate.inputs.right()) {
                (GateType::Output, _, _) => GarbledWire::new(
                    Label::structured(rng, false),
                    Label::structured(rng, true),
                ),
                (GateType::Xor, Some(a), Some(b)) => {
                    let (a, b) = (&wires[a], &wires[b]);
                    GarbledWire::new(a.label0 ^ &b.label0, a.label0 ^ &b.label1)
                }
                _ => random_wire(rng, &delta),
            };
        }

        let tables = gates
            .iter()
            .enumerate()
            .map(|(id, gate)| {
                let inputs = gate.inputs.iter().map(|g| &wires[g]).collect::<Vec<_>>();
                let table = garble::<H>(gate.gate_type, &inputs, &wires[id]).ok_or(
                    CircuitError::Arity {
                        gate: id,
                        gate_type: gate.gate_type,
                        expected: gate.gate_type.arity(),
                        actual: inputs.len(),
                    },
                )?;
                log::trace!("garble: gate[{id}] {:?} rows={}", gate.gate_type, table.len());
                Ok(table)
            })
            .collect::<Result<Vec<_>, CircuitError>>()?;

        log::debug!(
            "garble: complete table_rows={}",
            tables.iter().map(Vec::len).sum::<usize>()
        );

        Ok(GarbledCircuit {
            structure: self.clone(),
            delta,
            wires,
            tables,
        })
    }
}

impl GarbledCircuit {
    pub fn output_wires(&self) -> &[GarbledWire] {
        &self.wires[self.structure.output_gates()]
    }

    /// Active input labels for a plaintext assignment.
    pub fn input_labels_for(&self, bits: &[bool]) -> Result<Vec<Label>, Error> {
        let expected = self.structure.num_input_wires();
        if bits.len() != expected {
            return Err(Error::InputCount {
                expected,
                actual: bits.len(),
            });
        }
        Ok(bits
            .iter()
            .zip(&self.wires)
            .map(|(bit, wire)| wire.select(*bit))
            .collect())
    }

    pub fn evaluate(&self, inputs: &[Label]) -> Result<Vec<Label>, Error> {
        self.evaluate_with::<DefaultHasher>(inputs)
    }

    pub fn evaluate_with<H: digest::Digest + Default>(
        &self,
        inputs: &[Label],
    ) -> Result<Vec<Label>, Error> {
        evaluate_tables::<H>(&self.structure, &self.tables, inputs)
    }
}
