use super::{errors::CircuitError, evaluation::Error};
use crate::core::gate::{Gate, GateId, GateType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateCount {
    pub and: usize,
    pub or: usize,
    pub xor: usize,
    pub not: usize,
    pub copy: usize,
    pub constant: usize,
}

impl GateCount {
    pub fn handle(&mut self, gate_type: GateType) {
        match gate_type {
            GateType::And => self.and += 1,
            GateType::Or => self.or += 1,
            GateType::Xor => self.xor += 1,
            GateType::Not => self.not += 1,
            GateType::Copy => self.copy += 1,
            GateType::Const(_) => self.constant += 1,
            GateType::Input | GateType::Output => {}
        }
    }

    /// Gates that need a garbled table.
    pub fn nonfree(&self) -> usize {
        self.and + self.or + self.not + self.copy + self.constant
    }
}

/// Boolean circuit as a gate list.
///
/// Layout: `[Input; n_in] ++ [Output; n_out] ++ body`. Input gate `i`
/// carries input wire `i`; output gate `n_in + j` carries output wire `j`
/// and reads from the body gate producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    input_widths: Vec<usize>,
    output_widths: Vec<usize>,
    num_input_wires: usize,
    num_output_wires: usize,
    gates: Vec<Gate>,
    gate_count: GateCount,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Open,
    Done,
}

impl Circuit {
    /// Assemble a circuit from a full gate list, checking the layout and
    /// every reference. Cycles are not rejected here; garbling and
    /// evaluation detect them.
    pub fn from_parts(
        input_widths: Vec<usize>,
        output_widths: Vec<usize>,
        gates: Vec<Gate>,
    ) -> Result<Self, CircuitError> {
        let num_input_wires = input_widths.iter().sum::<usize>();
        let num_output_wires = output_widths.iter().sum::<usize>();
        let len = gates.len();

        let mut gate_count = GateCount::default();

        for (id, gate) in gates.iter().enumerate() {
            let expected = if id < num_input_wires {
                Some((GateType::Input, "an input gate"))
            } else if id < num_input_wires + num_output_wires {
                Some((GateType::Output, "an output gate"))
            } else {
                None
            };

            match expected {
                Some((gate_type, name)) if gate.gate_type != gate_type => {
                    return Err(CircuitError::Misplaced {
                        gate: id,
                        expected: name,
                        actual: gate.gate_type,
                    });
                }
                None if matches!(gate.gate_type, GateType::Input | GateType::Output) => {
                    return Err(CircuitError::Misplaced {
                        gate: id,
                        expected: "a logic gate",
                        actual: gate.gate_type,
                    });
                }
                _ => {}
            }

            if !gate.is_well_formed() {
                return Err(CircuitError::Arity {
                    gate: id,
                    gate_type: gate.gate_type,
                    expected: gate.gate_type.arity(),
                    actual: gate.inputs.len(),
                });
            }

            for target in gate.inputs.iter() {
                if target >= len {
                    return Err(CircuitError::DanglingReference {
                        gate: id,
                        target,
                        len,
                    });
                }
                if gates[target].gate_type == GateType::Output {
                    return Err(CircuitError::ReadsOutput { gate: id, target });
                }
            }

            gate_count.handle(gate.gate_type);
        }

        if len < num_input_wires + num_output_wires {
            return Err(CircuitError::UnconnectedOutput(
                len.saturating_sub(num_input_wires),
            ));
        }

        Ok(Self {
            input_widths,
            output_widths,
            num_input_wires,
            num_output_wires,
            gates,
            gate_count,
        })
    }

    pub fn num_input_wires(&self) -> usize {
        self.num_input_wires
    }

    pub fn num_output_wires(&self) -> usize {
        self.num_output_wires
    }

    pub fn input_widths(&self) -> &[usize] {
        &self.input_widths
    }

    pub fn output_widths(&self) -> &[usize] {
        &self.output_widths
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate_count(&self) -> GateCount {
        self.gate_count
    }

    pub fn output_gate(&self, index: usize) -> GateId {
        self.num_input_wires + index
    }

    pub fn output_gates(&self) -> std::ops::Range<GateId> {
        self.output_gate(0)..self.output_gate(self.num_output_wires)
    }

    /// Gates reachable from `roots`, each listed after every gate it reads
    /// from. Fails on the first cycle found.
    pub fn topological_order(
        &self,
        roots: impl IntoIterator<Item = GateId>,
    ) -> Result<Vec<GateId>, CircuitError> {
        let mut marks = vec![Mark::Unvisited; self.gates.len()];
        let mut order = Vec::with_capacity(self.gates.len());
        let mut stack: Vec<(GateId, bool)> = Vec::new();

        for root in roots {
            stack.push((root, false));

            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    marks[id] = Mark::Done;
                    order.push(id);
                    continue;
                }

                match marks[id] {
                    Mark::Done => continue,
                    Mark::Open => return Err(CircuitError::Cycle(id)),
                    Mark::Unvisited => {}
                }

                marks[id] = Mark::Open;
                stack.push((id, true));

                for input in self.gates[id].inputs.iter() {
                    match marks[input] {
                        Mark::Done => {}
                        Mark::Open => return Err(CircuitError::Cycle(input)),
                        Mark::Unvisited => stack.push((input, false)),
                    }
                }
            }
        }

        Ok(order)
    }

    /// Cleartext evaluation, output wire `j` at index `j`.
    pub fn evaluate_plain(&self, inputs: &[bool]) -> Result<Vec<bool>, Error> {
        if inputs.len() != self.num_input_wires {
            return Err(Error::InputCount {
                expected: self.num_input_wires,
                actual: inputs.len(),
            });
        }

        let mut values = vec![false; self.gates.len()];

        for id in self.topological_order(self.output_gates())? {
            let gate = &self.gates[id];
            values[id] = match gate.gate_type {
                GateType::Input => inputs[id],
                gate_type => {
                    let a = gate.inputs.left().is_some_and(|g| values[g]);
                    let b = gate.inputs.right().is_some_and(|g| values[g]);
                    gate_type.f()(a, b)
                }
            };
        }

        Ok(self.output_gates().map(|id| values[id]).collect())
    }
}

/// Incremental construction of a [`Circuit`].
#[derive(Debug)]
pub struct CircuitBuilder {
    input_widths: Vec<usize>,
    output_widths: Vec<usize>,
    num_input_wires: usize,
    body: Vec<Gate>,
    outputs: Vec<Option<GateId>>,
}

impl CircuitBuilder {
    pub fn new(input_widths: &[usize], output_widths: &[usize]) -> Self {
        let num_input_wires = input_widths.iter().sum();
        let num_output_wires = output_widths.iter().sum();
        Self {
            input_widths: input_widths.to_vec(),
            output_widths: output_widths.to_vec(),
            num_input_wires,
            body: Vec::new(),
            outputs: vec![None; num_output_wires],
        }
    }

    /// Gate carrying input wire `index`.
    pub fn input(&self, index: usize) -> GateId {
        debug_assert!(index < self.num_input_wires);
        index
    }

    pub fn add_gate(&mut self, gate: Gate) -> GateId {
        let id = self.num_input_wires + self.outputs.len() + self.body.len();
        self.body.push(gate);
        id
    }

    pub fn constant(&mut self, value: bool) -> GateId {
        self.add_gate(Gate::constant(value))
    }

    pub fn not(&mut self, a: GateId) -> GateId {
        self.add_gate(Gate::not(a))
    }

    pub fn copy(&mut self, a: GateId) -> GateId {
        self.add_gate(Gate::copy(a))
    }

    pub fn and(&mut self, a: GateId, b: GateId) -> GateId {
        self.add_gate(Gate::and(a, b))
    }

    pub fn or(&mut self, a: GateId, b: GateId) -> GateId {
        self.add_gate(Gate::or(a, b))
    }

    pub fn xor(&mut self, a: GateId, b: GateId) -> GateId {
        self.add_gate(Gate::xor(a, b))
    }

    /// Route gate `from` to output wire `index`.
    pub fn output(&mut self, index: usize, from: GateId) {
        if let Some(slot) = self.outputs.get_mut(index) {
            *slot = Some(from);
        }
    }

    pub fn build(self) -> Result<Circuit, CircuitError> {
        let mut gates = Vec::with_capacity(self.num_input_wires + self.outputs.len() + self.body.len());
        gates.extend((0..self.num_input_wires).map(|_| Gate::input()));

        for (index, from) in self.outputs.into_iter().enumerate() {
            gates.push(Gate::output(
                from.ok_or(CircuitError::UnconnectedOutput(index))?,
            ));
        }

        gates.extend(self.body);
        Circuit::from_parts(self.input_widths, self.output_widths, gates)
    }
}
