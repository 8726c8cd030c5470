//! Reader for BRISTOL-format circuit descriptions.
//!
//! ```text
//! <numGates> <numWires>
//! <numInputVars> <width_1> ... <width_n>
//! <numOutputVars> <width_1> ... <width_m>
//!
//! <#in> <#out> <inWire>... <outWire> <OPCODE>
//! ```
//!
//! Input wires are numbered first, output wires are the last `sum(width_j)`
//! wires. Supported opcodes are `AND`, `OR`, `XOR`, `INV`, `EQ` (constant
//! assignment, the single "input" field is the bit) and `EQW` (wire copy).
//! Blank lines and lines starting with `#` are skipped.

use std::{
    io::{self, BufRead},
    str::FromStr,
};

use log::{debug, trace};

use super::{errors::CircuitError, structure::Circuit};
use crate::core::gate::{Gate, GateId, GateType};

/// Upper bound on the wire count a header may declare.
pub const MAX_WIRES: usize = 1 << 24;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("I/O error while reading circuit: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {reason}")]
    Header { line: usize, reason: &'static str },
    #[error("line {line}: invalid number {token:?}")]
    Number { line: usize, token: String },
    #[error("line {line}: unknown opcode {opcode:?}")]
    UnknownOpcode { line: usize, opcode: String },
    #[error("line {line}: expected {expected} fields, found {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}: {opcode} takes {expected} input wires and one output, found {inputs} and {outputs}")]
    Arity {
        line: usize,
        opcode: String,
        expected: usize,
        inputs: usize,
        outputs: usize,
    },
    #[error("line {line}: constant must be 0 or 1, found {value}")]
    BadConstant { line: usize, value: usize },
    #[error("line {line}: wire {wire} out of range, circuit has {num_wires} wires")]
    WireOutOfRange {
        line: usize,
        wire: usize,
        num_wires: usize,
    },
    #[error("line {line}: wire {wire} is read before any gate drives it")]
    DanglingWire { line: usize, wire: usize },
    #[error("line {line}: wire {wire} is driven twice")]
    RedefinedWire { line: usize, wire: usize },
    #[error("expected {expected} gates, found {actual}")]
    GateCount { expected: usize, actual: usize },
    #[error("output wire {wire} is never driven")]
    UndrivenOutput { wire: usize },
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

struct Records<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Records<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_record(&mut self) -> Result<Option<Vec<String>>, ParseError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some(
                trimmed.split_whitespace().map(str::to_owned).collect(),
            ));
        }
        Ok(None)
    }

    fn header(&mut self, reason: &'static str) -> Result<Vec<usize>, ParseError> {
        let record = self.next_record()?.ok_or(ParseError::Header {
            line: self.line,
            reason,
        })?;
        record.iter().map(|t| self.number(t)).collect()
    }

    fn number(&self, token: &str) -> Result<usize, ParseError> {
        token.parse().map_err(|_| ParseError::Number {
            line: self.line,
            token: token.to_owned(),
        })
    }
}

/// `<count> <width>...` with exactly `count` widths.
fn widths(line: usize, record: &[usize], reason: &'static str) -> Result<Vec<usize>, ParseError> {
    match record.split_first() {
        Some((&count, rest)) if rest.len() == count => Ok(rest.to_vec()),
        _ => Err(ParseError::Header { line, reason }),
    }
}

fn checked_sum(line: usize, widths: &[usize]) -> Result<usize, ParseError> {
    widths
        .iter()
        .try_fold(0usize, |acc, w| acc.checked_add(*w))
        .ok_or(ParseError::Header {
            line,
            reason: "variable widths overflow",
        })
}

/// Maps wire numbers to the gate driving them.
struct Drivers {
    drivers: Vec<Option<GateId>>,
}

impl Drivers {
    fn read(&self, line: usize, wire: usize) -> Result<GateId, ParseError> {
        match self.drivers.get(wire) {
            None => Err(ParseError::WireOutOfRange {
                line,
                wire,
                num_wires: self.drivers.len(),
            }),
            Some(None) => Err(ParseError::DanglingWire { line, wire }),
            Some(Some(gate)) => Ok(*gate),
        }
    }

    fn drive(&mut self, line: usize, wire: usize, gate: GateId) -> Result<(), ParseError> {
        let num_wires = self.drivers.len();
        match self.drivers.get_mut(wire) {
            None => Err(ParseError::WireOutOfRange {
                line,
                wire,
                num_wires,
            }),
            Some(Some(_)) => Err(ParseError::RedefinedWire { line, wire }),
            Some(slot) => {
                *slot = Some(gate);
                Ok(())
            }
        }
    }
}

/// Parse a BRISTOL description. Any malformed line or dangling wire aborts
/// the whole parse.
pub fn parse_bristol<R: BufRead>(reader: R) -> Result<Circuit, ParseError> {
    let mut records = Records::new(reader);

    let sizes = records.header("expected `<numGates> <numWires>`")?;
    let (num_gates, num_wires) = match sizes[..] {
        [g, w] => (g, w),
        _ => {
            return Err(ParseError::Header {
                line: records.line,
                reason: "expected `<numGates> <numWires>`",
            });
        }
    };

    let record = records.header("expected input variable widths")?;
    let input_widths = widths(records.line, &record, "expected `<numInputs> <width>...`")?;
    let record = records.header("expected output variable widths")?;
    let output_widths = widths(records.line, &record, "expected `<numOutputs> <width>...`")?;

    if num_wires > MAX_WIRES {
        return Err(ParseError::Header {
            line: records.line,
            reason: "wire count exceeds the supported maximum",
        });
    }
    let num_input_wires = checked_sum(records.line, &input_widths)?;
    let num_output_wires = checked_sum(records.line, &output_widths)?;
    if num_input_wires > num_wires || num_output_wires > num_wires - num_input_wires {
        return Err(ParseError::Header {
            line: records.line,
            reason: "more input and output wires than wires in the circuit",
        });
    }
    // every gate drives a distinct non-input wire
    if num_gates > num_wires - num_input_wires {
        return Err(ParseError::Header {
            line: records.line,
            reason: "more gates than wires they could drive",
        });
    }

    debug!(
        "bristol: gates={num_gates} wires={num_wires} inputs={num_input_wires} outputs={num_output_wires}"
    );

    let mut drivers = Drivers {
        drivers: vec![None; num_wires],
    };
    for wire in 0..num_input_wires {
        drivers.drivers[wire] = Some(wire);
    }

    let first_body_gate = num_input_wires + num_output_wires;
    let mut body = Vec::new();

    for parsed in 0..num_gates {
        let record = records.next_record()?.ok_or(ParseError::GateCount {
            expected: num_gates,
            actual: parsed,
        })?;
        let line = records.line;
        let id = first_body_gate + body.len();

        let Some((opcode, fields)) = record.split_last() else {
            return Err(ParseError::FieldCount {
                line,
                expected: 4,
                actual: 0,
            });
        };
        let fields = fields
            .iter()
            .map(|t| records.number(t))
            .collect::<Result<Vec<_>, _>>()?;

        let (n_in, n_out) = match fields[..] {
            [n_in, n_out, ..] => (n_in, n_out),
            _ => {
                return Err(ParseError::FieldCount {
                    line,
                    expected: 4,
                    actual: record.len(),
                });
            }
        };
        if fields.len() != 2 + n_in + n_out {
            return Err(ParseError::FieldCount {
                line,
                expected: 3 + n_in + n_out,
                actual: record.len(),
            });
        }

        let gate_type = GateType::from_opcode(opcode).ok_or_else(|| ParseError::UnknownOpcode {
            line,
            opcode: opcode.clone(),
        })?;
        let expected_inputs = gate_type.bristol_inputs();
        if n_in != expected_inputs || n_out != 1 {
            return Err(ParseError::Arity {
                line,
                opcode: opcode.clone(),
                expected: expected_inputs,
                inputs: n_in,
                outputs: n_out,
            });
        }

        let wires_in = &fields[2..2 + n_in];
        let wire_out = fields[2 + n_in];

        let gate = match gate_type {
            GateType::And => Gate::and(drivers.read(line, wires_in[0])?, drivers.read(line, wires_in[1])?),
            GateType::Or => Gate::or(drivers.read(line, wires_in[0])?, drivers.read(line, wires_in[1])?),
            GateType::Xor => Gate::xor(drivers.read(line, wires_in[0])?, drivers.read(line, wires_in[1])?),
            GateType::Not => Gate::not(drivers.read(line, wires_in[0])?),
            GateType::Copy => Gate::copy(drivers.read(line, wires_in[0])?),
            _ => match wires_in[0] {
                0 => Gate::constant(false),
                1 => Gate::constant(true),
                value => return Err(ParseError::BadConstant { line, value }),
            },
        };

        trace!(
            "bristol: line {line} gate[{id}] {} -> wire {wire_out}",
            gate.gate_type.opcode().unwrap_or_default()
        );
        drivers.drive(line, wire_out, id)?;
        body.push(gate);
    }

    let mut trailing = 0;
    while records.next_record()?.is_some() {
        trailing += 1;
    }
    if trailing > 0 {
        return Err(ParseError::GateCount {
            expected: num_gates,
            actual: num_gates + trailing,
        });
    }

    let mut gates = Vec::with_capacity(first_body_gate + body.len());
    gates.extend((0..num_input_wires).map(|_| Gate::input()));
    for wire in num_wires - num_output_wires..num_wires {
        let driver = drivers.drivers[wire].ok_or(ParseError::UndrivenOutput { wire })?;
        gates.push(Gate::output(driver));
    }
    gates.extend(body);

    Ok(Circuit::from_parts(input_widths, output_widths, gates)?)
}

impl FromStr for Circuit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bristol(s.as_bytes())
    }
}
