use crate::core::gate::{GateId, GateType};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CircuitError {
    #[error("Gate {gate} references gate {target}, but the circuit has {len} gates")]
    DanglingReference {
        gate: GateId,
        target: GateId,
        len: usize,
    },
    #[error("Gate {gate} ({gate_type:?}) has {actual} inputs, expected {expected}")]
    Arity {
        gate: GateId,
        gate_type: GateType,
        expected: usize,
        actual: usize,
    },
    #[error("Gate {gate} must be {expected}, found {actual:?}")]
    Misplaced {
        gate: GateId,
        expected: &'static str,
        actual: GateType,
    },
    #[error("Gate {gate} reads from output sink {target}")]
    ReadsOutput { gate: GateId, target: GateId },
    #[error("Output wire {0} is not connected")]
    UnconnectedOutput(usize),
    #[error("Cyclic wiring detected at gate {0}")]
    Cycle(GateId),
}
