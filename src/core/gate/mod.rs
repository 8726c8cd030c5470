pub mod garbling;

pub use crate::core::gate_type::GateType;

pub type GateId = usize;

/// References to the gates feeding this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Inputs {
    None,
    One(GateId),
    Two(GateId, GateId),
}

impl Inputs {
    pub fn len(&self) -> usize {
        match self {
            Inputs::None => 0,
            Inputs::One(_) => 1,
            Inputs::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Inputs::None)
    }

    pub fn left(&self) -> Option<GateId> {
        match *self {
            Inputs::None => None,
            Inputs::One(a) | Inputs::Two(a, _) => Some(a),
        }
    }

    pub fn right(&self) -> Option<GateId> {
        match *self {
            Inputs::Two(_, b) => Some(b),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = GateId> {
        self.left().into_iter().chain(self.right())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate {
    pub gate_type: GateType,
    pub inputs: Inputs,
}

impl Gate {
    #[must_use]
    pub fn input() -> Self {
        Self {
            gate_type: GateType::Input,
            inputs: Inputs::None,
        }
    }

    #[must_use]
    pub fn output(from: GateId) -> Self {
        Self {
            gate_type: GateType::Output,
            inputs: Inputs::One(from),
        }
    }

    #[must_use]
    pub fn constant(value: bool) -> Self {
        Self {
            gate_type: GateType::Const(value),
            inputs: Inputs::None,
        }
    }

    #[must_use]
    pub fn not(a: GateId) -> Self {
        Self {
            gate_type: GateType::Not,
            inputs: Inputs::One(a),
        }
    }

    #[must_use]
    pub fn copy(a: GateId) -> Self {
        Self {
            gate_type: GateType::Copy,
            inputs: Inputs::One(a),
        }
    }

    #[must_use]
    pub fn and(a: GateId, b: GateId) -> Self {
        Self {
            gate_type: GateType::And,
            inputs: Inputs::Two(a, b),
        }
    }

    #[must_use]
    pub fn or(a: GateId, b: GateId) -> Self {
        Self {
            gate_type: GateType::Or,
            inputs: Inputs::Two(a, b),
        }
    }

    #[must_use]
    pub fn xor(a: GateId, b: GateId) -> Self {
        Self {
            gate_type: GateType::Xor,
            inputs: Inputs::Two(a, b),
        }
    }

    /// Whether the number of references agrees with the gate type.
    pub fn is_well_formed(&self) -> bool {
        self.inputs.len() == self.gate_type.arity()
    }
}
