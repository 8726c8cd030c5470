#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateType {
    And,
    Or,
    Xor,
    Not,
    /// Wire copy (`EQW`).
    Copy,
    /// Constant assignment (`EQ`).
    Const(bool),
    /// Synthetic source for a circuit input wire.
    Input,
    /// Synthetic sink for a circuit output wire.
    Output,
}

impl GateType {
    pub const fn f(&self) -> fn(bool, bool) -> bool {
        match self {
            GateType::And => |a, b| a & b,
            GateType::Or => |a, b| a | b,
            GateType::Xor => |a, b| a ^ b,
            GateType::Not => |a, _| !a,
            GateType::Copy | GateType::Output | GateType::Input => |a, _| a,
            GateType::Const(false) => |_, _| false,
            GateType::Const(true) => |_, _| true,
        }
    }

    /// Number of input gate references.
    pub const fn arity(&self) -> usize {
        match self {
            GateType::Input | GateType::Const(_) => 0,
            GateType::Not | GateType::Copy | GateType::Output => 1,
            GateType::And | GateType::Or | GateType::Xor => 2,
        }
    }

    /// Rows in the garbled table of this gate. Inputs have no table at all.
    pub const fn table_rows(&self) -> usize {
        match self {
            GateType::Input | GateType::Xor => 0,
            GateType::Const(_) => 1,
            GateType::Not | GateType::Copy | GateType::Output => 2,
            GateType::And | GateType::Or => 4,
        }
    }

    /// BRISTOL opcode of the gate. The pseudo gates have none.
    pub fn opcode(&self) -> Option<&'static str> {
        match self {
            GateType::And => Some("AND"),
            GateType::Or => Some("OR"),
            GateType::Xor => Some("XOR"),
            GateType::Not => Some("INV"),
            GateType::Copy => Some("EQW"),
            GateType::Const(_) => Some("EQ"),
            GateType::Input | GateType::Output => None,
        }
    }

    /// Gate kind named by a BRISTOL opcode. `EQ` yields `Const(false)`; the
    /// bit itself sits in the record.
    pub fn from_opcode(opcode: &str) -> Option<Self> {
        match opcode {
            "AND" => Some(GateType::And),
            "OR" => Some(GateType::Or),
            "XOR" => Some(GateType::Xor),
            "INV" => Some(GateType::Not),
            "EQW" => Some(GateType::Copy),
            "EQ" => Some(GateType::Const(false)),
            _ => None,
        }
    }

    /// Input wire fields a BRISTOL record of this kind carries. `EQ` holds
    /// its constant in the single input field.
    pub const fn bristol_inputs(&self) -> usize {
        match self {
            GateType::Const(_) => 1,
            other => other.arity(),
        }
    }
}
