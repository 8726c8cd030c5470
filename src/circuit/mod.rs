//! # Garbled Circuit Engine
//!
//! Yao garbling with Free-XOR and point-and-permute over circuits read from
//! BRISTOL files.
//!
//! ## Circuit Flow
//!
//! ```text
//! ┌─────────────┐    ┌────────────────┐   pack()   ┌──────────────────┐
//! │   Circuit   │───▶│ GarbledCircuit │───────────▶│ EvaluatorCircuit │
//! │ (BRISTOL)   │    │  (Garbling)    │   bytes    │   (unpack())     │
//! └─────────────┘    └────────────────┘            └──────────────────┘
//!       │                    │                             │
//!   • Gate list          • Global Δ                    • Input label pairs
//!   • Input widths       • Label pair per gate         • Gate tables
//!   • Output widths      • Gate tables                 • evaluate() → output labels
//! ```
//!
//! ## Labels
//!
//! - Every non-output label pair satisfies `label1 = label0 ⊕ Δ`, with the
//!   permutation bit of Δ set.
//! - XOR gates carry no table: `out0 = a0 ⊕ b0`.
//! - Output wires carry structured labels: a random prefix and the
//!   plaintext bit in the last byte. Anyone holding an output label can
//!   read the bit, see [`decode_output_labels`].
//! - A table row is `H(row || x[..15] || y[..15])[..16] ⊕ out`, with the row
//!   chosen from the permutation bits of the input labels.
//!
//! Table sizes: XOR 0, CONST 1, NOT/COPY/OUTPUT 2, AND/OR 4.

pub mod bristol;
pub mod errors;
pub mod evaluation;
pub mod garbling;
pub mod packing;
pub mod structure;

pub use bristol::{ParseError, parse_bristol};
pub use errors::CircuitError;
pub use evaluation::{Error, bits_to_u64, decode_output_labels, decode_with_mapping, u64_to_bits};
pub use garbling::{DefaultHasher, GarbledCircuit};
pub use packing::{EvaluatorCircuit, PackingError, packed_len};
pub use structure::{Circuit, CircuitBuilder, GateCount};
