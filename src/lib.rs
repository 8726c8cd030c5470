//! Fuzzy message detection.
//!
//! A sender flags a message for a recipient's public key; the recipient
//! hands a scanning party a detection key that matches the flag for sure,
//! and matches flags meant for anyone else only with a chosen probability.
//!
//! - [`Power2Scheme`]: detection probability `2^-k`, discrete-log based.
//! - [`FractionalScheme`]: detection probability `t / 2^γ`, by garbling a
//!   comparator whose threshold inputs are delivered through DH-derived
//!   pads.
//!
//! Both implement [`FuzzyScheme`].

pub mod circuit;
pub mod config;
mod core;
pub mod errors;
pub mod group;
pub mod hash;
pub mod keys;
pub mod scheme;

pub use crate::core::{
    delta::Delta,
    gate::{Gate, GateId, GateType, Inputs},
    label::{GarbledWire, LABEL_LEN, Label},
};
pub use circuit::{Circuit, CircuitBuilder, CircuitError, GarbledCircuit};
pub use config::{CircuitSource, CircuitTable};
pub use errors::Error;
pub use group::{Curve, GroupElement, GroupError, P256};
pub use keys::{PubKey, SecKey};
pub use scheme::{Ciphertext, FractionalScheme, FuzzyScheme, Power2Scheme};
