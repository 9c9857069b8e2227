//! Melee battle resolution library.
//!
//! Exposes the roster, battle state, tick resolution, lifecycle machine,
//! and protocol modules for use by integration tests and the binary
//! entry points.

pub mod battle;
pub mod engine;
pub mod machine;
pub mod protocol;
pub mod resolve;
pub mod roster;
pub mod simulate;
