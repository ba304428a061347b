//! Vampire Match (workspace facade crate).
//!
//! Re-exports the engine as `vampire_match::{core, types}` and adds the
//! headless [`sim`] driver used by the `vampire-match` binary.

pub use vampire_match_core as core;
pub use vampire_match_types as types;

pub mod sim;
