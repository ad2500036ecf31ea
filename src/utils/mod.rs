//! Shared helpers.

pub mod exec;
pub mod plural;
