//! Domain types for the litrack literature tracker
//!
//! This crate provides the models shared by the sync core and its front ends:
//! - LiteratureEntry: one catalogued paper with its rating and reading status
//! - Status: reading workflow state (To Read → Reading → Completed → Benchmark)
//! - Roster: the team members an entry can be assigned to
//! - Validation: write-time checks on entries

pub mod entry;
pub mod roster;
pub mod status;
pub mod validation;

pub use entry::*;
pub use roster::*;
pub use status::*;
pub use validation::*;
