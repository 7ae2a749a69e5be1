//! Domain layer types and invariants.

pub mod comments;
pub mod entities;
pub mod read_stats;
