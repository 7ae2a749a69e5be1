//! Application services layer.

pub mod clock;
pub mod comments;
pub mod dashboard;
pub mod error;
pub mod read_stats;
pub mod repos;

#[cfg(test)]
pub(crate) mod testing;
