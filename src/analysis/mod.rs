//! Read-only structural analysis of expression graphs.
pub mod topology;

pub use topology::GraphStats;
