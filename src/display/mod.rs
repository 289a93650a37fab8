//! Human-readable renderings of graphs and their evaluations.
pub mod trace;

pub use trace::format_trace;
