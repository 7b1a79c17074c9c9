//! Analyzer module - description analysis, repair and the file-level engine

pub mod description;
pub mod engine;
pub mod fixpoint;

pub use engine::{AggregateStats, LintEngine};
