//! Data quality heuristics.
//!
//! This module turns a [`crate::DatasetSummary`] and [`crate::MissingTable`]
//! into boolean diagnostic flags and a composite score in [0, 1]. Each flag is
//! an independent rule with a fixed penalty; the score is one minus the sum of
//! triggered penalties, clamped.

mod engine;
mod identifiers;

pub use engine::{QUALITY_RULES, QualityFlagEngine, compute_quality_flags};
pub use identifiers::is_identifier_like;
