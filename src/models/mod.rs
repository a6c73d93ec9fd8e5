//! Data model layer: charts, judgements, configuration, and catalog types.

pub mod chart;
pub mod hit_window;
pub mod judgement;
pub mod result;
pub mod search;
pub mod settings;
