//! Persisted run output.

pub mod json;
pub mod retention;

pub use json::{research_data_path, write_research_data, ResearchData};
pub use retention::{prune_old_outputs, OUTPUT_PREFIX};
