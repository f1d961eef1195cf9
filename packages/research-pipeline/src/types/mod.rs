//! Domain types for the research pipeline.

pub mod config;
pub mod hit;
pub mod report;
pub mod topic;
