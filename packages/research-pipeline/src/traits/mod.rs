//! Core trait abstractions for the pipeline's external collaborators.

pub mod scorer;
pub mod searcher;
