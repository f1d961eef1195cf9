//! AI scorer implementations.

pub mod openai;
pub mod prompts;

pub use openai::OpenAIScorer;
