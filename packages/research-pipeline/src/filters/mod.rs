//! Gates: pure filter stages over a topic's hits.
//!
//! Every gate takes ownership of a hit list and returns the survivors in
//! their original relative order. Applying a gate twice is the same as
//! applying it once.

pub mod cross_run;
pub mod date;
pub mod dedup;
pub mod keyword;

pub use cross_run::{filter_seen, CrossRunMemory, RESEARCH_DATA_PREFIX};
pub use date::filter_by_date;
pub use dedup::{deduplicate, title_fingerprint};
pub use keyword::filter_by_keywords;
