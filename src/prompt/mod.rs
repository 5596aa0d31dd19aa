//! Few-shot prompt assembly for both drivers

pub mod rewrite;
pub mod translate;

pub use rewrite::{LineStyle, ReferencePair};
pub use translate::{BatchEntry, DEFAULT_BATCH_SIZE};
