//! Text cleanup and chunking applied to recognized text.

mod chunker;
mod postprocess;

pub use chunker::chunk;
pub use postprocess::{process as post_process, CORRECTION_CONFIDENCE_CEILING};
