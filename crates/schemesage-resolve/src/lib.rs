//! SchemeSage Resolve — turns retrieval results into the final answer text.

pub mod answer;

pub use answer::{Assembled, ResponseAssembler, MAX_SCHEMES};
