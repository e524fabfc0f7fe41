//! SchemeSage Query — per-request text analysis.
//!
//! Normalization, the lexicon-backed validity filter, greeting/small-talk
//! detection and requested-count extraction. Everything here is pure apart
//! from the injected random source used to pick canned replies.

pub mod count;
pub mod greeting;
pub mod lexicon;
pub mod normalize;
pub mod validity;

pub use count::{extract_count, CountExtractor, CountPattern, DEFAULT_COUNT};
pub use greeting::{GreetingDetector, ShortCircuit, SmallTalk};
pub use lexicon::Lexicon;
pub use normalize::normalize;
pub use validity::ValidityFilter;
