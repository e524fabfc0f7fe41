//! SchemeSage Core — error taxonomy, configuration, phrase tables.

pub mod config;
pub mod error;
pub mod phrases;

pub use config::{EmbedderKind, GreetingMatch, Profile, SchemeSageConfig};
pub use error::{Error, Result};
pub use phrases::PhraseTable;
