//! SchemeSage Runtime — request pipeline, orchestrator and startup wiring.
//!
//! `bootstrap` turns a `SchemeSageConfig` into an `Engine`; the engine's
//! `Orchestrator` answers user messages with a `Reply` and never fails.

pub mod bootstrap;
pub mod orchestrator;
pub mod pipeline;
pub mod types;

pub use bootstrap::{bootstrap, Engine};
pub use orchestrator::{Orchestrator, MAX_IN_FLIGHT_RETRIEVALS};
pub use pipeline::{Pipeline, PipelineOptions, MIN_CANDIDATES};
pub use types::*;
