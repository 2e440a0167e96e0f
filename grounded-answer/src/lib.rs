//! grounded-answer: Evidence-gated answer synthesis
//!
//! The final stage of the Grounded pipeline. Given retrieval results that
//! passed the confidence gate, this crate produces an answer by one of
//! two strategies and packages the outcome as a structured response:
//!
//! - **Templated**: deterministic intent routing over fixed templates,
//!   with structural extraction (menu, opening hours) from evidence text
//! - **Generative**: a single constrained generation call whose draft
//!   must quote the evidence verbatim or be refused
//!
//! Refusals are first-class results carrying a machine-readable reason,
//! never errors. See [`pipeline::SupportPipeline`] for the entry point.

pub mod config;
pub mod extract;
pub mod generate;
pub mod intents;
pub mod pipeline;
pub mod types;
pub mod verify;

pub use config::{AnswerMode, GeneratorConfig, PipelineConfig};
pub use generate::{GenerationProvider, OllamaGenerator};
pub use pipeline::SupportPipeline;
pub use types::{AnswerResult, RefusalReason, clamp_confidence};
pub use verify::{VerifiedAnswer, VerifyRejection, verify_draft};
