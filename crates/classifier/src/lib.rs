//! Ensemble intent classification for support tickets
//!
//! Combines the rule engine from `ticket-intent-text-processing` with an
//! optional external text classifier:
//!
//! - [`Orchestrator`]: per-request driver with timeout, fallback and
//!   in-band error reporting
//! - [`EnsembleCombiner`]: confidence-adaptive fusion and contextual
//!   adjustments
//! - [`IntentConsolidator`] and [`ProbabilityNormalizer`]: label merging
//!   and distribution shaping
//! - [`HttpTextClassifier`]: `TextClassifier` over a remote endpoint

pub mod consolidate;
pub mod ensemble;
pub mod error;
pub mod http;
pub mod labels;
pub mod normalize;
pub mod orchestrator;

pub use consolidate::IntentConsolidator;
pub use ensemble::EnsembleCombiner;
pub use error::{OrchestratorError, Result};
pub use http::HttpTextClassifier;
pub use labels::LabelMapper;
pub use normalize::{round4, ProbabilityNormalizer, DEFAULT_DOMINANCE_THRESHOLD};
pub use orchestrator::Orchestrator;
