//! Core traits for the intent classification system
//!
//! ```text
//! External collaborators:
//!   - TextClassifier: statistical text classifier returning label/score pairs
//! ```

mod classifier;

pub use classifier::{LabelScore, RawPredictions, TextClassifier};
