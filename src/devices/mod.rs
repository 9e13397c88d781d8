//! Device records, categories and name classification.

/// Fixed device categories.
pub mod category;
/// Keyword-table name classifier.
pub mod classifier;
pub mod types;

// Re-export the main types for convenience
pub use category::Category;
pub use classifier::{Classifier, KeywordConfig};
pub use types::{Device, DeviceDraft, DevicePatch, validate};
