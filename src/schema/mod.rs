//! Feature schema for comparable selection.
//!
//! The KNN search operates on a fixed set of eight property features. This
//! module defines:
//!
//! - [`Feature`]: the feature identifiers and their canonical ordering
//! - [`FeatureVector`]: a dense vector with one slot per feature
//! - The per-feature distance weights (summing to 1.0)

pub mod feature;

pub use feature::{Feature, FeatureVector};
