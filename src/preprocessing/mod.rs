//! Feature preprocessing.
//!
//! Z-score normalization scoped to a single request's candidate pool:
//!
//! - [`FeatureStats`] is fit over the pool's raw vectors (never across
//!   pools from different requests)
//! - [`normalize`](FeatureStats::normalize) standardizes a vector against
//!   those stats, including the subject's vector
//!
//! Stats are an immutable value object passed by reference into pure
//! transforms, so concurrent requests never share mutable state.

pub mod normalization;

pub use normalization::FeatureStats;
