//! Input and schema validation.
//!
//! Two checks guard the pipeline:
//!
//! 1. **Weight table** - the per-feature KNN weights must sum to 1.0.
//!    Checked once at pipeline construction; a mismatch is a programming
//!    error in the schema, not a data problem.
//! 2. **Vector sanity** - extracted feature vectors are scanned for
//!    NaN/Inf, which would silently poison every downstream distance.
//!    The pipeline logs and continues; callers wanting hard failures can
//!    invoke [`validate_vector`] themselves.

use crate::schema::{Feature, FeatureVector};
use std::fmt;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Schema validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The weight table does not sum to 1.0.
    WeightSumMismatch { sum: f64 },
    /// A feature value is NaN or infinite.
    NonFiniteFeature { feature: &'static str, value: f64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightSumMismatch { sum } => {
                write!(f, "feature weights sum to {sum}, expected 1.0")
            }
            Self::NonFiniteFeature { feature, value } => {
                write!(f, "feature {feature} has non-finite value {value}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that the KNN weight table sums to 1.0.
pub fn validate_weights() -> Result<(), ValidationError> {
    let sum: f64 = Feature::all().iter().map(|f| f.weight()).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ValidationError::WeightSumMismatch { sum });
    }
    Ok(())
}

/// Check a feature vector for NaN/Inf values.
pub fn validate_vector(vector: &FeatureVector) -> Result<(), ValidationError> {
    for (feature, value) in vector.iter() {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteFeature {
                feature: feature.name(),
                value,
            });
        }
    }
    Ok(())
}
