//! Prelude for convenient imports.
//!
//! ```ignore
//! use valuation_engine::prelude::*;
//!
//! let pipeline = Pipeline::new()?;
//! let valuation = pipeline.analyze(&subject, &sales, &condition)?;
//! ```

// Pipeline
pub use crate::config::PipelineConfig;
pub use crate::pipeline::{Pipeline, PipelineError, Valuation};

// Data model
pub use crate::property::{ConditionRating, ConditionSummary, PropertyRecord};

// Selection
pub use crate::features::FeatureExtractor;
pub use crate::selection::{select_top_comparables, ComparableBreakdown, RankedComparable};

// Estimation
pub use crate::estimation::{
    estimate_price, Confidence, EstimateError, PriceEstimator, PriceRange, PriceRecommendation,
};
