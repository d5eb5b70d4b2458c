//! Valuation Engine
//!
//! Comparable selection and KNN price estimation for residential
//! properties.
//!
//! Given a subject property and a pool of recently sold candidates, the
//! engine finds the K most similar sales (weighted nearest-neighbor search
//! over normalized features) and derives a recommended listing price from
//! them (inverse-distance-weighted average with deterministic rule-based
//! adjustments).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Valuation Engine                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  schema/        - Feature definitions and distance weights   │
//! │  features/      - Record -> feature vector extraction        │
//! │  preprocessing/ - Pool-scoped z-score normalization          │
//! │  selection/     - Weighted KNN ranking of comparables        │
//! │  estimation/    - Weighted price regression + adjustments    │
//! │  pipeline       - Request-scoped orchestration               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The surrounding service owns I/O: loading records, analyzing condition
//! transcripts, and serializing results. Everything in this crate is a pure
//! function of its inputs.
//!
//! # Example
//!
//! ```ignore
//! use valuation_engine::prelude::*;
//!
//! let pipeline = Pipeline::new()?;
//! let valuation = pipeline.analyze(&subject, &sales, &condition)?;
//! println!("recommended: {}", valuation.recommendation.recommended_price);
//! ```
//!
//! The two lower-level entry points are also exported directly:
//! [`select_top_comparables`] and [`estimate_price`].

pub mod config;
pub mod estimation;
pub mod features;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod property;
pub mod schema;
pub mod selection;
pub mod validation;

// Re-exports - data model
pub use property::{ConditionRating, ConditionSummary, PropertyRecord};

// Re-exports - schema
pub use schema::{Feature, FeatureVector};

// Re-exports - core entry points
pub use estimation::{
    estimate_price, Confidence, EstimateError, FeatureAdjustment, PriceEstimator, PriceRange,
    PriceRecommendation,
};
pub use pipeline::{Pipeline, PipelineError, Valuation};
pub use selection::{select_top_comparables, RankedComparable};

// Re-exports - configuration
pub use config::PipelineConfig;
