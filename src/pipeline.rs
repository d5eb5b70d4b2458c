//! End-to-end valuation pipeline.
//!
//! Ties comparable selection and price estimation together behind one call:
//!
//! ```text
//! PropertyRecords -> FeatureExtractor -> FeatureStats (fit + transform)
//!                 -> ranked comparables -> PriceEstimator -> Valuation
//! ```
//!
//! The pipeline is request-scoped and synchronous: every call extracts its
//! own features, fits stats on its own candidate pool, and discards all
//! intermediate state when it returns. Concurrent callers need no
//! coordination.

use crate::config::PipelineConfig;
use crate::estimation::{EstimateError, PriceEstimator, PriceRecommendation};
use crate::features::FeatureExtractor;
use crate::property::{ConditionSummary, PropertyRecord};
use crate::selection::{self, RankedComparable};
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error produced by a pipeline run or construction.
#[derive(Debug)]
pub enum PipelineError {
    Config(crate::config::ConfigError),
    Schema(crate::validation::ValidationError),
    Estimate(EstimateError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Schema(e) => write!(f, "schema validation failed: {e}"),
            Self::Estimate(e) => write!(f, "estimation failed: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Schema(e) => Some(e),
            Self::Estimate(e) => Some(e),
        }
    }
}

impl From<EstimateError> for PipelineError {
    fn from(e: EstimateError) -> Self {
        Self::Estimate(e)
    }
}

/// Complete output of one analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valuation {
    pub comparables: Vec<RankedComparable>,
    pub recommendation: PriceRecommendation,
}

/// The comparable-selection and price-estimation pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Build a pipeline with the default configuration.
    pub fn new() -> Result<Self, PipelineError> {
        Self::from_config(PipelineConfig::default())
    }

    /// Build a pipeline from a configuration.
    ///
    /// Validates the configuration and the feature weight table once, so a
    /// bad schema fails at startup rather than mid-request.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        validation::validate_weights().map_err(PipelineError::Schema)?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run selection and estimation for one subject.
    pub fn analyze(
        &self,
        subject: &PropertyRecord,
        pool: &[PropertyRecord],
        condition: &ConditionSummary,
    ) -> Result<Valuation, PipelineError> {
        let extractor = FeatureExtractor::new();

        if let Err(e) = validation::validate_vector(&extractor.extract(subject)) {
            log::warn!("subject features failed sanity check: {e}");
        }

        let comparables =
            selection::select_with_extractor(&extractor, subject, pool, self.config.num_comps);

        let estimator = PriceEstimator::with_reference_year(extractor.reference_year());
        let recommendation = estimator.estimate_price(subject, &comparables, condition)?;

        log::info!(
            "analyzed {:?}: {} comparables, recommended {} ({} confidence)",
            subject.address,
            comparables.len(),
            recommendation.recommended_price,
            recommendation.confidence
        );

        Ok(Valuation {
            comparables,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let result = Pipeline::from_config(PipelineConfig { num_comps: 0 });
        assert!(matches!(
            result.unwrap_err(),
            PipelineError::Config(ConfigError::InvalidNumComps)
        ));
    }

    #[test]
    fn test_empty_pool_fails_estimation_not_selection() {
        let pipeline = Pipeline::new().unwrap();
        let result = pipeline.analyze(
            &PropertyRecord::default(),
            &[],
            &ConditionSummary::default(),
        );
        assert!(matches!(
            result.unwrap_err(),
            PipelineError::Estimate(EstimateError::NoComparables)
        ));
    }
}
