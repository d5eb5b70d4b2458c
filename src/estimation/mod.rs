//! KNN-weighted price estimation.
//!
//! Turns the K selected comparables into a price recommendation:
//!
//! 1. **Base price** - inverse-distance-weighted mean of the comparables'
//!    sale prices, size-normalized to the subject's square footage:
//!    `price = Σ(w_i * ppsf_i * subject_sqft) / Σ(w_i)` with
//!    `w_i = 1 / (1 + knn_distance_i)`.
//! 2. **Condition adjustment** - fixed lookup by rating plus a fine-tune of
//!    1 percentage point per 10 score points away from the Fair baseline
//!    of 70.
//! 3. **Feature adjustments** - the independent rules in [`adjustments`].
//! 4. **Range and confidence** - range width from the coefficient of
//!    variation of comparable prices (clamped to 5-15%), confidence from
//!    comparable count and mean similarity, downgraded when the condition
//!    summary lists concerns.
//!
//! Everything here is pure; an estimation call neither mutates its inputs
//! nor keeps state between calls.

pub mod adjustments;

pub use adjustments::FeatureAdjustment;

use crate::property::{ConditionSummary, PropertyRecord};
use crate::selection::RankedComparable;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error produced by price estimation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    /// No comparables were supplied; a price cannot be grounded.
    NoComparables,
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoComparables => {
                write!(f, "no comparables provided for price estimation")
            }
        }
    }
}

impl std::error::Error for EstimateError {}

/// Confidence label for a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// One step down; `Low` stays `Low`.
    fn downgrade(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            Confidence::Medium | Confidence::Low => Confidence::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

/// Low/high bounds around the recommended price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: i64,
    pub high: i64,
}

/// Condition vs. per-feature adjustment breakdown, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentBreakdown {
    /// Condition adjustment in percent (e.g. 8.0 for +8%).
    pub condition_adjustment: f64,
    /// Per-feature adjustments in percent, in rule order.
    pub feature_adjustments: Vec<FeatureAdjustment>,
}

/// A complete price recommendation. Built once per estimation call and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecommendation {
    pub recommended_price: i64,
    pub price_range: PriceRange,
    pub confidence: Confidence,
    pub price_per_sqft: f64,
    /// Pre-adjustment price.
    pub base_price: i64,
    /// Total adjustment in percent.
    pub total_adjustment_pct: f64,
    pub adjustments: AdjustmentBreakdown,
    pub methodology: String,
}

/// Estimates prices from ranked comparables.
///
/// Carries the reference year for age arithmetic; construct with
/// [`PriceEstimator::new`] for wall-clock behavior or
/// [`PriceEstimator::with_reference_year`] in tests.
#[derive(Debug, Clone)]
pub struct PriceEstimator {
    reference_year: i32,
}

impl PriceEstimator {
    pub fn new() -> Self {
        Self {
            reference_year: Utc::now().year(),
        }
    }

    pub fn with_reference_year(reference_year: i32) -> Self {
        Self { reference_year }
    }

    /// Produce a price recommendation for the subject.
    ///
    /// Fails with [`EstimateError::NoComparables`] on an empty comparable
    /// list; every other degenerate input degrades to a defaulted value.
    pub fn estimate_price(
        &self,
        subject: &PropertyRecord,
        comparables: &[RankedComparable],
        condition: &ConditionSummary,
    ) -> Result<PriceRecommendation, EstimateError> {
        if comparables.is_empty() {
            return Err(EstimateError::NoComparables);
        }

        let base_price = base_price(subject, comparables);
        let condition_adjustment = condition_adjustment(condition);

        let feature_adjustments: Vec<FeatureAdjustment> = adjustments::RULES
            .iter()
            .filter_map(|rule| rule(subject, comparables, self.reference_year))
            .collect();

        let total_adjustment = condition_adjustment
            + feature_adjustments.iter().map(|a| a.pct).sum::<f64>();
        let recommended_price = (base_price * (1.0 + total_adjustment)) as i64;

        let price_range = price_range(recommended_price, comparables);
        let confidence = confidence(comparables, condition);

        let sqft = subject.living_area().max(1.0);
        let price_per_sqft = round2(recommended_price as f64 / sqft);

        log::debug!(
            "estimated {recommended_price} from base {base_price:.0} with {:+.2}% total adjustment",
            total_adjustment * 100.0
        );

        Ok(PriceRecommendation {
            recommended_price,
            price_range,
            confidence,
            price_per_sqft,
            base_price: base_price as i64,
            total_adjustment_pct: round2(total_adjustment * 100.0),
            adjustments: AdjustmentBreakdown {
                condition_adjustment: round2(condition_adjustment * 100.0),
                feature_adjustments: feature_adjustments
                    .into_iter()
                    .map(|a| FeatureAdjustment {
                        name: a.name,
                        pct: round2(a.pct * 100.0),
                    })
                    .collect(),
            },
            methodology: methodology(comparables),
        })
    }
}

impl Default for PriceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper over [`PriceEstimator::estimate_price`] anchored at
/// the current year.
pub fn estimate_price(
    subject: &PropertyRecord,
    comparables: &[RankedComparable],
    condition: &ConditionSummary,
) -> Result<PriceRecommendation, EstimateError> {
    PriceEstimator::new().estimate_price(subject, comparables, condition)
}

/// Inverse-distance-weighted, size-normalized mean of comparable prices.
///
/// Comparables without a usable size or price are skipped; if none remain,
/// falls back to the unweighted mean of raw sale prices, then to 0.
fn base_price(subject: &PropertyRecord, comparables: &[RankedComparable]) -> f64 {
    let subject_sqft = match subject.living_area() {
        area if area > 0.0 => area,
        _ => 1.0,
    };

    let mut prices = Vec::with_capacity(comparables.len());
    let mut weights = Vec::with_capacity(comparables.len());

    for comp in comparables {
        let comp_sqft = comp.record.living_area();
        let comp_price = comp.record.sale_price.unwrap_or(0.0);
        if comp_sqft > 0.0 && comp_price > 0.0 {
            let price_per_sqft = comp_price / comp_sqft;
            prices.push(price_per_sqft * subject_sqft);
            // Distance 0 caps the weight at 1.
            weights.push(1.0 / (1.0 + comp.knn_distance));
        }
    }

    if prices.is_empty() {
        let raw: Vec<f64> = comparables
            .iter()
            .filter_map(|c| c.record.sale_price)
            .filter(|&p| p > 0.0)
            .collect();
        if raw.is_empty() {
            log::warn!("no comparable had a usable sale price, base price is 0");
            return 0.0;
        }
        log::warn!("no comparable had usable size and price, using unweighted mean");
        return raw.iter().sum::<f64>() / raw.len() as f64;
    }

    let total_weight: f64 = weights.iter().sum();
    if total_weight == 0.0 {
        return prices.iter().sum::<f64>() / prices.len() as f64;
    }

    prices
        .iter()
        .zip(&weights)
        .map(|(p, w)| p * w)
        .sum::<f64>()
        / total_weight
}

/// Rating lookup plus 1 percentage point per 10 score points off the Fair
/// baseline of 70.
fn condition_adjustment(condition: &ConditionSummary) -> f64 {
    condition.overall_condition.base_adjustment() + (condition.condition_score - 70.0) / 1000.0
}

/// Range width from the coefficient of variation of comparable sale prices,
/// clamped to [5%, 15%]; 10% when fewer than two comparables.
fn price_range(recommended_price: i64, comparables: &[RankedComparable]) -> PriceRange {
    let prices: Vec<f64> = comparables
        .iter()
        .map(|c| c.record.sale_price.unwrap_or(0.0))
        .collect();

    let range_pct = if prices.len() > 1 {
        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>()
            / (prices.len() - 1) as f64;
        let std_dev = variance.sqrt();
        let cv = if mean > 0.0 { std_dev / mean } else { 0.1 };
        cv.clamp(0.05, 0.15)
    } else {
        0.10
    };

    PriceRange {
        low: (recommended_price as f64 * (1.0 - range_pct)) as i64,
        high: (recommended_price as f64 * (1.0 + range_pct)) as i64,
    }
}

/// Comparable count gates confidence; mean similarity sets it; condition
/// concerns downgrade it one level.
fn confidence(comparables: &[RankedComparable], condition: &ConditionSummary) -> Confidence {
    if comparables.len() < 3 {
        return Confidence::Low;
    }

    let avg_similarity = comparables.iter().map(|c| c.similarity_score).sum::<f64>()
        / comparables.len() as f64;

    let level = if avg_similarity >= 75.0 {
        Confidence::High
    } else if avg_similarity >= 60.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    if condition.concerns.is_empty() {
        level
    } else {
        level.downgrade()
    }
}

fn methodology(comparables: &[RankedComparable]) -> String {
    let avg_distance = comparables.iter().map(|c| c.knn_distance).sum::<f64>()
        / comparables.len() as f64;
    format!(
        "Price estimated using K-Nearest Neighbors regression with K={} comparable properties, \
         selected on location, size, bed/bath configuration, age, and sale recency. \
         Weighted average of sale prices using inverse distance weighting \
         (avg distance: {avg_distance:.4}). Additional adjustments applied for \
         property condition and key features.",
        comparables.len()
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
