//! Property records and condition summaries.
//!
//! [`PropertyRecord`] is the raw input the service layer hands to the core:
//! a sale listing or the subject property itself. All fields are optional or
//! defaulted so that partially populated records degrade gracefully instead
//! of failing deserialization.
//!
//! [`ConditionSummary`] is produced by the (external) transcript analyzer and
//! consumed by the price estimator. The core treats it as opaque input.

use serde::{Deserialize, Serialize};

/// A residential property record.
///
/// Loaded and normalized by the caller; read-only to the core. Square
/// footage may arrive under either `sqft` or the legacy `square_footage`
/// key, and pool/garage flags under short or long names - serde aliases
/// accept both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyRecord {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Living area in square feet (canonical key).
    pub sqft: Option<f64>,
    /// Alternate living-area key used by older record sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<f64>,

    pub bedrooms: f64,
    pub bathrooms: f64,
    pub year_built: Option<i32>,

    #[serde(alias = "pool")]
    pub has_private_pool: bool,
    pub has_community_pool: bool,
    #[serde(alias = "garage")]
    pub has_garage: bool,

    /// Sale price in whole currency units; absent for the subject property.
    pub sale_price: Option<f64>,
    /// Sale date string, RFC 3339 or `YYYY-MM-DD`.
    pub sale_date: Option<String>,
    /// Explicit days since sale; overrides `sale_date` when non-zero.
    pub days_since_sale: Option<i64>,
}

impl PropertyRecord {
    /// Living area in square feet, preferring `sqft` over `square_footage`,
    /// falling back to 0.
    pub fn living_area(&self) -> f64 {
        self.sqft.or(self.square_footage).unwrap_or(0.0)
    }

    /// Whether the property has access to any pool, private or community.
    pub fn has_pool(&self) -> bool {
        self.has_private_pool || self.has_community_pool
    }
}

/// Overall condition rating from the condition analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConditionRating {
    Excellent,
    Good,
    #[default]
    Fair,
    Poor,
}

impl ConditionRating {
    /// Base price adjustment for this rating, as a signed fraction.
    pub fn base_adjustment(&self) -> f64 {
        match self {
            ConditionRating::Excellent => 0.08,
            ConditionRating::Good => 0.03,
            ConditionRating::Fair => 0.0,
            ConditionRating::Poor => -0.10,
        }
    }
}

/// Condition summary for the subject property.
///
/// Produced outside the core (keyword scan of a walkthrough transcript);
/// only the rating, numeric score, and concern list influence pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSummary {
    pub overall_condition: ConditionRating,
    /// 0-100 score; 70 is the Fair baseline.
    pub condition_score: f64,
    pub concerns: Vec<String>,
}

impl Default for ConditionSummary {
    fn default() -> Self {
        Self {
            overall_condition: ConditionRating::Fair,
            condition_score: 70.0,
            concerns: Vec::new(),
        }
    }
}
