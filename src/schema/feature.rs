//! Feature definitions and the weighted-distance table.
//!
//! Every property is reduced to the same eight numeric features before
//! normalization and distance calculation. The weights control how much each
//! feature contributes to the KNN distance:
//!
//! | feature         | weight |
//! |-----------------|--------|
//! | latitude        | 0.15   |
//! | longitude       | 0.15   |
//! | sqft            | 0.20   |
//! | bedrooms        | 0.12   |
//! | bathrooms       | 0.08   |
//! | year_built      | 0.10   |
//! | days_since_sale | 0.10   |
//! | has_pool        | 0.10   |
//!
//! The weights sum to 1.0; [`crate::validation::validate_weights`] checks
//! this at pipeline construction.

use serde::{Deserialize, Serialize};

/// Identifier for one of the eight KNN features.
///
/// The discriminant doubles as the slot index in [`FeatureVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Latitude,
    Longitude,
    Sqft,
    Bedrooms,
    Bathrooms,
    YearBuilt,
    DaysSinceSale,
    HasPool,
}

impl Feature {
    /// Number of features in the schema.
    pub const COUNT: usize = 8;

    /// All features in canonical order.
    pub fn all() -> &'static [Feature] {
        &[
            Feature::Latitude,
            Feature::Longitude,
            Feature::Sqft,
            Feature::Bedrooms,
            Feature::Bathrooms,
            Feature::YearBuilt,
            Feature::DaysSinceSale,
            Feature::HasPool,
        ]
    }

    /// Wire name for this feature.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Latitude => "latitude",
            Feature::Longitude => "longitude",
            Feature::Sqft => "sqft",
            Feature::Bedrooms => "bedrooms",
            Feature::Bathrooms => "bathrooms",
            Feature::YearBuilt => "year_built",
            Feature::DaysSinceSale => "days_since_sale",
            Feature::HasPool => "has_pool",
        }
    }

    /// KNN distance weight for this feature.
    pub fn weight(&self) -> f64 {
        match self {
            Feature::Latitude => 0.15,
            Feature::Longitude => 0.15,
            Feature::Sqft => 0.20,
            Feature::Bedrooms => 0.12,
            Feature::Bathrooms => 0.08,
            Feature::YearBuilt => 0.10,
            Feature::DaysSinceSale => 0.10,
            Feature::HasPool => 0.10,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Dense feature vector with one slot per [`Feature`].
///
/// Derived from a [`crate::property::PropertyRecord`] by the
/// [`crate::features::FeatureExtractor`], recomputed per request, and
/// discarded with the request.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; Feature::COUNT],
}

impl FeatureVector {
    /// Create a zeroed vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a feature.
    #[inline]
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Set the value of a feature.
    #[inline]
    pub fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = value;
    }

    /// Iterate over (feature, value) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::all().iter().map(move |&f| (f, self.get(f)))
    }
}
