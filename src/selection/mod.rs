//! Comparable selection via weighted K-nearest neighbors.
//!
//! Ranks a candidate pool of sold properties by similarity to a subject
//! property and returns the K closest. The distance metric is a weighted
//! Euclidean distance over z-score-normalized feature vectors:
//!
//! ```text
//! distance = sqrt(Σ weight_f * (subject_f - candidate_f)^2)
//! ```
//!
//! with the per-feature weights from [`crate::schema::Feature::weight`].
//! Distances map to a 0-100 similarity score via exponential decay,
//! `similarity = 100 * e^(-distance)`, so identical vectors score 100.
//!
//! Geographic distance in miles (haversine) is carried alongside for
//! human-readable reporting; it does not participate in ranking.

use crate::features::FeatureExtractor;
use crate::preprocessing::FeatureStats;
use crate::property::PropertyRecord;
use crate::schema::{Feature, FeatureVector};
use serde::{Deserialize, Serialize};

/// Earth radius in miles, for the haversine formula.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Distance metric label reported in score breakdowns.
const KNN_METHOD: &str = "Weighted Euclidean Distance";

/// Default number of comparables to select.
pub const DEFAULT_NUM_COMPS: usize = 5;

/// A candidate property ranked against the subject.
///
/// Owns a clone of the underlying record plus the derived ranking fields.
/// Result lists are always sorted ascending by `knn_distance` (equivalently
/// descending by `similarity_score`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedComparable {
    #[serde(flatten)]
    pub record: PropertyRecord,
    /// Similarity to the subject, 0-100.
    pub similarity_score: f64,
    /// Weighted Euclidean distance in normalized feature space.
    pub knn_distance: f64,
    /// Great-circle distance to the subject in miles.
    pub distance_miles: f64,
    pub score_breakdown: ComparableBreakdown,
}

/// Unnormalized per-feature differences, for readability in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparableBreakdown {
    pub distance_miles: f64,
    pub sqft_diff: f64,
    /// Square-footage difference as a percentage of the subject's area;
    /// 0 when the subject's area is unknown.
    pub sqft_pct_diff: f64,
    pub bedrooms_diff: f64,
    pub bathrooms_diff: f64,
    pub age_diff_years: f64,
    /// The comparable's sale recency in days.
    pub days_since_sale: f64,
    pub has_pool_match: bool,
    /// Label for the distance metric behind the ranking.
    pub knn_method: String,
}

/// Select the K most similar properties to the subject.
///
/// Fits normalization stats on the candidate pool, normalizes the subject
/// with those same stats, ranks by weighted distance (stable sort, so input
/// order breaks ties), and returns the first `num_comps`.
///
/// An empty pool returns an empty list. `num_comps` larger than the pool
/// returns the whole pool.
pub fn select_top_comparables(
    subject: &PropertyRecord,
    pool: &[PropertyRecord],
    num_comps: usize,
) -> Vec<RankedComparable> {
    select_with_extractor(&FeatureExtractor::new(), subject, pool, num_comps)
}

/// Selection with an injected extractor, for deterministic date arithmetic.
pub fn select_with_extractor(
    extractor: &FeatureExtractor,
    subject: &PropertyRecord,
    pool: &[PropertyRecord],
    num_comps: usize,
) -> Vec<RankedComparable> {
    if pool.is_empty() {
        return Vec::new();
    }

    let subject_features = extractor.extract(subject);
    let pool_features: Vec<FeatureVector> = pool.iter().map(|r| extractor.extract(r)).collect();

    let stats = FeatureStats::fit(&pool_features);
    let subject_normalized = stats.normalize(&subject_features);

    let mut ranked: Vec<(usize, f64)> = pool_features
        .iter()
        .enumerate()
        .map(|(i, features)| {
            let candidate_normalized = stats.normalize(features);
            (i, weighted_distance(&subject_normalized, &candidate_normalized))
        })
        .collect();

    // Stable sort keeps input order for equal distances.
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(num_comps);

    log::debug!(
        "ranked {} candidates, selected {} (best distance {:.4})",
        pool.len(),
        ranked.len(),
        ranked.first().map(|&(_, d)| d).unwrap_or(f64::NAN)
    );

    ranked
        .into_iter()
        .map(|(index, distance)| {
            let candidate = &pool[index];
            let candidate_features = &pool_features[index];
            let miles = haversine_miles(
                subject_features.get(Feature::Latitude),
                subject_features.get(Feature::Longitude),
                candidate_features.get(Feature::Latitude),
                candidate_features.get(Feature::Longitude),
            );
            RankedComparable {
                record: candidate.clone(),
                similarity_score: round_to(100.0 * (-distance).exp(), 2),
                knn_distance: round_to(distance, 4),
                distance_miles: round_to(miles, 2),
                score_breakdown: breakdown(&subject_features, candidate_features, miles),
            }
        })
        .collect()
}

/// Weighted Euclidean distance between two normalized vectors.
fn weighted_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let mut sum = 0.0;
    for &feature in Feature::all() {
        let diff = a.get(feature) - b.get(feature);
        sum += feature.weight() * diff * diff;
    }
    sum.sqrt()
}

/// Great-circle distance in miles between two coordinates.
fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

fn breakdown(
    subject: &FeatureVector,
    candidate: &FeatureVector,
    miles: f64,
) -> ComparableBreakdown {
    let subject_sqft = subject.get(Feature::Sqft);
    let sqft_diff = (subject_sqft - candidate.get(Feature::Sqft)).abs();
    let sqft_pct_diff = if subject_sqft > 0.0 {
        round_to(sqft_diff / subject_sqft * 100.0, 1)
    } else {
        0.0
    };

    ComparableBreakdown {
        distance_miles: round_to(miles, 2),
        sqft_diff,
        sqft_pct_diff,
        bedrooms_diff: (subject.get(Feature::Bedrooms) - candidate.get(Feature::Bedrooms)).abs(),
        bathrooms_diff: (subject.get(Feature::Bathrooms) - candidate.get(Feature::Bathrooms))
            .abs(),
        age_diff_years: (subject.get(Feature::YearBuilt) - candidate.get(Feature::YearBuilt))
            .abs(),
        days_since_sale: candidate.get(Feature::DaysSinceSale),
        has_pool_match: subject.get(Feature::HasPool) == candidate.get(Feature::HasPool),
        knn_method: KNN_METHOD.to_string(),
    }
}

fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
