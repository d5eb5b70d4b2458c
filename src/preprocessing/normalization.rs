//! Pool-scoped z-score normalization.
//!
//! Features live on wildly different scales (latitude in degrees, square
//! footage in the thousands, pool flags in {0, 1}). Before distances are
//! computed, every vector is standardized against the candidate pool:
//!
//! ```text
//! normalized = (value - mean) / std
//! ```
//!
//! Mean and population standard deviation are fit per feature over the
//! pool's raw vectors. A standard deviation of exactly 0 (a feature that is
//! constant across the pool) is floored to 1.0, which turns the z-score into
//! a plain mean offset instead of a division by zero.

use crate::schema::{Feature, FeatureVector};

/// Minimum standard deviation substituted for a constant feature.
const MIN_STD: f64 = 1.0;

/// Per-feature mean and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStat {
    pub mean: f64,
    pub std: f64,
}

/// Normalization statistics fit over one candidate pool.
///
/// Fit once per request and discarded with it. Slots are `None` when the
/// pool was empty; [`FeatureStats::normalize`] passes those features through
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct FeatureStats {
    stats: [Option<FeatureStat>; Feature::COUNT],
}

impl FeatureStats {
    /// Fit mean and population std for every feature over the pool.
    ///
    /// An empty pool produces empty stats (every slot `None`).
    pub fn fit(pool: &[FeatureVector]) -> Self {
        let mut stats = Self::default();
        if pool.is_empty() {
            return stats;
        }

        let n = pool.len() as f64;
        for &feature in Feature::all() {
            let mean = pool.iter().map(|v| v.get(feature)).sum::<f64>() / n;
            let variance = pool
                .iter()
                .map(|v| {
                    let d = v.get(feature) - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            let std = variance.sqrt();
            let std = if std == 0.0 { MIN_STD } else { std };
            stats.set(feature, FeatureStat { mean, std });
        }
        stats
    }

    /// Stats for one feature, if fit.
    pub fn get(&self, feature: Feature) -> Option<FeatureStat> {
        self.stats[feature as usize]
    }

    fn set(&mut self, feature: Feature, stat: FeatureStat) {
        self.stats[feature as usize] = Some(stat);
    }

    /// Z-score-normalize a vector against these stats.
    ///
    /// Features without stats pass through unchanged. The input is not
    /// mutated.
    pub fn normalize(&self, vector: &FeatureVector) -> FeatureVector {
        let mut normalized = *vector;
        for &feature in Feature::all() {
            if let Some(stat) = self.get(feature) {
                normalized.set(feature, (vector.get(feature) - stat.mean) / stat.std);
            }
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector_with(feature: Feature, value: f64) -> FeatureVector {
        let mut v = FeatureVector::new();
        v.set(feature, value);
        v
    }

    #[test]
    fn test_fit_mean_and_population_std() {
        let pool: Vec<_> = [10.0, 20.0, 30.0, 40.0, 50.0]
            .iter()
            .map(|&x| vector_with(Feature::Sqft, x))
            .collect();
        let stats = FeatureStats::fit(&pool);
        let stat = stats.get(Feature::Sqft).unwrap();

        assert!((stat.mean - 30.0).abs() < 1e-10);
        // Population std of [10..50] step 10 is sqrt(200) ~= 14.142
        assert!((stat.std - 14.142135).abs() < 1e-3);
    }

    #[test]
    fn test_constant_feature_floors_std() {
        let pool: Vec<_> = (0..4).map(|_| vector_with(Feature::Bedrooms, 3.0)).collect();
        let stats = FeatureStats::fit(&pool);
        let stat = stats.get(Feature::Bedrooms).unwrap();

        assert_eq!(stat.std, 1.0);

        // Normalizing must not divide by zero or produce NaN.
        let normalized = stats.normalize(&vector_with(Feature::Bedrooms, 4.0));
        assert!((normalized.get(Feature::Bedrooms) - 1.0).abs() < 1e-10);
        assert!(normalized.get(Feature::Bedrooms).is_finite());
    }

    #[test]
    fn test_normalize_centers_the_mean() {
        let pool: Vec<_> = [1500.0, 2000.0, 2500.0]
            .iter()
            .map(|&x| vector_with(Feature::Sqft, x))
            .collect();
        let stats = FeatureStats::fit(&pool);

        let at_mean = stats.normalize(&vector_with(Feature::Sqft, 2000.0));
        assert!(at_mean.get(Feature::Sqft).abs() < 1e-10);

        let above = stats.normalize(&vector_with(Feature::Sqft, 2500.0));
        assert!(above.get(Feature::Sqft) > 0.0);
    }

    #[test]
    fn test_empty_pool_passes_vectors_through() {
        let stats = FeatureStats::fit(&[]);
        assert!(stats.get(Feature::Sqft).is_none());

        let vector = vector_with(Feature::Sqft, 1234.0);
        let normalized = stats.normalize(&vector);
        assert_eq!(normalized, vector);
    }

    #[test]
    fn test_subject_normalized_with_pool_stats() {
        // The subject's own value must not influence the stats.
        let pool: Vec<_> = [100.0, 200.0]
            .iter()
            .map(|&x| vector_with(Feature::DaysSinceSale, x))
            .collect();
        let stats = FeatureStats::fit(&pool);
        let stat = stats.get(Feature::DaysSinceSale).unwrap();
        assert!((stat.mean - 150.0).abs() < 1e-10);

        let subject = stats.normalize(&vector_with(Feature::DaysSinceSale, 0.0));
        assert!((subject.get(Feature::DaysSinceSale) - (-3.0)).abs() < 1e-10);
    }
}
