//! Feature extraction from property records.
//!
//! Converts a [`PropertyRecord`] into the fixed eight-slot
//! [`FeatureVector`] the KNN search operates on. Extraction is pure: the
//! record is never mutated, and missing attributes fall back to defaults so
//! a sparse record still produces a usable vector.
//!
//! # Defaults
//!
//! - Numeric fields default to 0 when missing.
//! - `year_built` defaults to the extractor's reference year, so a property
//!   of unknown age scores as average-aged rather than ancient.
//! - `days_since_sale`: an explicit non-zero value wins; otherwise the sale
//!   date is parsed and differenced against the reference instant;
//!   unparseable dates default to 90 days. A record with neither (the
//!   subject property) stays at 0.

use crate::property::PropertyRecord;
use crate::schema::{Feature, FeatureVector};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Fallback recency when a sale date exists but cannot be parsed.
const DEFAULT_DAYS_SINCE_SALE: f64 = 90.0;

/// Extracts KNN feature vectors from property records.
///
/// Holds the reference instant used for sale-recency and property-age
/// arithmetic, so a whole analysis call sees one consistent "now".
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    now: DateTime<Utc>,
}

impl FeatureExtractor {
    /// Create an extractor anchored at the current instant.
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    /// Create an extractor anchored at a fixed instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Reference year used for the `year_built` default.
    pub fn reference_year(&self) -> i32 {
        self.now.year()
    }

    /// Extract the feature vector for a record.
    pub fn extract(&self, record: &PropertyRecord) -> FeatureVector {
        let mut vector = FeatureVector::new();
        vector.set(Feature::Latitude, record.latitude);
        vector.set(Feature::Longitude, record.longitude);
        vector.set(Feature::Sqft, record.living_area());
        vector.set(Feature::Bedrooms, record.bedrooms);
        vector.set(Feature::Bathrooms, record.bathrooms);
        vector.set(
            Feature::YearBuilt,
            record.year_built.unwrap_or(self.reference_year()) as f64,
        );
        vector.set(
            Feature::HasPool,
            if record.has_pool() { 1.0 } else { 0.0 },
        );
        vector.set(Feature::DaysSinceSale, self.days_since_sale(record));
        vector
    }

    /// Resolve sale recency in whole days.
    fn days_since_sale(&self, record: &PropertyRecord) -> f64 {
        let explicit = record.days_since_sale.unwrap_or(0);
        if explicit != 0 {
            return explicit as f64;
        }
        match &record.sale_date {
            Some(date) => match parse_sale_date(date) {
                Some(sold_at) => (self.now - sold_at).num_days() as f64,
                None => {
                    log::warn!("unparseable sale date {date:?}, defaulting to 90 days");
                    DEFAULT_DAYS_SINCE_SALE
                }
            },
            None => 0.0,
        }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a sale date as RFC 3339, falling back to `YYYY-MM-DD` taken as UTC
/// midnight.
fn parse_sale_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_extractor() -> FeatureExtractor {
        // 2025-09-15 00:00:00 UTC
        FeatureExtractor::at(Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_extract_basic_record() {
        let record = PropertyRecord {
            address: "123 Main Street, Austin, TX 78701".into(),
            latitude: 30.2672,
            longitude: -97.7431,
            sqft: Some(2400.0),
            bedrooms: 4.0,
            bathrooms: 3.0,
            year_built: Some(2010),
            has_private_pool: true,
            ..Default::default()
        };
        let vector = fixed_extractor().extract(&record);

        assert_eq!(vector.get(Feature::Latitude), 30.2672);
        assert_eq!(vector.get(Feature::Sqft), 2400.0);
        assert_eq!(vector.get(Feature::Bedrooms), 4.0);
        assert_eq!(vector.get(Feature::YearBuilt), 2010.0);
        assert_eq!(vector.get(Feature::HasPool), 1.0);
        // Subject property: no explicit recency, no sale date.
        assert_eq!(vector.get(Feature::DaysSinceSale), 0.0);
    }

    #[test]
    fn test_sqft_falls_back_to_alternate_key() {
        let record = PropertyRecord {
            square_footage: Some(1850.0),
            ..Default::default()
        };
        let vector = fixed_extractor().extract(&record);
        assert_eq!(vector.get(Feature::Sqft), 1850.0);
    }

    #[test]
    fn test_year_built_defaults_to_reference_year() {
        let record = PropertyRecord::default();
        let vector = fixed_extractor().extract(&record);
        assert_eq!(vector.get(Feature::YearBuilt), 2025.0);
    }

    #[test]
    fn test_explicit_days_since_sale_wins() {
        let record = PropertyRecord {
            days_since_sale: Some(45),
            sale_date: Some("2025-01-01".into()),
            ..Default::default()
        };
        let vector = fixed_extractor().extract(&record);
        assert_eq!(vector.get(Feature::DaysSinceSale), 45.0);
    }

    #[test]
    fn test_days_since_sale_from_date() {
        let record = PropertyRecord {
            sale_date: Some("2025-08-16".into()),
            ..Default::default()
        };
        let vector = fixed_extractor().extract(&record);
        assert_eq!(vector.get(Feature::DaysSinceSale), 30.0);
    }

    #[test]
    fn test_unparseable_date_defaults_to_90() {
        let record = PropertyRecord {
            sale_date: Some("last spring".into()),
            ..Default::default()
        };
        let vector = fixed_extractor().extract(&record);
        assert_eq!(vector.get(Feature::DaysSinceSale), 90.0);
    }

    #[test]
    fn test_extraction_does_not_mutate_record() {
        let record = PropertyRecord {
            sqft: Some(2000.0),
            year_built: Some(1999),
            ..Default::default()
        };
        let before = format!("{record:?}");
        let _ = fixed_extractor().extract(&record);
        assert_eq!(before, format!("{record:?}"));
    }

    #[test]
    fn test_parse_rfc3339_sale_date() {
        let record = PropertyRecord {
            sale_date: Some("2025-09-05T12:00:00Z".into()),
            ..Default::default()
        };
        let vector = fixed_extractor().extract(&record);
        // 9.5 days before the reference instant -> 9 whole days.
        assert_eq!(vector.get(Feature::DaysSinceSale), 9.0);
    }
}
