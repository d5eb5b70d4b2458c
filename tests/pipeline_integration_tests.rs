//! End-to-end pipeline tests.
//!
//! Runs the full analysis flow the service layer sees: records in,
//! valuation out, with the configuration layer in between.

use valuation_engine::prelude::*;

fn subject() -> PropertyRecord {
    PropertyRecord {
        address: "123 Main Street, Austin, TX 78701".into(),
        latitude: 30.2672,
        longitude: -97.7431,
        sqft: Some(2400.0),
        bedrooms: 4.0,
        bathrooms: 3.0,
        year_built: Some(2010),
        has_private_pool: true,
        has_garage: true,
        ..Default::default()
    }
}

fn sales_pool() -> Vec<PropertyRecord> {
    let sale = |address: &str, sqft: f64, year: i32, price: f64, days: i64| PropertyRecord {
        address: address.into(),
        latitude: 30.2680,
        longitude: -97.7425,
        sqft: Some(sqft),
        bedrooms: 4.0,
        bathrooms: 3.0,
        year_built: Some(year),
        has_private_pool: true,
        has_garage: true,
        sale_price: Some(price),
        days_since_sale: Some(days),
        ..Default::default()
    };
    vec![
        sale("125 Main St", 2350.0, 2008, 675_000.0, 45),
        sale("130 Main St", 2450.0, 2012, 690_000.0, 30),
        sale("88 Oak Ave", 2100.0, 2001, 610_000.0, 90),
        sale("14 Elm Ct", 2600.0, 2015, 720_000.0, 60),
        sale("9 Pine Loop", 3200.0, 2020, 850_000.0, 120),
        sale("500 Far Rd", 1600.0, 1972, 420_000.0, 200),
    ]
}

#[test]
fn test_full_analysis_flow() {
    let pipeline = Pipeline::new().unwrap();
    let valuation = pipeline
        .analyze(&subject(), &sales_pool(), &ConditionSummary::default())
        .unwrap();

    assert_eq!(valuation.comparables.len(), 5);
    assert!(valuation.recommendation.recommended_price > 0);
    assert!(valuation.recommendation.price_range.low <= valuation.recommendation.recommended_price);
    assert!(valuation.recommendation.recommended_price <= valuation.recommendation.price_range.high);

    // Sale prices cluster around $250-290/sqft; the recommendation should
    // land in a sane band around them.
    assert!(valuation.recommendation.recommended_price > 400_000);
    assert!(valuation.recommendation.recommended_price < 900_000);
}

#[test]
fn test_configured_k_limits_comparables() {
    let pipeline = Pipeline::from_config(PipelineConfig { num_comps: 3 }).unwrap();
    let valuation = pipeline
        .analyze(&subject(), &sales_pool(), &ConditionSummary::default())
        .unwrap();
    assert_eq!(valuation.comparables.len(), 3);
}

#[test]
fn test_analysis_is_deterministic() {
    let pipeline = Pipeline::new().unwrap();
    let condition = ConditionSummary::default();

    let first = pipeline.analyze(&subject(), &sales_pool(), &condition).unwrap();
    let second = pipeline.analyze(&subject(), &sales_pool(), &condition).unwrap();

    assert_eq!(
        first.recommendation.recommended_price,
        second.recommendation.recommended_price
    );
    let first_order: Vec<_> = first.comparables.iter().map(|c| &c.record.address).collect();
    let second_order: Vec<_> = second.comparables.iter().map(|c| &c.record.address).collect();
    assert_eq!(first_order, second_order);
}

#[test]
fn test_inputs_are_not_mutated() {
    let pipeline = Pipeline::new().unwrap();
    let original_subject = subject();
    let original_pool = sales_pool();

    let subject_snapshot = format!("{original_subject:?}");
    let pool_snapshot = format!("{original_pool:?}");

    pipeline
        .analyze(&original_subject, &original_pool, &ConditionSummary::default())
        .unwrap();

    assert_eq!(subject_snapshot, format!("{original_subject:?}"));
    assert_eq!(pool_snapshot, format!("{original_pool:?}"));
}

#[test]
fn test_sparse_records_degrade_gracefully() {
    // A pool of mostly empty records must produce a result, not a panic:
    // missing fields default and the estimator falls back where it must.
    let pipeline = Pipeline::new().unwrap();
    let sparse_pool = vec![
        PropertyRecord {
            sale_price: Some(500_000.0),
            ..Default::default()
        },
        PropertyRecord::default(),
    ];

    let valuation = pipeline
        .analyze(&PropertyRecord::default(), &sparse_pool, &ConditionSummary::default())
        .unwrap();
    assert_eq!(valuation.comparables.len(), 2);
    assert!(valuation.recommendation.recommended_price >= 0);
}

#[test]
fn test_poor_condition_prices_below_fair() {
    let pipeline = Pipeline::new().unwrap();
    let fair = pipeline
        .analyze(&subject(), &sales_pool(), &ConditionSummary::default())
        .unwrap();

    let poor = ConditionSummary {
        overall_condition: ConditionRating::Poor,
        condition_score: 40.0,
        concerns: vec!["foundation crack near the garage".into()],
    };
    let poor_valuation = pipeline.analyze(&subject(), &sales_pool(), &poor).unwrap();

    assert!(
        poor_valuation.recommendation.recommended_price
            < fair.recommendation.recommended_price
    );
}

#[test]
fn test_valuation_serializes_to_json() {
    let pipeline = Pipeline::new().unwrap();
    let valuation = pipeline
        .analyze(&subject(), &sales_pool(), &ConditionSummary::default())
        .unwrap();

    let json = serde_json::to_string(&valuation).unwrap();
    assert!(json.contains("recommended_price"));
    assert!(json.contains("similarity_score"));

    // And back: stored valuations must deserialize.
    let parsed: Valuation = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed.recommendation.recommended_price,
        valuation.recommendation.recommended_price
    );
    assert_eq!(parsed.comparables.len(), valuation.comparables.len());
}
