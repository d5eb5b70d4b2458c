//! Feature adjustment rules.
//!
//! Each rule is an independent pure function that compares the subject to
//! the selected comparables and returns an optional signed adjustment.
//! The estimator sums whatever the rules produce; adding a rule means adding
//! a function to [`RULES`], not branching in the aggregator.
//!
//! Majority rules (pool, garage) only fire when the subject differs from
//! more than half the comparables. The age rule fires when the clamped
//! adjustment is worth more than half a percent.

use crate::property::PropertyRecord;
use crate::selection::RankedComparable;
use serde::{Deserialize, Serialize};

/// Year-built default used when a record omits it.
const DEFAULT_YEAR_BUILT: i32 = 2000;

/// One named adjustment produced by a rule, as a signed fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAdjustment {
    pub name: String,
    /// Signed fraction, e.g. 0.03 for +3%.
    pub pct: f64,
}

impl FeatureAdjustment {
    fn new(name: &str, pct: f64) -> Self {
        Self {
            name: name.to_string(),
            pct,
        }
    }
}

/// Signature shared by all adjustment rules.
///
/// `reference_year` anchors age arithmetic to the request's notion of "now".
pub type AdjustmentRule =
    fn(&PropertyRecord, &[RankedComparable], i32) -> Option<FeatureAdjustment>;

/// All rules, applied in order.
pub const RULES: &[AdjustmentRule] = &[pool_adjustment, garage_adjustment, age_adjustment];

/// +3% when the subject has a pool and fewer than half the comparables do;
/// -3% in the mirrored case.
fn pool_adjustment(
    subject: &PropertyRecord,
    comparables: &[RankedComparable],
    _reference_year: i32,
) -> Option<FeatureAdjustment> {
    let share = share_with(comparables, |r| r.has_pool());
    if subject.has_pool() && share < 0.5 {
        Some(FeatureAdjustment::new("pool", 0.03))
    } else if !subject.has_pool() && share > 0.5 {
        Some(FeatureAdjustment::new("pool", -0.03))
    } else {
        None
    }
}

/// Same majority rule as the pool, at +/-2%.
fn garage_adjustment(
    subject: &PropertyRecord,
    comparables: &[RankedComparable],
    _reference_year: i32,
) -> Option<FeatureAdjustment> {
    let share = share_with(comparables, |r| r.has_garage);
    if subject.has_garage && share < 0.5 {
        Some(FeatureAdjustment::new("garage", 0.02))
    } else if !subject.has_garage && share > 0.5 {
        Some(FeatureAdjustment::new("garage", -0.02))
    } else {
        None
    }
}

/// 1% per 10 years the subject is newer than the average comparable,
/// clamped to +/-5% and dropped when under half a percent.
fn age_adjustment(
    subject: &PropertyRecord,
    comparables: &[RankedComparable],
    reference_year: i32,
) -> Option<FeatureAdjustment> {
    let age = |record: &PropertyRecord| {
        (reference_year - record.year_built.unwrap_or(DEFAULT_YEAR_BUILT)) as f64
    };

    let subject_age = age(subject);
    let avg_comp_age = comparables.iter().map(|c| age(&c.record)).sum::<f64>()
        / comparables.len() as f64;

    let pct = ((avg_comp_age - subject_age) / 10.0 * 0.01).clamp(-0.05, 0.05);
    if pct.abs() > 0.005 {
        Some(FeatureAdjustment::new("age", pct))
    } else {
        None
    }
}

fn share_with(comparables: &[RankedComparable], has: impl Fn(&PropertyRecord) -> bool) -> f64 {
    comparables.iter().filter(|c| has(&c.record)).count() as f64 / comparables.len() as f64
}
