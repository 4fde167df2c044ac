use std::collections::BTreeMap;

use super::model::{CountyId, CountyRecord};

// ---------------------------------------------------------------------------
// Threshold set: the user's current constraints
// ---------------------------------------------------------------------------

/// Inclusive `[low, high]` temperature band in °F.
///
/// Taken literally: an inverted band (`low > high`) is not corrected and
/// simply lets fewer counties through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempRange {
    pub low: f64,
    pub high: f64,
}

impl TempRange {
    pub const fn new(low: f64, high: f64) -> Self {
        TempRange { low, high }
    }

    /// Whether the interval `[min, max]` lies inside this band.
    fn admits(&self, min: f64, max: f64) -> bool {
        min >= self.low && max <= self.high
    }
}

/// Constraints applied on each "Update".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSet {
    pub max_house_price: f64,
    /// Bounds on the coldest and hottest monthly averages.
    pub monthly_range: TempRange,
    /// Bounds on the annual extremes.
    pub annual_range: TempRange,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        ThresholdSet {
            max_house_price: 400_000.0,
            monthly_range: TempRange::new(20.0, 80.0),
            annual_range: TempRange::new(-10.0, 100.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Display value per county
// ---------------------------------------------------------------------------

/// What the map shows for one county.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue {
    /// Passes every constraint; carries the county's house price.
    Eligible(f64),
    /// Fails at least one constraint. Drawn without fill, never as zero.
    Ineligible,
}

impl DisplayValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            DisplayValue::Eligible(v) => Some(*v),
            DisplayValue::Ineligible => None,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, DisplayValue::Eligible(_))
    }
}

/// Result of one evaluation, keyed by county id.
pub type Evaluation = BTreeMap<CountyId, DisplayValue>;

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Whether a single county satisfies all constraints.
///
/// All bounds are inclusive. Informational attributes play no part.
pub fn is_eligible(record: &CountyRecord, thresholds: &ThresholdSet) -> bool {
    thresholds
        .annual_range
        .admits(record.min_annual_temp, record.max_annual_temp)
        && thresholds
            .monthly_range
            .admits(record.min_monthly_avg_temp, record.max_monthly_avg_temp)
        && record.house_price <= thresholds.max_house_price
}

/// Compute the display value of every county.
///
/// Pure: the result depends only on the arguments, and is built fresh on
/// every call.
pub fn evaluate(records: &[CountyRecord], thresholds: &ThresholdSet) -> Evaluation {
    records
        .iter()
        .map(|record| {
            let value = if is_eligible(record, thresholds) {
                DisplayValue::Eligible(record.house_price)
            } else {
                DisplayValue::Ineligible
            };
            (record.id.clone(), value)
        })
        .collect()
}

/// Number of eligible counties in an evaluation.
pub fn eligible_count(evaluation: &Evaluation) -> usize {
    evaluation.values().filter(|v| v.is_eligible()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AttributeValue;

    fn reference_record() -> CountyRecord {
        CountyRecord::new("01001", "Reference", 400_000.0, (-10.0, 100.0), (20.0, 80.0))
    }

    fn reference_thresholds() -> ThresholdSet {
        ThresholdSet {
            max_house_price: 400_000.0,
            monthly_range: TempRange::new(20.0, 80.0),
            annual_range: TempRange::new(-10.0, 100.0),
        }
    }

    fn value_of(records: &[CountyRecord], thresholds: &ThresholdSet) -> DisplayValue {
        evaluate(records, thresholds)[&records[0].id]
    }

    fn sample_records() -> Vec<CountyRecord> {
        vec![
            CountyRecord::new("01001", "A", 150_000.0, (5.0, 98.0), (40.0, 82.0)),
            CountyRecord::new("02020", "B", 420_000.0, (-30.0, 85.0), (5.0, 62.0)),
            CountyRecord::new("06037", "C", 800_000.0, (38.0, 104.0), (55.0, 75.0)),
            CountyRecord::new("53033", "D", 0.0, (18.0, 92.0), (40.0, 66.0)),
            CountyRecord::new("12086", "E", 450_000.0, (45.0, 96.0), (68.0, 84.0)),
        ]
    }

    #[test]
    fn reference_county_is_eligible_at_exact_bounds() {
        let records = vec![reference_record()];
        assert_eq!(
            value_of(&records, &reference_thresholds()),
            DisplayValue::Eligible(400_000.0)
        );
    }

    #[test]
    fn price_one_below_excludes() {
        let records = vec![reference_record()];
        let mut t = reference_thresholds();
        t.max_house_price = 399_999.0;
        assert_eq!(value_of(&records, &t), DisplayValue::Ineligible);
    }

    #[test]
    fn raised_monthly_low_excludes() {
        let records = vec![reference_record()];
        let mut t = reference_thresholds();
        t.monthly_range = TempRange::new(25.0, 80.0);
        assert_eq!(value_of(&records, &t), DisplayValue::Ineligible);
    }

    #[test]
    fn each_predicate_excludes_on_its_own() {
        let records = vec![reference_record()];
        let base = reference_thresholds();

        let mut t = base;
        t.annual_range.low = -9.0;
        assert_eq!(value_of(&records, &t), DisplayValue::Ineligible);

        let mut t = base;
        t.annual_range.high = 99.0;
        assert_eq!(value_of(&records, &t), DisplayValue::Ineligible);

        let mut t = base;
        t.monthly_range.high = 79.5;
        assert_eq!(value_of(&records, &t), DisplayValue::Ineligible);
    }

    #[test]
    fn zero_price_is_eligible_not_absent() {
        let records = vec![CountyRecord::new("1", "Free", 0.0, (0.0, 50.0), (25.0, 40.0))];
        let value = value_of(&records, &reference_thresholds());
        assert_eq!(value, DisplayValue::Eligible(0.0));
        assert_eq!(value.value(), Some(0.0));
        assert_eq!(DisplayValue::Ineligible.value(), None);
    }

    #[test]
    fn inverted_range_is_taken_literally() {
        let mut t = reference_thresholds();
        t.monthly_range = TempRange::new(80.0, 20.0);
        let result = evaluate(&sample_records(), &t);
        assert_eq!(eligible_count(&result), 0);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn negative_price_and_out_of_order_temps_are_compared_literally() {
        let records = vec![
            // Inverted pairs that still sit inside every bound.
            CountyRecord::new("1", "Odd", -5.0, (50.0, 40.0), (90.0, 10.0)),
            // Negative price, but the annual low is below the floor.
            CountyRecord::new("2", "Odder", -5.0, (-20.0, 40.0), (30.0, 60.0)),
            reference_record(),
        ];
        let result = evaluate(&records, &reference_thresholds());
        assert_eq!(result[&CountyId("00001".into())], DisplayValue::Eligible(-5.0));
        assert_eq!(result[&CountyId("00002".into())], DisplayValue::Ineligible);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn informational_attributes_do_not_matter() {
        let mut rich = reference_record();
        rich.avg_monthly_precip = Some(12.0);
        rich.total_annual_precip = None;
        rich.extras.insert("note".into(), AttributeValue::Null);

        let plain = evaluate(&[reference_record()], &reference_thresholds());
        let with_extras = evaluate(&[rich], &reference_thresholds());
        assert_eq!(plain, with_extras);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let records = sample_records();
        let t = reference_thresholds();
        let first = evaluate(&records, &t);
        let _other = evaluate(&records, &ThresholdSet::default());
        assert_eq!(first, evaluate(&records, &t));
    }

    #[test]
    fn widening_never_removes_counties() {
        let records = sample_records();
        let narrow = ThresholdSet {
            max_house_price: 300_000.0,
            monthly_range: TempRange::new(35.0, 85.0),
            annual_range: TempRange::new(0.0, 100.0),
        };
        let widenings = [
            ThresholdSet { max_house_price: 500_000.0, ..narrow },
            ThresholdSet { monthly_range: TempRange::new(0.0, 90.0), ..narrow },
            ThresholdSet { annual_range: TempRange::new(-40.0, 110.0), ..narrow },
        ];

        let before = evaluate(&records, &narrow);
        for wide in &widenings {
            let after = evaluate(&records, wide);
            for (id, value) in &before {
                if value.is_eligible() {
                    assert_eq!(after[id], *value, "{id} dropped out after widening");
                }
            }
            assert!(eligible_count(&after) >= eligible_count(&before));
        }
    }

    #[test]
    fn defaults_match_initial_controls() {
        let t = ThresholdSet::default();
        assert_eq!(t.max_house_price, 400_000.0);
        assert_eq!(t.monthly_range, TempRange::new(20.0, 80.0));
        assert_eq!(t.annual_range, TempRange::new(-10.0, 100.0));
    }
}
