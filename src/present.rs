//! Display-side helpers: units, labels, tick marks and the colour domain.
//!
//! Everything here is cosmetic. Thresholds and records stay in °F no matter
//! which unit is being shown.

use std::ops::RangeInclusive;

use crate::data::filter::DisplayValue;
use crate::data::model::CountyRecord;

/// Fixed colour normalisation range, independent of the data.
pub const COLOR_DOMAIN: (f64, f64) = (100_000.0, 1_500_000.0);

/// Domain of the maximum house price control.
pub const PRICE_RANGE: RangeInclusive<f64> = 30_000.0..=1_500_000.0;

/// Domain of both temperature range controls, in °F.
pub const TEMP_RANGE: RangeInclusive<f64> = -10.0..=100.0;

const TEMP_TICK_STEP: usize = 5;
const PRICE_TICK_STEP: usize = 100_000;

pub fn color_domain() -> (f64, f64) {
    COLOR_DOMAIN
}

// ---------------------------------------------------------------------------
// Temperature unit toggle
// ---------------------------------------------------------------------------

/// Unit used for temperature labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TempUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TempUnit {
    /// The other unit; every "Change unit" press moves here.
    pub fn toggled(self) -> Self {
        match self {
            TempUnit::Fahrenheit => TempUnit::Celsius,
            TempUnit::Celsius => TempUnit::Fahrenheit,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TempUnit::Fahrenheit => "°F",
            TempUnit::Celsius => "°C",
        }
    }

    /// Format a °F value for display in this unit.
    pub fn format(self, fahrenheit: f64) -> String {
        match self {
            TempUnit::Fahrenheit if fahrenheit.fract() == 0.0 => {
                format!("{fahrenheit:.0}{}", self.symbol())
            }
            TempUnit::Fahrenheit => format!("{fahrenheit:.1}{}", self.symbol()),
            TempUnit::Celsius => format!("{}{}", to_celsius(fahrenheit), self.symbol()),
        }
    }
}

/// °F → °C, truncated toward zero (so -10°F is -23°C, not -24).
pub fn to_celsius(fahrenheit: f64) -> i64 {
    ((fahrenheit - 32.0) * 5.0 / 9.0).trunc() as i64
}

/// Read a temperature typed into a control in `unit`, returning °F.
pub fn parse_temp(unit: TempUnit, text: &str) -> Option<f64> {
    let number = text
        .trim()
        .trim_end_matches(unit.symbol())
        .trim_end_matches('°')
        .trim()
        .parse::<f64>()
        .ok()?;
    Some(match unit {
        TempUnit::Fahrenheit => number,
        TempUnit::Celsius => number * 9.0 / 5.0 + 32.0,
    })
}

/// Tick marks for the temperature controls: every 5°F across the domain,
/// labelled in `unit`. Positions stay in °F.
pub fn temp_ticks(unit: TempUnit) -> Vec<(f64, String)> {
    let (lo, hi) = (*TEMP_RANGE.start() as i64, *TEMP_RANGE.end() as i64);
    (lo..=hi)
        .step_by(TEMP_TICK_STEP)
        .map(|f| (f as f64, unit.format(f as f64)))
        .collect()
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// `$1,234,567` style, rounded to whole dollars.
pub fn format_price(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Tick marks for the price control: every $100,000 from $100,000 up to,
/// but not including, the top of the domain.
pub fn price_ticks() -> Vec<(f64, String)> {
    let top = *PRICE_RANGE.end() as usize;
    (PRICE_TICK_STEP..top)
        .step_by(PRICE_TICK_STEP)
        .map(|p| (p as f64, format_price(p as f64)))
        .collect()
}

/// Text shown for a county's value. Non-matching counties have no value.
pub fn label_for(value: &DisplayValue) -> String {
    match value {
        DisplayValue::Eligible(price) => format_price(*price),
        DisplayValue::Ineligible => "no match".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Hover card
// ---------------------------------------------------------------------------

/// Label/value rows describing a county, temperatures in `unit`.
pub fn hover_rows(record: &CountyRecord, unit: TempUnit) -> Vec<(String, String)> {
    let precip = |v: Option<f64>| v.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"));
    let sym = unit.symbol();
    let mut rows = vec![
        ("House price".to_string(), format_price(record.house_price)),
        (format!("Average annual low ({sym})"), unit.format(record.min_annual_temp)),
        (format!("Average annual high ({sym})"), unit.format(record.max_annual_temp)),
        (
            format!("Average temp, coldest month ({sym})"),
            unit.format(record.min_monthly_avg_temp),
        ),
        (
            format!("Average temp, hottest month ({sym})"),
            unit.format(record.max_monthly_avg_temp),
        ),
        (
            "Average monthly precipitation (inches)".to_string(),
            precip(record.avg_monthly_precip),
        ),
        (
            "Total annual precipitation (inches)".to_string(),
            precip(record.total_annual_precip),
        ),
    ];
    rows.extend(
        record
            .extras
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string())),
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_truncates_toward_zero() {
        assert_eq!(to_celsius(32.0), 0);
        assert_eq!(to_celsius(-10.0), -23);
        assert_eq!(to_celsius(100.0), 37);
        assert_eq!(to_celsius(31.0), 0);
        assert_eq!(to_celsius(212.0), 100);
    }

    #[test]
    fn toggle_alternates_from_fahrenheit() {
        let start = TempUnit::default();
        assert_eq!(start, TempUnit::Fahrenheit);
        assert_eq!(start.toggled(), TempUnit::Celsius);
        assert_eq!(start.toggled().toggled(), TempUnit::Fahrenheit);
    }

    #[test]
    fn temp_ticks_keep_fahrenheit_positions() {
        let f = temp_ticks(TempUnit::Fahrenheit);
        let c = temp_ticks(TempUnit::Celsius);
        assert_eq!(f.len(), 23);
        assert_eq!(f[0], (-10.0, "-10°F".to_string()));
        assert_eq!(f[22], (100.0, "100°F".to_string()));
        assert_eq!(c[0], (-10.0, "-23°C".to_string()));
        assert_eq!(c[22], (100.0, "37°C".to_string()));
        let positions = |t: &[(f64, String)]| t.iter().map(|(p, _)| *p).collect::<Vec<_>>();
        assert_eq!(positions(&f), positions(&c));
    }

    #[test]
    fn fractional_fahrenheit_keeps_one_decimal() {
        assert_eq!(TempUnit::Fahrenheit.format(20.3), "20.3°F");
        assert_eq!(TempUnit::Celsius.format(20.3), "-6°C");
    }

    #[test]
    fn typed_temperatures_come_back_in_fahrenheit() {
        assert_eq!(parse_temp(TempUnit::Fahrenheit, "72°F"), Some(72.0));
        assert_eq!(parse_temp(TempUnit::Fahrenheit, " 15 "), Some(15.0));
        assert_eq!(parse_temp(TempUnit::Celsius, "0°C"), Some(32.0));
        assert_eq!(parse_temp(TempUnit::Celsius, "100"), Some(212.0));
        assert_eq!(parse_temp(TempUnit::Celsius, "warm"), None);
    }

    #[test]
    fn prices_are_grouped() {
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(999.0), "$999");
        assert_eq!(format_price(400_000.0), "$400,000");
        assert_eq!(format_price(1_500_000.0), "$1,500,000");
        assert_eq!(format_price(-1_200.0), "-$1,200");
    }

    #[test]
    fn price_ticks_match_controls() {
        let ticks = price_ticks();
        assert_eq!(ticks.len(), 14);
        assert_eq!(ticks[0], (100_000.0, "$100,000".to_string()));
        assert_eq!(ticks[13].1, "$1,400,000");
    }

    #[test]
    fn labels_distinguish_zero_from_absent() {
        assert_eq!(label_for(&DisplayValue::Eligible(0.0)), "$0");
        assert_eq!(label_for(&DisplayValue::Ineligible), "no match");
        assert_eq!(color_domain(), (100_000.0, 1_500_000.0));
    }

    #[test]
    fn hover_rows_follow_unit() {
        let record = CountyRecord::new("01001", "A", 250_000.0, (-10.0, 100.0), (32.0, 80.0));
        let f = hover_rows(&record, TempUnit::Fahrenheit);
        let c = hover_rows(&record, TempUnit::Celsius);
        assert_eq!(f[0].1, "$250,000");
        assert_eq!(f[1], ("Average annual low (°F)".to_string(), "-10°F".to_string()));
        assert_eq!(c[1], ("Average annual low (°C)".to_string(), "-23°C".to_string()));
        assert_eq!(c[3].1, "0°C");
        assert_eq!(f[5].1, "–");
    }
}
