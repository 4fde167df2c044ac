use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CountyId – key shared by the record table and the boundary catalog
// ---------------------------------------------------------------------------

/// Five-digit FIPS code, kept as text so leading zeros survive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountyId(pub String);

impl CountyId {
    /// Normalise a raw id: integers (and integral floats) are zero-padded to
    /// five digits, anything else is taken verbatim after trimming.
    pub fn normalise(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<u64>() {
            return CountyId(format!("{n:05}"));
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.fract() == 0.0 && f >= 0.0 && f < 1e9 {
                return CountyId(format!("{:05}", f as u64));
            }
        }
        CountyId(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AttributeValue – a cell in an informational column
// ---------------------------------------------------------------------------

/// A dynamically-typed informational value. These columns are shown on
/// hover but never filtered on.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v:.2}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Null => write!(f, "–"),
        }
    }
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CountyRecord – one row of the county table
// ---------------------------------------------------------------------------

/// Column names of the record table.
pub mod columns {
    pub const ID: &str = "fips";
    pub const NAME: &str = "county";
    pub const HOUSE_PRICE: &str = "house_price";
    pub const MIN_ANNUAL: &str = "min_tmp_year";
    pub const MAX_ANNUAL: &str = "max_tmp_year";
    pub const MIN_MONTHLY_AVG: &str = "min_avg_tmp_year";
    pub const MAX_MONTHLY_AVG: &str = "max_avg_tmp_year";
    pub const AVG_PRECIP_MONTH: &str = "avg_precip_month";
    pub const TOTAL_PRECIP_YEAR: &str = "total_precip_year";

    /// Columns that must be present and numeric on every row.
    pub const REQUIRED_NUMERIC: [&str; 5] = [
        HOUSE_PRICE,
        MIN_ANNUAL,
        MAX_ANNUAL,
        MIN_MONTHLY_AVG,
        MAX_MONTHLY_AVG,
    ];
}

/// A single county. Temperatures are in °F.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRecord {
    pub id: CountyId,
    pub display_name: String,
    pub house_price: f64,
    /// Coldest recorded annual extreme.
    pub min_annual_temp: f64,
    /// Hottest recorded annual extreme.
    pub max_annual_temp: f64,
    /// Average temperature of the coldest month.
    pub min_monthly_avg_temp: f64,
    /// Average temperature of the hottest month.
    pub max_monthly_avg_temp: f64,
    /// Average monthly precipitation (inches).
    pub avg_monthly_precip: Option<f64>,
    /// Total annual precipitation (inches).
    pub total_annual_precip: Option<f64>,
    /// Any further columns, keyed by column name.
    pub extras: BTreeMap<String, AttributeValue>,
}

impl CountyRecord {
    /// Record with only the filtered fields set.
    #[cfg(test)]
    pub fn new(
        id: &str,
        display_name: &str,
        house_price: f64,
        annual: (f64, f64),
        monthly: (f64, f64),
    ) -> Self {
        CountyRecord {
            id: CountyId::normalise(id),
            display_name: display_name.to_string(),
            house_price,
            min_annual_temp: annual.0,
            max_annual_temp: annual.1,
            min_monthly_avg_temp: monthly.0,
            max_monthly_avg_temp: monthly.1,
            avg_monthly_precip: None,
            total_annual_precip: None,
            extras: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_zero_padded() {
        assert_eq!(CountyId::normalise("1001").as_str(), "01001");
        assert_eq!(CountyId::normalise(" 53033 ").as_str(), "53033");
        assert_eq!(CountyId::normalise("1001.0").as_str(), "01001");
    }

    #[test]
    fn non_numeric_ids_are_kept() {
        assert_eq!(CountyId::normalise("0500000US01001").as_str(), "0500000US01001");
    }

    #[test]
    fn attribute_numbers_convert() {
        assert_eq!(AttributeValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(AttributeValue::String("x".into()).as_f64(), None);
        assert_eq!(AttributeValue::Null.to_string(), "–");
    }
}
