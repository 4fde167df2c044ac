use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::CountyRecord;

/// One line of the exported CSV. Temperatures stay in °F.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    fips: &'a str,
    county: &'a str,
    house_price: f64,
    min_tmp_year: f64,
    max_tmp_year: f64,
    min_avg_tmp_year: f64,
    max_avg_tmp_year: f64,
}

impl<'a> From<&'a CountyRecord> for ExportRow<'a> {
    fn from(r: &'a CountyRecord) -> Self {
        ExportRow {
            fips: r.id.as_str(),
            county: &r.display_name,
            house_price: r.house_price,
            min_tmp_year: r.min_annual_temp,
            max_tmp_year: r.max_annual_temp,
            min_avg_tmp_year: r.min_monthly_avg_temp,
            max_avg_tmp_year: r.max_monthly_avg_temp,
        }
    }
}

/// Write `records` as CSV, returning how many rows were written.
pub fn write_matches(path: &Path, records: &[&CountyRecord]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        writer
            .serialize(ExportRow::from(*record))
            .with_context(|| format!("writing county {}", record.id))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(records.len())
}
