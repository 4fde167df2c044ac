use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde_json::json;

/// One synthetic county on a lon/lat grid cell.
struct County {
    fips: String,
    name: String,
    cell: [f64; 4],
    house_price: f64,
    min_tmp_year: f64,
    max_tmp_year: f64,
    min_avg_tmp_year: f64,
    max_avg_tmp_year: f64,
    avg_precip_month: f64,
    total_precip_year: f64,
}

// Contiguous US, roughly.
const LON: (f64, f64) = (-124.0, -67.0);
const LAT: (f64, f64) = (25.0, 49.0);
const COLS: usize = 38;
const ROWS: usize = 16;

fn generate(rng: &mut StdRng) -> Result<Vec<County>> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| anyhow::anyhow!("noise distribution: {e}"))?;
    let gauss = |rng: &mut StdRng, sd: f64| sd * normal.sample(rng);

    let dx = (LON.1 - LON.0) / COLS as f64;
    let dy = (LAT.1 - LAT.0) / ROWS as f64;
    let mut counties = Vec::with_capacity(COLS * ROWS);

    for row in 0..ROWS {
        for col in 0..COLS {
            let lon0 = LON.0 + col as f64 * dx;
            let lat0 = LAT.0 + row as f64 * dy;
            let north = row as f64 / (ROWS - 1) as f64;
            let coast = {
                let c = col as f64 / (COLS - 1) as f64;
                (1.0 - 4.0 * c * (1.0 - c)).max(0.0)
            };

            // Colder up north, milder swings by the coasts, pricier on the coasts.
            let mean = 70.0 - 35.0 * north + gauss(rng, 2.0);
            let swing = 22.0 - 8.0 * coast + gauss(rng, 1.5);
            let min_avg = mean - swing;
            let max_avg = mean + swing;
            let min_year = min_avg - 25.0 - rng.gen::<f64>() * 10.0;
            let max_year = max_avg + 12.0 + rng.gen::<f64>() * 8.0;
            let price = (180_000.0 + 700_000.0 * coast * coast + gauss(rng, 60_000.0))
                .clamp(40_000.0, 2_000_000.0);
            let precip_year = (15.0 + 45.0 * (1.0 - north) * rng.gen::<f64>() + 10.0).max(3.0);

            let n = row * COLS + col + 1;
            counties.push(County {
                fips: format!("{:02}{:03}", row + 1, col * 2 + 1),
                name: format!("County {n}"),
                cell: [lon0, lat0, lon0 + dx, lat0 + dy],
                house_price: price.round(),
                min_tmp_year: min_year.round(),
                max_tmp_year: max_year.round(),
                min_avg_tmp_year: (min_avg * 10.0).round() / 10.0,
                max_avg_tmp_year: (max_avg * 10.0).round() / 10.0,
                avg_precip_month: ((precip_year / 12.0) * 100.0).round() / 100.0,
                total_precip_year: (precip_year * 100.0).round() / 100.0,
            });
        }
    }
    Ok(counties)
}

fn write_parquet(path: &Path, counties: &[County]) -> Result<()> {
    let text = |f: fn(&County) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(counties.iter().map(f).collect::<Vec<_>>()))
    };
    let num = |f: fn(&County) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(counties.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("fips", DataType::Utf8, false),
        Field::new("county", DataType::Utf8, false),
        Field::new("house_price", DataType::Float64, false),
        Field::new("min_tmp_year", DataType::Float64, false),
        Field::new("max_tmp_year", DataType::Float64, false),
        Field::new("min_avg_tmp_year", DataType::Float64, false),
        Field::new("max_avg_tmp_year", DataType::Float64, false),
        Field::new("avg_precip_month", DataType::Float64, false),
        Field::new("total_precip_year", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|c| c.fips.as_str()),
            text(|c| c.name.as_str()),
            num(|c| c.house_price),
            num(|c| c.min_tmp_year),
            num(|c| c.max_tmp_year),
            num(|c| c.min_avg_tmp_year),
            num(|c| c.max_avg_tmp_year),
            num(|c| c.avg_precip_month),
            num(|c| c.total_precip_year),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_geojson(path: &Path, counties: &[County]) -> Result<()> {
    let features: Vec<_> = counties
        .iter()
        .map(|c| {
            let [x0, y0, x1, y1] = c.cell;
            json!({
                "type": "Feature",
                "id": c.fips,
                "properties": { "NAME": c.name },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]],
                },
            })
        })
        .collect();
    let collection = json!({ "type": "FeatureCollection", "features": features });

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer(file, &collection).context("writing GeoJSON")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let counties = generate(&mut rng)?;

    let dir = Path::new("data");
    std::fs::create_dir_all(dir).context("creating data directory")?;
    let records = dir.join("counties.parquet");
    let shapes = dir.join("counties.geojson");
    write_parquet(&records, &counties)?;
    write_geojson(&shapes, &counties)?;

    println!(
        "Wrote {} counties to {} and {}",
        counties.len(),
        records.display(),
        shapes.display()
    );
    println!(
        "Run with: county-explorer --records {} --boundaries {}",
        records.display(),
        shapes.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_counties() {
        let a = generate(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.len(), COLS * ROWS);
        assert!(a.iter().zip(&b).all(|(x, y)| x.fips == y.fips && x.house_price == y.house_price));
        assert!(a
            .iter()
            .all(|c| c.min_tmp_year <= c.min_avg_tmp_year && (40_000.0..=2_000_000.0).contains(&c.house_price)));
    }
}
