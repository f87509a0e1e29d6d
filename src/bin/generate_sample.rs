use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const BANDS: [&str; 6] = ["blue", "green", "red", "nir", "swir1", "swir2"];

/// Mean surface reflectance (x10000) of a vegetated pixel, per band.
const BASE: [f64; 6] = [450.0, 700.0, 600.0, 2800.0, 1700.0, 900.0];
/// Amplitude of the annual cycle, per band.
const SEASONAL: [f64; 6] = [60.0, 120.0, 180.0, 700.0, 250.0, 150.0];
/// Step applied after the disturbance, per band.
const BREAK_SHIFT: [f64; 6] = [150.0, 250.0, 600.0, -1400.0, 900.0, 700.0];

const REVISIT_DAYS: i64 = 16;
const QA_CLEAR: i64 = 0;
const QA_CLOUD: i64 = 4;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One observation row.
struct Observation {
    date: NaiveDate,
    values: [i64; 6],
    qa: i64,
}

fn simulate(start: NaiveDate, end: NaiveDate, disturbance: NaiveDate) -> Vec<Observation> {
    let mut rng = SimpleRng::new(42);
    let mut rows = Vec::new();
    let mut date = start;

    while date <= end {
        let phase = 2.0 * std::f64::consts::PI * f64::from(date.ordinal()) / 365.25;
        let disturbed = date >= disturbance;
        // Vegetation slowly recovers over ~4 years after the break.
        let recovery = if disturbed {
            let years = (date - disturbance).num_days() as f64 / 365.25;
            (1.0 - years / 4.0).max(0.0)
        } else {
            0.0
        };
        let cloudy = rng.next_f64() < 0.12;

        let mut values = [0i64; 6];
        for (b, value) in values.iter_mut().enumerate() {
            let mut v = BASE[b] - SEASONAL[b] * phase.cos() + BREAK_SHIFT[b] * recovery;
            if cloudy {
                v += 3000.0 + rng.gauss(0.0, 400.0);
            }
            v += rng.gauss(0.0, 40.0);
            *value = v.round().clamp(0.0, 10000.0) as i64;
        }

        rows.push(Observation {
            date,
            values,
            qa: if cloudy { QA_CLOUD } else { QA_CLEAR },
        });
        date += Duration::days(REVISIT_DAYS);
    }
    rows
}

fn write_csv(path: &str, rows: &[Observation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec!["dates"];
    header.extend(BANDS);
    header.push("qa");
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.date.format("%m/%d/%Y").to_string()];
        record.extend(row.values.iter().map(ToString::to_string));
        record.push(row.qa.to_string());
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Observation]) -> Result<()> {
    let mut fields = vec![Field::new("dates", DataType::Utf8, false)];
    fields.extend(BANDS.iter().map(|b| Field::new(*b, DataType::Int64, false)));
    fields.push(Field::new("qa", DataType::Int64, false));
    let schema = Arc::new(Schema::new(fields));

    let dates: Vec<String> = rows
        .iter()
        .map(|r| r.date.format("%m/%d/%Y").to_string())
        .collect();
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(dates))];
    for b in 0..BANDS.len() {
        let values: Vec<i64> = rows.iter().map(|r| r.values[b]).collect();
        arrays.push(Arc::new(Int64Array::from(values)));
    }
    arrays.push(Arc::new(Int64Array::from(
        rows.iter().map(|r| r.qa).collect::<Vec<_>>(),
    )));

    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let stem = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_series".to_string());

    let start = NaiveDate::from_ymd_opt(2000, 1, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2020, 12, 31).context("end date")?;
    let disturbance = NaiveDate::from_ymd_opt(2012, 6, 15).context("disturbance date")?;
    let rows = simulate(start, end, disturbance);

    let csv_path = format!("{stem}.csv");
    let parquet_path = format!("{stem}.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} observations ({} bands, break on {disturbance}) to {csv_path} and {parquet_path}",
        rows.len(),
        BANDS.len()
    );
    Ok(())
}
