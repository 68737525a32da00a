//! Writes a synthetic launch-records file for trying out the dashboard.
//!
//! Usage: `generate_sample [OUTPUT] [--count N] [--seed S]`.  The format
//! follows the output extension: `.csv` or `.parquet`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// (site, relative launch frequency)
const SITES: [(&str, u32); 4] = [
    ("CCAFS LC-40", 26),
    ("KSC LC-39A", 13),
    ("VAFB SLC-4E", 10),
    ("CCAFS SLC-40", 7),
];

/// Booster eras in flight order: (category, max payload kg, success probability)
const BOOSTERS: [(&str, f64, f64); 5] = [
    ("v1.0", 700.0, 0.2),
    ("v1.1", 4500.0, 0.35),
    ("FT", 9600.0, 0.7),
    ("B4", 6000.0, 0.55),
    ("B5", 5400.0, 0.9),
];

#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic launch-records file (.csv or .parquet)")]
struct Args {
    /// Output file; `.parquet` / `.pq` selects Parquet, anything else CSV
    #[arg(default_value = "spacex_launch_dash.csv")]
    output: PathBuf,

    /// Number of launches to generate
    #[arg(short = 'n', long, default_value_t = 56)]
    count: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Serialize)]
struct Launch {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    site: &'static str,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version Category")]
    booster_category: &'static str,
}

fn generate(count: usize, rng: &mut StdRng) -> Vec<Launch> {
    let total_weight: u32 = SITES.iter().map(|(_, w)| w).sum();

    (0..count)
        .map(|i| {
            let mut pick = rng.gen_range(0..total_weight);
            let site = SITES
                .iter()
                .find(|(_, w)| {
                    if pick < *w {
                        true
                    } else {
                        pick -= w;
                        false
                    }
                })
                .map(|(s, _)| *s)
                .unwrap_or(SITES[0].0);

            let era = (i * BOOSTERS.len() / count.max(1)).min(BOOSTERS.len() - 1);
            let (booster_category, max_payload, p_success) = BOOSTERS[era];
            // round to whole kilograms like the manifest data
            let payload_mass_kg = rng.gen_range(0.0..=max_payload).round();

            Launch {
                flight_number: i as i64 + 1,
                site,
                class: rng.gen_bool(p_success) as i64,
                payload_mass_kg,
                booster_category,
            }
        })
        .collect()
}

fn write_csv(path: &Path, launches: &[Launch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for launch in launches {
        writer.serialize(launch)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, launches: &[Launch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.site))),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(
                launches.iter().map(|l| l.payload_mass_kg),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_category),
            )),
        ],
    )?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let Args {
        output,
        count,
        seed,
    } = Args::parse();

    let mut rng = StdRng::seed_from_u64(seed);
    let launches = generate(count, &mut rng);

    match output.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(&output, &launches)?,
        _ => write_csv(&output, &launches)?,
    }

    let successes = launches.iter().filter(|l| l.class == 1).count();
    println!(
        "Wrote {} launches ({} successful) to {}",
        launches.len(),
        successes,
        output.display()
    );
    Ok(())
}
