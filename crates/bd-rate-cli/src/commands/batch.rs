//! Batch BD-rate command over a CSV of samples.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bd_rate::{BdRateConfig, CsvImporter, CsvSchema, Method, compare_all};
use clap::Args;

use super::{parse_method, parse_min_overlap};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input CSV file (one row per rate/metric sample)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Label of the anchor curve
    #[arg(short, long)]
    pub anchor: String,

    /// Output file for the JSON report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Group column name (image, sequence)
    #[arg(long)]
    pub group_col: Option<String>,

    /// Curve column name (codec, configuration)
    #[arg(long)]
    pub curve_col: Option<String>,

    /// Rate column name
    #[arg(long)]
    pub rate_col: Option<String>,

    /// Metric column name
    #[arg(long)]
    pub metric_col: Option<String>,

    /// Minimum overlap of the two metric ranges (0.0-1.0)
    #[arg(long, alias = "min_overlap", default_value = "0.5", value_parser = parse_min_overlap)]
    pub min_overlap: f64,

    /// Interpolation method (akima, cubic)
    #[arg(long, default_value = "akima", value_parser = parse_method)]
    pub method: Method,
}

pub fn run(args: BatchArgs, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("Loading samples from: {}", args.input.display());
    }

    let mut schema = CsvSchema::builder();
    if let Some(col) = args.group_col {
        schema = schema.group_column(col);
    }
    if let Some(col) = args.curve_col {
        schema = schema.curve_column(col);
    }
    if let Some(col) = args.rate_col {
        schema = schema.rate_column(col);
    }
    if let Some(col) = args.metric_col {
        schema = schema.metric_column(col);
    }

    let samples = CsvImporter::new(schema.build())
        .import(&args.input)
        .with_context(|| format!("Failed to import CSV from {}", args.input.display()))?;

    if verbose {
        eprintln!("Loaded {} samples", samples.len());
    }

    let config = BdRateConfig::builder()
        .min_overlap(args.min_overlap)
        .method(args.method)
        .build();

    let report = compare_all(&samples, &args.anchor, &config)?;

    if verbose {
        for pair in &report.pairs {
            if let Some(err) = &pair.error {
                eprintln!(
                    "  {} / {}: {}",
                    pair.group.as_deref().unwrap_or("-"),
                    pair.test,
                    err
                );
            }
        }
    }

    println!(
        "BD-rate vs '{}' ({}, min overlap {})",
        report.anchor, config.method, config.min_overlap
    );
    println!("{:-<72}", "");
    println!(
        "{:<20} {:>6} {:>6} {:>12} {:>12} {:>12}",
        "Curve", "OK", "Failed", "Mean %", "Median %", "StdDev"
    );
    println!("{:-<72}", "");

    for curve in &report.summaries {
        let (mean, median, std_dev) = curve.summary.as_ref().map_or_else(
            || ("-".to_string(), "-".to_string(), "-".to_string()),
            |s| {
                (
                    format!("{:.3}", s.mean),
                    format!("{:.3}", s.median),
                    format!("{:.3}", s.std_dev),
                )
            },
        );
        println!(
            "{:<20} {:>6} {:>6} {:>12} {:>12} {:>12}",
            curve.test, curve.succeeded, curve.failed, mean, median, std_dev
        );
    }

    if let Some(output_path) = &args.output {
        report
            .save(output_path)
            .with_context(|| format!("Failed to write to {}", output_path.display()))?;
        println!();
        println!("Saved to: {}", output_path.display());
    }

    if report.succeeded() == 0 {
        bail!("No BD-rate could be computed against '{}'", report.anchor);
    }

    Ok(())
}
