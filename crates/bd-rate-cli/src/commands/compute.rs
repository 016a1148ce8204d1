//! Single anchor-vs-test BD-rate command.

use anyhow::{Context, Result};
use bd_rate::stats::compute_curves;
use bd_rate::{BdRateConfig, Method, PreparedCurve};
use clap::Args;

use super::{parse_method, parse_min_overlap};

#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Anchor rates (comma-separated or repeated)
    #[arg(
        long,
        alias = "anchor_rate",
        value_delimiter = ',',
        num_args = 1..,
        required = true,
        allow_negative_numbers = true
    )]
    pub anchor_rate: Vec<f64>,

    /// Anchor metrics
    #[arg(
        long,
        alias = "anchor_metric",
        value_delimiter = ',',
        num_args = 1..,
        required = true,
        allow_negative_numbers = true
    )]
    pub anchor_metric: Vec<f64>,

    /// Test rates
    #[arg(
        long,
        alias = "test_rate",
        value_delimiter = ',',
        num_args = 1..,
        required = true,
        allow_negative_numbers = true
    )]
    pub test_rate: Vec<f64>,

    /// Test metrics
    #[arg(
        long,
        alias = "test_metric",
        value_delimiter = ',',
        num_args = 1..,
        required = true,
        allow_negative_numbers = true
    )]
    pub test_metric: Vec<f64>,

    /// Minimum overlap of the two metric ranges (0.0-1.0)
    #[arg(long, alias = "min_overlap", default_value = "0.5", value_parser = parse_min_overlap)]
    pub min_overlap: f64,

    /// Interpolation method (akima, cubic)
    #[arg(long, default_value = "akima", value_parser = parse_method)]
    pub method: Method,

    /// Print the full report as JSON instead of the bare percentage
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ComputeArgs, verbose: bool) -> Result<()> {
    println!("{}", render(&args, verbose)?);
    Ok(())
}

/// Compute the BD-rate and format what goes to stdout.
fn render(args: &ComputeArgs, verbose: bool) -> Result<String> {
    let config = BdRateConfig::builder()
        .min_overlap(args.min_overlap)
        .method(args.method)
        .build();

    let anchor = PreparedCurve::prepare_labeled("anchor", &args.anchor_rate, &args.anchor_metric)
        .context("Invalid anchor curve")?;
    let test = PreparedCurve::prepare_labeled("test", &args.test_rate, &args.test_metric)
        .context("Invalid test curve")?;

    if verbose {
        eprintln!("Method: {}, minimum overlap: {}", config.method, config.min_overlap);
        print_curve(&anchor);
        print_curve(&test);
    }

    let report = compute_curves(&anchor, &test, &config).context("BD-rate calculation failed")?;

    if verbose {
        eprintln!(
            "Overlap: [{}, {}] (ratio {:.4})",
            report.window.lo, report.window.hi, report.window.ratio
        );
        eprintln!(
            "Integrals: anchor {}, test {}",
            report.anchor_integral, report.test_integral
        );
        eprintln!("Mean log10 rate difference: {}", report.avg_log_diff);
    }

    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(report.bd_rate.to_string())
    }
}

fn print_curve(curve: &PreparedCurve) {
    eprintln!("{} curve ({} points):", curve.label(), curve.len());
    eprintln!("  {:>12} {:>14}", "metric", "log10(rate)");
    for (x, y) in curve.x().iter().zip(curve.y()) {
        eprintln!("  {:>12.4} {:>14.6}", x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(test_metric: Vec<f64>) -> ComputeArgs {
        ComputeArgs {
            anchor_rate: vec![100.0, 200.0, 400.0],
            anchor_metric: vec![30.0, 33.0, 36.0],
            test_rate: vec![80.0, 160.0, 320.0],
            test_metric,
            min_overlap: 0.5,
            method: Method::Akima,
            json: false,
        }
    }

    #[test]
    fn test_render_single_number() {
        let out = render(&args(vec![30.0, 33.0, 36.0]), false).unwrap();
        assert!(!out.contains('\n'));
        let bd: f64 = out.parse().unwrap();
        assert!((bd + 20.0).abs() < 1e-9, "{bd}");
    }

    #[test]
    fn test_render_json_report() {
        let mut args = args(vec![30.0, 33.0, 36.0]);
        args.json = true;
        let out = render(&args, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!((value["bd_rate"].as_f64().unwrap() + 20.0).abs() < 1e-9);
        assert_eq!(value["method"], "akima");
    }

    #[test]
    fn test_run_fails_without_overlap() {
        let err = run(args(vec![40.0, 43.0, 46.0]), false).unwrap_err();
        assert!(format!("{err:#}").contains("do not overlap"), "{err:#}");
    }

    #[test]
    fn test_run_fails_on_invalid_curve() {
        let mut args = args(vec![30.0, 33.0, 36.0]);
        args.test_rate = vec![80.0, -160.0, 320.0];
        assert!(run(args, true).is_err());
    }
}
