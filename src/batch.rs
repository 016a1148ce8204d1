//! BD-rate over many curves at once.
//!
//! Imported samples are grouped by their group identifier (image, sequence)
//! and then by curve. Within every group, each non-anchor curve is compared
//! against the anchor curve. Groups are independent and evaluated in
//! parallel; a failing pair is recorded, not fatal.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{PreparedCurve, Sample};
use crate::error::{Error, Result};
use crate::import::RdSample;
use crate::overlap;
use crate::stats::{self, BdRateConfig, Summary};

/// Outcome of one anchor-vs-test comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    /// Group the pair belongs to.
    pub group: Option<String>,
    /// Test curve label.
    pub test: String,
    /// BD-rate in percent, if the computation succeeded.
    pub bd_rate: Option<f64>,
    /// Diagnostic, if it failed.
    pub error: Option<String>,
}

/// Aggregate over all groups for one test curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveSummary {
    /// Test curve label.
    pub test: String,
    /// Number of groups where BD-rate was computed.
    pub succeeded: usize,
    /// Number of groups where it failed.
    pub failed: usize,
    /// Statistics over the successful BD-rates.
    pub summary: Option<Summary>,
}

/// Result of a batch comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Anchor curve label.
    pub anchor: String,
    /// Configuration used for every pair.
    pub config: BdRateConfig,
    /// Every pair, ordered by group then test label.
    pub pairs: Vec<PairResult>,
    /// One entry per test label, ordered by label.
    pub summaries: Vec<CurveSummary>,
}

impl BatchReport {
    /// Number of pairs that produced a BD-rate.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.pairs.iter().filter(|p| p.bd_rate.is_some()).count()
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let report: BatchReport = serde_json::from_str(&content)?;
        Ok(report)
    }

    /// Save the report to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

type Groups = BTreeMap<Option<String>, BTreeMap<String, Vec<Sample>>>;

fn group_samples(samples: &[RdSample]) -> Groups {
    let mut groups = Groups::new();
    for s in samples {
        groups
            .entry(s.group.clone())
            .or_default()
            .entry(s.curve.clone())
            .or_default()
            .push(s.sample());
    }
    groups
}

/// Compare every curve against `anchor` within each group.
///
/// Fails only when the configuration is invalid or `anchor` never appears.
///
/// # Example
///
/// ```
/// use bd_rate::batch::compare_all;
/// use bd_rate::import::RdSample;
/// use bd_rate::stats::BdRateConfig;
///
/// let row = |curve: &str, rate: f64, metric: f64| RdSample {
///     group: None,
///     curve: curve.to_string(),
///     rate,
///     metric,
/// };
/// let samples = vec![
///     row("x264", 100.0, 30.0),
///     row("x264", 200.0, 33.0),
///     row("x265", 80.0, 30.0),
///     row("x265", 160.0, 33.0),
/// ];
///
/// let report = compare_all(&samples, "x264", &BdRateConfig::default()).unwrap();
/// assert!((report.pairs[0].bd_rate.unwrap() + 20.0).abs() < 1e-9);
/// ```
pub fn compare_all(
    samples: &[RdSample],
    anchor: &str,
    config: &BdRateConfig,
) -> Result<BatchReport> {
    overlap::check_min_overlap(config.min_overlap)?;
    if !samples.iter().any(|s| s.curve == anchor) {
        return Err(Error::invalid_input(
            "anchor",
            format!("curve '{anchor}' not found in samples"),
        ));
    }

    let groups: Vec<_> = group_samples(samples).into_iter().collect();

    let pairs: Vec<PairResult> = groups
        .par_iter()
        .map(|(group, curves)| compare_group(group.as_ref(), curves, anchor, config))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    let mut by_test: BTreeMap<&str, (Vec<f64>, usize)> = BTreeMap::new();
    for pair in &pairs {
        let entry = by_test.entry(pair.test.as_str()).or_default();
        match pair.bd_rate {
            Some(bd) => entry.0.push(bd),
            None => entry.1 += 1,
        }
    }
    let summaries = by_test
        .into_iter()
        .map(|(test, (values, failed))| CurveSummary {
            test: test.to_string(),
            succeeded: values.len(),
            failed,
            summary: Summary::compute(&values),
        })
        .collect();

    Ok(BatchReport {
        anchor: anchor.to_string(),
        config: *config,
        pairs,
        summaries,
    })
}

fn compare_group(
    group: Option<&String>,
    curves: &BTreeMap<String, Vec<Sample>>,
    anchor_label: &str,
    config: &BdRateConfig,
) -> Vec<PairResult> {
    let result = |test: &str, outcome: std::result::Result<f64, String>| {
        let (bd_rate, error) = match outcome {
            Ok(bd) => (Some(bd), None),
            Err(e) => (None, Some(e)),
        };
        PairResult {
            group: group.cloned(),
            test: test.to_string(),
            bd_rate,
            error,
        }
    };

    let anchor = match curves.get(anchor_label) {
        Some(samples) => PreparedCurve::from_samples("anchor", samples).map_err(|e| e.to_string()),
        None => Err(format!("anchor curve '{anchor_label}' missing in group")),
    };

    curves
        .iter()
        .filter(|(label, _)| label.as_str() != anchor_label)
        .map(|(label, samples)| {
            let outcome = anchor.as_ref().map_err(Clone::clone).and_then(|anchor| {
                PreparedCurve::from_samples(label, samples)
                    .and_then(|test| stats::compute_curves(anchor, &test, config))
                    .map(|report| report.bd_rate)
                    .map_err(|e| e.to_string())
            });
            result(label.as_str(), outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group: &str, curve: &str, rate: f64, metric: f64) -> RdSample {
        RdSample {
            group: Some(group.to_string()),
            curve: curve.to_string(),
            rate,
            metric,
        }
    }

    fn curve_rows(group: &str, curve: &str, scale: f64) -> Vec<RdSample> {
        [(100.0, 30.0), (200.0, 33.0), (400.0, 36.0), (800.0, 39.0)]
            .iter()
            .map(|(r, m)| row(group, curve, r * scale, *m))
            .collect()
    }

    #[test]
    fn test_compare_all_groups() {
        let mut samples = Vec::new();
        for group in ["b.png", "a.png"] {
            samples.extend(curve_rows(group, "ref", 1.0));
            samples.extend(curve_rows(group, "fast", 1.1));
            samples.extend(curve_rows(group, "slow", 0.9));
        }

        let report = compare_all(&samples, "ref", &BdRateConfig::default()).unwrap();

        assert_eq!(report.pairs.len(), 4);
        assert_eq!(report.succeeded(), 4);
        // Ordered by group, then test label
        assert_eq!(report.pairs[0].group.as_deref(), Some("a.png"));
        assert_eq!(report.pairs[0].test, "fast");
        assert_eq!(report.pairs[1].test, "slow");
        assert_eq!(report.pairs[2].group.as_deref(), Some("b.png"));

        assert_eq!(report.summaries.len(), 2);
        let fast = &report.summaries[0];
        assert_eq!(fast.test, "fast");
        assert_eq!(fast.succeeded, 2);
        let summary = fast.summary.as_ref().unwrap();
        assert!((summary.mean - 10.0).abs() < 1e-9);

        let slow = report.summaries[1].summary.as_ref().unwrap();
        assert!((slow.median + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_failures_are_recorded() {
        let mut samples = curve_rows("a", "ref", 1.0);
        samples.extend(curve_rows("a", "ok", 0.5));
        // Disjoint quality range
        samples.push(row("a", "far", 100.0, 50.0));
        samples.push(row("a", "far", 200.0, 55.0));
        // Group without the anchor
        samples.extend(curve_rows("b", "ok", 0.5));

        let report = compare_all(&samples, "ref", &BdRateConfig::default()).unwrap();

        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.succeeded(), 1);

        let far = report.pairs.iter().find(|p| p.test == "far").unwrap();
        assert!(far.bd_rate.is_none());
        assert!(far.error.as_ref().unwrap().contains("do not overlap"));

        let ok_summary = report.summaries.iter().find(|s| s.test == "ok").unwrap();
        assert_eq!(ok_summary.succeeded, 1);
        assert_eq!(ok_summary.failed, 1);
    }

    #[test]
    fn test_unknown_anchor() {
        let samples = curve_rows("a", "ref", 1.0);
        let err = compare_all(&samples, "missing", &BdRateConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_report_save_and_load() {
        let mut samples = curve_rows("a", "ref", 1.0);
        samples.extend(curve_rows("a", "new", 0.8));

        let report = compare_all(&samples, "ref", &BdRateConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save(&path).unwrap();
        let back = BatchReport::load(&path).unwrap();

        assert_eq!(back.pairs, report.pairs);
        assert_eq!(back.anchor, "ref");
        assert_eq!(back.config, report.config);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "{\"anchor\": ").unwrap();

        let err = BatchReport::load(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        let err = BatchReport::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
