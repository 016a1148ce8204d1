//! CSV import of rate-quality samples.
//!
//! Each row is one measured point: which curve it belongs to (a codec, an
//! encoder configuration, ...), an optional group (image, sequence, clip),
//! the rate and the quality metric. Column names are matched
//! case-insensitively, with common aliases tried when no explicit name is set.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bd_rate::import::{CsvImporter, CsvSchema};
//!
//! let schema = CsvSchema::builder()
//!     .curve_column("encoder")
//!     .rate_column("kbps")
//!     .metric_column("psnr_y")
//!     .build();
//!
//! let samples = CsvImporter::new(schema).import("results.csv")?;
//! ```

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::Sample;
use crate::error::{Error, Result};

/// One imported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdSample {
    /// Group identifier (image, sequence). `None` when the file has no group column.
    pub group: Option<String>,
    /// Curve identifier (codec, configuration).
    pub curve: String,
    /// Rate value.
    pub rate: f64,
    /// Quality metric value.
    pub metric: f64,
}

impl RdSample {
    /// The `(rate, metric)` pair of this row.
    #[must_use]
    pub fn sample(&self) -> Sample {
        Sample::new(self.rate, self.metric)
    }
}

/// Schema for CSV import.
#[derive(Debug, Clone, Default)]
pub struct CsvSchema {
    /// Column name for the group identifier.
    pub group_column: Option<String>,
    /// Column name for the curve identifier.
    pub curve_column: Option<String>,
    /// Column name for the rate.
    pub rate_column: Option<String>,
    /// Column name for the quality metric.
    pub metric_column: Option<String>,
}

impl CsvSchema {
    /// Create a schema builder.
    #[must_use]
    pub fn builder() -> CsvSchemaBuilder {
        CsvSchemaBuilder::default()
    }

    /// Create a schema that auto-detects columns from common names.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::default()
    }

    /// Find a column index by configured name, then by aliases.
    ///
    /// A configured name that is missing from the header is an error rather
    /// than a silent fallback to an alias.
    fn find_column(
        headers: &[&str],
        primary: Option<&str>,
        aliases: &[&str],
    ) -> std::result::Result<Option<usize>, String> {
        if let Some(name) = primary {
            return find_header_index(headers, name)
                .map(Some)
                .ok_or_else(|| format!("Column '{name}' not found in header"));
        }

        Ok(aliases
            .iter()
            .find_map(|alias| find_header_index(headers, alias)))
    }
}

/// Builder for CSV schema.
#[derive(Debug, Default)]
pub struct CsvSchemaBuilder {
    schema: CsvSchema,
}

impl CsvSchemaBuilder {
    /// Set the group column name.
    #[must_use]
    pub fn group_column(mut self, name: impl Into<String>) -> Self {
        self.schema.group_column = Some(name.into());
        self
    }

    /// Set the curve column name.
    #[must_use]
    pub fn curve_column(mut self, name: impl Into<String>) -> Self {
        self.schema.curve_column = Some(name.into());
        self
    }

    /// Set the rate column name.
    #[must_use]
    pub fn rate_column(mut self, name: impl Into<String>) -> Self {
        self.schema.rate_column = Some(name.into());
        self
    }

    /// Set the metric column name.
    #[must_use]
    pub fn metric_column(mut self, name: impl Into<String>) -> Self {
        self.schema.metric_column = Some(name.into());
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> CsvSchema {
        self.schema
    }
}

const GROUP_ALIASES: &[&str] = &["group", "image", "sequence", "clip", "source", "name"];
const CURVE_ALIASES: &[&str] = &["curve", "codec", "encoder", "config", "label"];
const RATE_ALIASES: &[&str] = &[
    "rate",
    "bitrate",
    "kbps",
    "bpp",
    "bits_per_pixel",
    "bytes",
    "size",
    "file_size",
];
const METRIC_ALIASES: &[&str] = &[
    "metric",
    "psnr",
    "ssim",
    "ms_ssim",
    "vmaf",
    "ssimulacra2",
    "quality",
    "score",
];

/// CSV importer for rate-quality samples.
pub struct CsvImporter {
    schema: CsvSchema,
}

impl CsvImporter {
    /// Create a new importer with the given schema.
    #[must_use]
    pub fn new(schema: CsvSchema) -> Self {
        Self { schema }
    }

    /// Create an importer that auto-detects columns.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::new(CsvSchema::auto_detect())
    }

    /// Import samples from a CSV file.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<Vec<RdSample>> {
        let reader = csv::Reader::from_path(path.as_ref())?;
        self.read(reader)
    }

    /// Import samples from any CSV source with a header row.
    pub fn import_reader<R: Read>(&self, source: R) -> Result<Vec<RdSample>> {
        self.read(csv::Reader::from_reader(source))
    }

    fn read<R: Read>(&self, mut reader: csv::Reader<R>) -> Result<Vec<RdSample>> {
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

        let header_error = |reason: String| Error::CsvImport { line: 1, reason };

        let group_idx = CsvSchema::find_column(
            &header_refs,
            self.schema.group_column.as_deref(),
            GROUP_ALIASES,
        )
        .map_err(header_error)?;
        let curve_idx = CsvSchema::find_column(
            &header_refs,
            self.schema.curve_column.as_deref(),
            CURVE_ALIASES,
        )
        .map_err(header_error)?
        .ok_or_else(|| header_error("Could not find curve/codec column".to_string()))?;
        let rate_idx = CsvSchema::find_column(
            &header_refs,
            self.schema.rate_column.as_deref(),
            RATE_ALIASES,
        )
        .map_err(header_error)?
        .ok_or_else(|| header_error("Could not find rate/bitrate column".to_string()))?;
        let metric_idx = CsvSchema::find_column(
            &header_refs,
            self.schema.metric_column.as_deref(),
            METRIC_ALIASES,
        )
        .map_err(header_error)?
        .ok_or_else(|| header_error("Could not find metric/quality column".to_string()))?;

        let mut samples = Vec::new();

        let mut line = 1;
        for record in reader.records() {
            let record = record.map_err(|e| Error::CsvImport {
                line: e.position().map_or(line + 1, |p| p.line() as usize),
                reason: e.to_string(),
            })?;
            // Quoted fields may span lines, so trust the reader's position
            line = record.position().map_or(line + 1, |p| p.line() as usize);

            let curve = record.get(curve_idx).unwrap_or("").trim();
            let rate = record.get(rate_idx).unwrap_or("").trim();
            let metric = record.get(metric_idx).unwrap_or("").trim();

            // Incomplete rows are skipped, not rejected
            if curve.is_empty() || rate.is_empty() || metric.is_empty() {
                continue;
            }

            let group = group_idx
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(String::from);

            samples.push(RdSample {
                group,
                curve: curve.to_string(),
                rate: parse_number(rate, "rate", line)?,
                metric: parse_number(metric, "metric", line)?,
            });
        }

        Ok(samples)
    }
}

fn parse_number(field: &str, column: &str, line: usize) -> Result<f64> {
    field.parse().map_err(|_| Error::CsvImport {
        line,
        reason: format!("invalid {column} value '{field}'"),
    })
}

/// Find a header index by name (case-insensitive).
fn find_header_index(headers: &[&str], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}
