//! # bd-rate
//!
//! Bjontegaard-Delta rate (BD-rate) between two rate-quality curves.
//!
//! Given `(rate, metric)` samples for an anchor and a test curve, both curves
//! are fitted as `log10(rate)` over the quality metric, integrated over the
//! metric range they share, and the mean log-rate difference is reported as
//! a percentage: negative when the test needs fewer bits at equal quality.
//!
//! ## Quick Start
//!
//! ```rust
//! use bd_rate::{BdRateConfig, Method, bd_rate};
//!
//! let config = BdRateConfig::builder()
//!     .min_overlap(0.5)
//!     .method(Method::Akima)
//!     .build();
//!
//! let bd = bd_rate(
//!     &[100.0, 200.0, 400.0],
//!     &[30.0, 33.0, 36.0],
//!     &[90.0, 180.0, 380.0],
//!     &[30.0, 33.0, 36.0],
//!     &config,
//! )?;
//! assert!(bd < 0.0);
//! # Ok::<(), bd_rate::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`curve`]: Sorting and log transform of raw samples
//! - [`overlap`]: Shared quality range and minimum-overlap policy
//! - [`interpolation`]: Akima and natural cubic splines, integration
//! - [`stats`]: BD-rate calculation and summary statistics
//! - [`import`]: CSV import of rate-quality samples
//! - [`batch`]: Grouped, parallel BD-rate over many curves

pub mod batch;
pub mod curve;
pub mod error;
pub mod import;
pub mod interpolation;
pub mod overlap;
pub mod stats;

// Re-export commonly used types
pub use batch::{BatchReport, PairResult, compare_all};
pub use curve::{PreparedCurve, Sample};
pub use error::{Error, Result};
pub use import::{CsvImporter, CsvSchema, RdSample};
pub use interpolation::{Interpolant, Method};
pub use overlap::OverlapWindow;
pub use stats::{BdRateConfig, BdRateReport, Summary, bd_rate};
