//! Subcommand implementations.

pub mod batch;
pub mod compute;

use bd_rate::Method;

/// Parse `--method`, rejecting anything but `akima` and `cubic`.
pub fn parse_method(s: &str) -> Result<Method, String> {
    s.parse::<Method>().map_err(|e| e.to_string())
}

/// Parse `--min-overlap`, which must lie in `[0, 1]`.
pub fn parse_min_overlap(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside [0, 1]"))
    }
}
