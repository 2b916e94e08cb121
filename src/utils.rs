//! Utility functions for the rating engine

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique run ID
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Shift scores in place so their mean is zero
///
/// All three models are invariant to a constant additive shift, so the
/// solvers recenter every iteration to prevent unbounded drift.
pub fn recenter(scores: &mut [f64]) {
    if scores.is_empty() {
        return;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    for s in scores.iter_mut() {
        *s -= mean;
    }
}

/// Maximum absolute element-wise difference between two score vectors
pub fn max_abs_delta(old: &[f64], new: &[f64]) -> f64 {
    old.iter()
        .zip(new.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

/// Initialize structured logging with the given default level
///
/// `RUST_LOG` takes precedence when set. Safe to call more than once; later
/// calls are ignored.
pub fn init_logging(default_level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
