//! Construction-time configuration errors

use thiserror::Error;

/// Rejected configuration. Runtime transitions never fail; only building a
/// grid, scheduler or settings document can.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must have at least one column and one row (got {cols}x{rows})")]
    EmptyGrid { cols: i32, rows: i32 },

    #[error("starting body of length {len} does not fit a {cols}x{rows} grid")]
    BodyDoesNotFit { len: usize, cols: i32, rows: i32 },

    #[error("step rate must be a positive finite number of steps per second (got {0})")]
    InvalidStepRate(f64),

    #[error("catch-up cap must allow at least one step per tick")]
    ZeroCatchUp,

    #[error("invalid input option `{field}`: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error("failed to parse settings")]
    Parse(#[from] serde_json::Error),
}
