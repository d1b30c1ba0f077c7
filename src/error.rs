use thiserror::Error;

/// Failures raised by the metrics pipeline. All are local validation
/// failures detected at the point of computation; none are retryable.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("not enough data for {metric}: need at least {needed} samples, got {got}")]
    InsufficientData {
        metric: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("beat timestamps are not strictly increasing at index {index}")]
    NonMonotonicTimestamps { index: usize },

    #[error("numeric domain violation computing {metric}: {detail}")]
    NumericDomain {
        metric: &'static str,
        detail: String,
    },
}
