use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while updating a single metric.
///
/// The relay loop treats every variant the same way: log a warning and move
/// on to the next metric. Keeping the set closed means nothing a remote API
/// does can take the loop down.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Network-level failure before a usable response arrived.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("request returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// A field the response contract promises was absent.
    #[error("response missing field `{0}`")]
    MissingField(&'static str),

    /// The field was present but did not hold a number.
    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric {
        field: &'static str,
        value: serde_json::Value,
    },
}
