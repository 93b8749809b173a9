use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::decode::DecodeError;

/// Why a fetch attempt produced no report.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach the weather service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather service responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to read report file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
