//! Error taxonomy for the lookup chain and the renderers.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("No places found for address '{address}'")]
    NoResults { address: String },

    #[error("Response from {url} is missing '{field}'")]
    MalformedResponse { url: String, field: String },

    #[error("Response from {url} is not valid JSON: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not parse timestamp '{value}': {source}")]
    TimeParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Forecast has {found} periods, need at least {expected}")]
    InsufficientPeriods { expected: usize, found: usize },
}

impl Error {
    /// Network or HTTP-level failure, as opposed to bad data.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}
