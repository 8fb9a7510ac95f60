use thiserror::Error;

/// Failures while talking to the PagerDuty API.
///
/// Empty listings are never an error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No API token configured, pass --api-token or set PAGERDUTY_TOKEN")]
    MissingToken,

    #[error("PagerDuty rejected the API token (status {status})")]
    Unauthorized { status: u16 },

    #[error("Request to PagerDuty failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("PagerDuty responded with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Unable to parse response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {path} did not contain the expected listing")]
    UnexpectedListing { path: String },

    #[error("Invalid API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
