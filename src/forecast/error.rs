use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to parse forecast JSON from {0}")]
    JsonParse(String, #[source] serde_json::Error),

    #[error("Forecast response has no '{0}' block")]
    MissingBlock(&'static str),

    #[error("Forecast variable '{0}' is missing")]
    MissingVariable(&'static str),

    #[error("Forecast variable '{variable}' has {len} values, hour index {index} is out of range")]
    HourOutOfRange {
        variable: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Forecast variable '{variable}' is null at hour index {index}")]
    NullValue { variable: &'static str, index: usize },
}
