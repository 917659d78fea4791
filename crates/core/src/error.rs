use thiserror::Error;

pub type SearchRevResult<T> = Result<T, SearchRevError>;

/// Boxed cause carried by the run-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures that end a run for one input. Malformed hits never surface here;
/// they are diverted inside the attribution engine.
#[derive(Error, Debug)]
pub enum SearchRevError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream unavailable ({location}): {source}")]
    UpstreamUnavailable { location: String, source: BoxError },

    #[error("Downstream unavailable ({destination}): {source}")]
    DownstreamUnavailable { destination: String, source: BoxError },
}

impl SearchRevError {
    pub fn upstream(location: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::UpstreamUnavailable {
            location: location.into(),
            source: source.into(),
        }
    }

    pub fn downstream(destination: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DownstreamUnavailable {
            destination: destination.into(),
            source: source.into(),
        }
    }
}

impl From<config::ConfigError> for SearchRevError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
