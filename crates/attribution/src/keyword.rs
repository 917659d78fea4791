//! Search keyword extraction from search-engine referrer URLs.

use searchrev_core::config::AttributionConfig;
use thiserror::Error;

/// Marker that precedes the keyword in a primary-engine referrer.
const PRIMARY_QUERY_MARKER: &str = "&q=";

/// The primary engine's referrer did not carry a readable keyword.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeywordError {
    #[error("{engine} referrer has no `&q=` marker")]
    MissingQueryMarker { engine: String },
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    primary_engine: String,
    secondary_engines: Vec<String>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::from_config(&AttributionConfig::default())
    }
}

impl KeywordExtractor {
    pub fn new(primary_engine: impl Into<String>, secondary_engines: Vec<String>) -> Self {
        Self {
            primary_engine: primary_engine.into(),
            secondary_engines,
        }
    }

    pub fn from_config(config: &AttributionConfig) -> Self {
        Self::new(
            config.primary_engine.clone(),
            config.secondary_engines.clone(),
        )
    }

    /// Extract the keyword a visitor searched for on `domain`.
    ///
    /// `Ok(None)` means `domain` is not a search engine this extractor knows.
    /// Only the primary engine can fail; a secondary engine always yields the
    /// last `=` segment of the first `&` token, of the whole URL when it has
    /// no query string.
    pub fn extract(&self, domain: &str, url: &str) -> Result<Option<String>, KeywordError> {
        let raw = if domain == self.primary_engine {
            let start = url
                .find(PRIMARY_QUERY_MARKER)
                .map(|idx| idx + PRIMARY_QUERY_MARKER.len())
                .ok_or_else(|| KeywordError::MissingQueryMarker {
                    engine: domain.to_string(),
                })?;
            let rest = &url[start..];
            rest.split('&').next().unwrap_or(rest)
        } else if self.secondary_engines.iter().any(|engine| engine == domain) {
            let query = url.split_once('?').map_or(url, |(_, query)| query);
            let first_param = query.split('&').next().unwrap_or(query);
            first_param.rsplit('=').next().unwrap_or(first_param)
        } else {
            return Ok(None);
        };

        Ok(Some(normalize(raw)))
    }
}

fn normalize(raw: &str) -> String {
    raw.replace('+', " ").to_lowercase()
}
