//! Referrer classification: decides whether a hit came from the analyzed
//! site itself or from an external search engine.

use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferrerError {
    #[error("referrer is not an absolute URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("referrer has no host: {0}")]
    MissingHost(String),

    #[error("referrer host `{0}` has fewer than three labels")]
    ShortHost(String),
}

/// Where a hit was referred from, read off the `<sub>.<domain>.<suffix>` host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referrer {
    pub domain: String,
    pub suffix: String,
    pub internal: bool,
}

impl Referrer {
    /// `<domain>.<suffix>`, the form search domains are reported in.
    pub fn search_domain(&self) -> String {
        format!("{}.{}", self.domain, self.suffix)
    }
}

#[derive(Debug, Clone)]
pub struct ReferrerClassifier {
    target_site: String,
}

impl ReferrerClassifier {
    pub fn new(target_site: impl Into<String>) -> Self {
        Self {
            target_site: target_site.into(),
        }
    }

    pub fn classify(&self, referrer_url: &str) -> Result<Referrer, ReferrerError> {
        let url = Url::parse(referrer_url)?;
        let host = url
            .host_str()
            .ok_or_else(|| ReferrerError::MissingHost(referrer_url.to_string()))?;

        let mut labels = host.split('.').skip(1);
        let (Some(domain), Some(suffix)) = (labels.next(), labels.next()) else {
            return Err(ReferrerError::ShortHost(host.to_string()));
        };

        Ok(Referrer {
            internal: domain == self.target_site,
            domain: domain.to_string(),
            suffix: suffix.to_string(),
        })
    }
}
