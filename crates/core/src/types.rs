use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyword recorded when a referral from a search engine carries none.
pub const UNSET_KEYWORD: &str = "(not set)";

/// The (search domain, keyword) pair revenue is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributionKey {
    /// Referring engine as `<domain>.<suffix>`, e.g. `bing.com`.
    pub search_domain: String,
    pub keyword: String,
}

impl AttributionKey {
    pub fn new(search_domain: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            search_domain: search_domain.into(),
            keyword: keyword.into(),
        }
    }

    /// Key for a referral whose keyword could not be determined.
    pub fn unset(search_domain: impl Into<String>) -> Self {
        Self::new(search_domain, UNSET_KEYWORD)
    }
}

impl fmt::Display for AttributionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.search_domain, self.keyword)
    }
}
