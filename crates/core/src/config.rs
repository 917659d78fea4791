use serde::Deserialize;

use crate::error::SearchRevResult;

/// Root application configuration. Loaded from environment variables
/// with the prefix `SEARCHREV__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub attribution: AttributionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Rules the attribution engine applies to each hit.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributionConfig {
    /// Second-level domain label of the site being analyzed.
    #[serde(default = "default_target_site")]
    pub target_site: String,
    /// Event code that marks a completed purchase.
    #[serde(default = "default_purchase_event_code")]
    pub purchase_event_code: String,
    /// Engine whose keyword sits behind the `&q=` marker.
    #[serde(default = "default_primary_engine")]
    pub primary_engine: String,
    /// Engines whose keyword is the value of the first query parameter.
    #[serde(default = "default_secondary_engines")]
    pub secondary_engines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one sub-directory per bucket.
    #[serde(default = "default_storage_root")]
    pub root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

// Default functions
fn default_target_site() -> String {
    "esshopzilla".to_string()
}
fn default_purchase_event_code() -> String {
    "1".to_string()
}
fn default_primary_engine() -> String {
    "google".to_string()
}
fn default_secondary_engines() -> Vec<String> {
    ["yahoo", "bing", "duckduckgo", "yandex"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_storage_root() -> String {
    "./data".to_string()
}
fn default_output_prefix() -> String {
    "hit-level-data/output/".to_string()
}
fn default_file_suffix() -> String {
    "SearchKeywordPerformance".to_string()
}
fn default_extension() -> String {
    "tab".to_string()
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            target_site: default_target_site(),
            purchase_event_code: default_purchase_event_code(),
            primary_engine: default_primary_engine(),
            secondary_engines: default_secondary_engines(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_prefix: default_output_prefix(),
            file_suffix: default_file_suffix(),
            extension: default_extension(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, e.g.
    /// `SEARCHREV__ATTRIBUTION__TARGET_SITE=esshopzilla`.
    pub fn load() -> SearchRevResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("SEARCHREV")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("attribution.secondary_engines"),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
