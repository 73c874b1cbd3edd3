use anyhow::Result;
use config::{Config, Environment, File};

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "APP";

fn default_log_level() -> String {
    "info".to_string()
}

/// The raw settings as they are read from the config file and the `APP_*`
/// environment variables. Empty values count as unset.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Configuration {
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub sites: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub default_site: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub site_variants: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub site_variant_separator: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub multisite_domain: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub multisite_domain_prefix_separator: Option<String>,
    /// Primary domain per site, e.g. `APP_SITE_DOMAIN--site-a`.
    #[serde(default)]
    pub site_domain: HashMap<String, String>,
    /// Comma separated alias domains per site, e.g. `APP_SITE_DOMAIN_ALIASES--site-a`.
    #[serde(default)]
    pub site_domain_aliases: HashMap<String, String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Configuration {
    /// Reads the given file (if any) with the process environment layered on top.
    pub fn parse(path: Option<PathBuf>) -> Result<Self> {
        Self::load(path, None)
    }

    /// Like [`Configuration::parse`], but reads `vars` instead of the process
    /// environment when given.
    pub fn load(path: Option<PathBuf>, vars: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let conf = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("--")
                    .source(vars),
            )
            .build()?;
        conf.try_deserialize().map_err(|e| e.into())
    }

    pub fn site_names(&self) -> Vec<String> {
        split_list(self.sites.as_deref())
    }

    pub fn variant_names(&self) -> Vec<String> {
        split_list(self.site_variants.as_deref())
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

pub fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<String> = Option::deserialize(deserializer)?;
    Ok(v.filter(|s| !s.trim().is_empty()))
}
