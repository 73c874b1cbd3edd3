use crate::domain::{shared_site_host, variant_host};
use crate::error::{MatchError, Result};
use crate::matcher::MatchResult;
use crate::site_config::{DomainStrategy, SiteConfig};
use std::env;

pub const SITE: &str = "SITE";
pub const SITE_VARIANT: &str = "SITE_VARIANT";
pub const SITE_HOST: &str = "SITE_HOST";
pub const SITE_MAIN_HOST: &str = "SITE_MAIN_HOST";

/// The values handed to the rest of the application once a site is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteVariables {
    pub site: String,
    pub variant: Option<String>,
    pub host: String,
    pub main_host: String,
}

impl SiteVariables {
    /// All four variables by name. They are only ever published together.
    pub fn vars(&self) -> [(&'static str, String); 4] {
        [
            (SITE, self.site.clone()),
            (SITE_VARIANT, self.variant.clone().unwrap_or_default()),
            (SITE_HOST, self.host.clone()),
            (SITE_MAIN_HOST, self.main_host.clone()),
        ]
    }
}

impl From<MatchResult> for SiteVariables {
    fn from(res: MatchResult) -> Self {
        Self {
            site: res.site,
            variant: res.variant,
            host: res.effective_host,
            main_host: res.canonical_host,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Derives site variables from the configuration alone, for code running
/// outside of a request or building links to other sites and variants.
#[derive(Debug, Clone)]
pub struct SiteContext<'a> {
    conf: &'a SiteConfig,
    active_site: Option<String>,
    active_variant: Option<String>,
}

impl<'a> SiteContext<'a> {
    pub fn new(conf: &'a SiteConfig) -> Self {
        Self {
            conf,
            active_site: None,
            active_variant: None,
        }
    }

    /// Uses `SITE` and `SITE_VARIANT` from the process environment as the
    /// active site and variant.
    pub fn from_env(conf: &'a SiteConfig) -> Self {
        Self::new(conf)
            .with_active_site(env::var(SITE).ok())
            .with_active_variant(env::var(SITE_VARIANT).ok())
    }

    pub fn from_match(conf: &'a SiteConfig, res: &MatchResult) -> Self {
        Self::new(conf)
            .with_active_site(Some(res.site.clone()))
            .with_active_variant(res.variant.clone())
    }

    pub fn with_active_site(mut self, site: Option<String>) -> Self {
        self.active_site = non_empty(site);
        self
    }

    pub fn with_active_variant(mut self, variant: Option<String>) -> Self {
        self.active_variant = non_empty(variant);
        self
    }

    pub fn determine_active_site(&self) -> &str {
        self.active_site
            .as_deref()
            .unwrap_or(self.conf.default_site())
    }

    /// The active variant, empty for none.
    pub fn determine_active_site_variant(&self) -> &str {
        self.active_variant.as_deref().unwrap_or("")
    }

    /// The primary host of `site`, without any variant.
    pub fn main_host(&self, site: &str) -> Result<String> {
        match self.conf.strategy() {
            DomainStrategy::Shared {
                multisite_domain,
                domain_separator,
            } => Ok(shared_site_host(site, domain_separator, multisite_domain)),
            DomainStrategy::PerSite { .. } => self
                .conf
                .domain_of(site)
                .map(String::from)
                .ok_or_else(|| MatchError::MissingSiteDomain {
                    site: site.to_string(),
                }),
        }
    }

    /// Computes the variables a request for `site` and `variant` would have
    /// produced. Both default to the active ones; an empty variant means none.
    pub fn site_variables(&self, site: Option<&str>, variant: Option<&str>) -> Result<SiteVariables> {
        let site = site
            .filter(|s| !s.is_empty())
            .unwrap_or(self.determine_active_site());
        let variant = variant
            .unwrap_or(self.determine_active_site_variant())
            .to_string();

        if !self.conf.has_site(site) {
            return Err(MatchError::UnknownSite {
                site: site.to_string(),
            });
        }
        if !variant.is_empty() && !self.conf.has_variant(&variant) {
            return Err(MatchError::UnknownVariant { variant });
        }

        let main_host = self.main_host(site)?;
        let host = if variant.is_empty() {
            main_host.clone()
        } else {
            variant_host(&variant, self.conf.variant_separator(), &main_host)
        };

        Ok(SiteVariables {
            site: site.to_string(),
            variant: non_empty(Some(variant)),
            host,
            main_host,
        })
    }

    /// The host of the active site for another variant, e.g. to link to the
    /// admin variant. An empty variant gives the plain host.
    pub fn host_for_variant(&self, variant: &str) -> Result<String> {
        self.site_variables(None, Some(variant)).map(|vars| vars.host)
    }
}
