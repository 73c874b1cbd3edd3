use crate::configuration::Configuration;
use crate::domain::parse_aliases;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_VARIANT_SEPARATOR: &str = "--";
pub const DEFAULT_DOMAIN_SEPARATOR: &str = "_";

/// How sites are told apart by host name.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainStrategy {
    /// All sites live below one base domain, e.g. `site-a_example.com`.
    Shared {
        multisite_domain: String,
        domain_separator: String,
    },
    /// Every site has its own primary domain plus optional aliases.
    PerSite {
        domains: HashMap<String, String>,
        aliases: HashMap<String, Vec<String>>,
    },
}

/// Immutable matching rules. Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    sites: Vec<String>,
    default_site: String,
    variants: Vec<String>,
    variant_separator: String,
    strategy: DomainStrategy,
}

impl SiteConfig {
    pub fn new(
        sites: Vec<String>,
        default_site: Option<String>,
        variants: Vec<String>,
        variant_separator: Option<String>,
        strategy: DomainStrategy,
    ) -> Result<Self> {
        let first = sites.first().ok_or(anyhow!("no sites configured"))?.clone();

        let mut seen = HashSet::new();
        for site in sites.iter() {
            if !seen.insert(site.as_str()) {
                return Err(anyhow!("site {} is configured more than once", site));
            }
        }

        let default_site = default_site.unwrap_or(first);
        if !seen.contains(default_site.as_str()) {
            return Err(anyhow!("default site {} is not a configured site", default_site));
        }

        Ok(Self {
            sites,
            default_site,
            variants,
            variant_separator: variant_separator
                .unwrap_or(DEFAULT_VARIANT_SEPARATOR.to_string()),
            strategy,
        })
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn default_site(&self) -> &str {
        &self.default_site
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn variant_separator(&self) -> &str {
        &self.variant_separator
    }

    pub fn strategy(&self) -> &DomainStrategy {
        &self.strategy
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }

    /// The configured primary domain of a site under the per-site strategy.
    /// Blank values count as missing.
    pub fn domain_of(&self, site: &str) -> Option<&str> {
        match &self.strategy {
            DomainStrategy::PerSite { domains, .. } => domains
                .get(site)
                .map(|d| d.trim())
                .filter(|d| !d.is_empty()),
            DomainStrategy::Shared { .. } => None,
        }
    }

    pub fn aliases_of(&self, site: &str) -> &[String] {
        match &self.strategy {
            DomainStrategy::PerSite { aliases, .. } => {
                aliases.get(site).map(|a| a.as_slice()).unwrap_or(&[])
            }
            DomainStrategy::Shared { .. } => &[],
        }
    }
}

/// Environment keys arrive lowercased, so a site declared as `SiteA` finds
/// its domain under `sitea`.
fn per_site_value<'a>(values: &'a HashMap<String, String>, site: &str) -> Option<&'a String> {
    values
        .get(site)
        .or_else(|| values.get(&site.to_lowercase()))
}

impl TryFrom<Configuration> for SiteConfig {
    type Error = anyhow::Error;

    fn try_from(conf: Configuration) -> std::result::Result<Self, Self::Error> {
        let sites = conf.site_names();
        let variants = conf.variant_names();

        let strategy = match conf.multisite_domain {
            Some(multisite_domain) => DomainStrategy::Shared {
                multisite_domain,
                domain_separator: conf
                    .multisite_domain_prefix_separator
                    .unwrap_or(DEFAULT_DOMAIN_SEPARATOR.to_string()),
            },
            None => DomainStrategy::PerSite {
                domains: sites
                    .iter()
                    .filter_map(|site| {
                        per_site_value(&conf.site_domain, site).map(|d| (site.clone(), d.clone()))
                    })
                    .collect(),
                aliases: sites
                    .iter()
                    .filter_map(|site| {
                        per_site_value(&conf.site_domain_aliases, site)
                            .map(|list| (site.clone(), parse_aliases(list)))
                    })
                    .collect(),
            },
        };

        Self::new(
            sites,
            conf.default_site,
            variants,
            conf.site_variant_separator,
            strategy,
        )
    }
}
