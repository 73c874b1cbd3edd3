use crate::domain::{shared_site_host, shared_site_pattern, shared_variant_pattern};
use crate::error::{MatchError, Result};
use crate::matcher::{MatchResult, Matcher};
use crate::site_config::{DomainStrategy, SiteConfig};
use anyhow::anyhow;
use regex::Regex;

/// Resolves hosts of the form `[<variant><sep>]<site><prefix sep><domain>`.
#[derive(Debug, Clone)]
pub struct SharedDomainMatcher {
    sites: Vec<String>,
    default_site: String,
    multisite_domain: String,
    domain_separator: String,
    variant_pattern: Option<Regex>,
    site_pattern: Regex,
}

impl SharedDomainMatcher {
    pub fn new(conf: &SiteConfig) -> anyhow::Result<Self> {
        let (multisite_domain, domain_separator) = match conf.strategy() {
            DomainStrategy::Shared {
                multisite_domain,
                domain_separator,
            } => (multisite_domain, domain_separator),
            DomainStrategy::PerSite { .. } => {
                return Err(anyhow!("no multisite domain configured"));
            }
        };

        Ok(Self {
            sites: conf.sites().to_vec(),
            default_site: conf.default_site().to_string(),
            multisite_domain: multisite_domain.clone(),
            domain_separator: domain_separator.clone(),
            variant_pattern: shared_variant_pattern(
                conf.variants(),
                conf.variant_separator(),
                domain_separator,
                multisite_domain,
            )?,
            site_pattern: shared_site_pattern(domain_separator, multisite_domain)?,
        })
    }

    fn site_host(&self, site: &str) -> String {
        shared_site_host(site, &self.domain_separator, &self.multisite_domain)
    }
}

impl Matcher for SharedDomainMatcher {
    fn match_host(&self, host: &str) -> Result<MatchResult> {
        let variant_caps = self
            .variant_pattern
            .as_ref()
            .and_then(|re| re.captures(host));

        let (site, variant, effective_host) = if let Some(caps) = variant_caps {
            (
                caps["site"].to_string(),
                Some(caps["variant"].to_string()),
                host.to_string(),
            )
        } else if let Some(caps) = self.site_pattern.captures(host) {
            (caps["site"].to_string(), None, host.to_string())
        } else if host == self.multisite_domain {
            let site = self.default_site.clone();
            let effective_host = self.site_host(&site);
            (site, None, effective_host)
        } else {
            return Err(MatchError::UnresolvedHost {
                host: host.to_string(),
            });
        };

        if !self.sites.contains(&site) {
            return Err(MatchError::UnknownSite { site });
        }

        Ok(MatchResult {
            canonical_host: self.site_host(&site),
            site,
            variant,
            effective_host,
        })
    }

    fn strategy_name(&self) -> &'static str {
        "shared domain"
    }
}
