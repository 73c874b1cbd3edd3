mod shared_domain;
mod site_domain;

pub use shared_domain::SharedDomainMatcher;
pub use site_domain::SiteDomainMatcher;

use crate::error::Result;
use crate::site_config::{DomainStrategy, SiteConfig};

/// A successfully resolved host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub site: String,
    pub variant: Option<String>,
    /// The host as presented, except for a bare shared domain which is
    /// expanded to the default site's host.
    pub effective_host: String,
    /// The primary host of the site, independent of alias and variant.
    pub canonical_host: String,
}

pub trait Matcher {
    fn match_host(&self, host: &str) -> Result<MatchResult>;
    fn strategy_name(&self) -> &'static str;
}

/// Compiles the matcher for the configured domain strategy.
pub fn from_config(conf: &SiteConfig) -> anyhow::Result<Box<dyn Matcher + Send + Sync + 'static>> {
    let matcher: Box<dyn Matcher + Send + Sync + 'static> = match conf.strategy() {
        DomainStrategy::Shared { .. } => Box::new(SharedDomainMatcher::new(conf)?),
        DomainStrategy::PerSite { .. } => Box::new(SiteDomainMatcher::new(conf)?),
    };
    Ok(matcher)
}
