use crate::error::Result;
use crate::matcher::{self, MatchResult, Matcher};
use crate::request::HostRequest;
use crate::site_config::SiteConfig;
use log::debug;
use std::sync::{Arc, RwLock, Weak};

type LastMatch = Weak<dyn HostRequest + Send + Sync + 'static>;

/// Matches requests against the compiled site rules.
///
/// Build one at startup and share it by reference between request handlers.
/// Apart from the most recently matched request, which is kept for
/// inspection only, it is never mutated.
pub struct RequestMatcher {
    matcher: Box<dyn Matcher + Send + Sync + 'static>,
    last_match: RwLock<Option<LastMatch>>,
}

impl TryFrom<&SiteConfig> for RequestMatcher {
    type Error = anyhow::Error;

    fn try_from(conf: &SiteConfig) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            matcher: matcher::from_config(conf)?,
            last_match: RwLock::new(None),
        })
    }
}

impl RequestMatcher {
    pub fn strategy_name(&self) -> &'static str {
        self.matcher.strategy_name()
    }

    /// Resolves a host name without touching the last match.
    pub fn match_host(&self, host: &str) -> Result<MatchResult> {
        let res = self.matcher.match_host(host)?;
        debug!(
            "Host {} matched site {} variant {}",
            host,
            res.site,
            res.variant.as_deref().unwrap_or("-")
        );
        Ok(res)
    }

    /// Resolves the host of `request` and remembers the request on success.
    pub fn match_request<R>(&self, request: &Arc<R>) -> Result<MatchResult>
    where
        R: HostRequest + Send + Sync + 'static,
    {
        let res = self.match_host(request.host())?;
        let weak = Arc::downgrade(request) as LastMatch;
        if let Ok(mut last) = self.last_match.write() {
            *last = Some(weak);
        }
        Ok(res)
    }

    /// The most recently matched request, if it is still alive.
    pub fn last_match(&self) -> Option<Arc<dyn HostRequest + Send + Sync + 'static>> {
        let last = self.last_match.read().ok()?;
        last.as_ref().and_then(Weak::upgrade)
    }
}

#[cfg(test)]
mod test {
    use crate::request::IncomingRequest;
    use crate::router::RequestMatcher;
    use crate::site_config::{DomainStrategy, SiteConfig};
    use std::sync::Arc;

    fn matcher() -> RequestMatcher {
        let conf = SiteConfig::new(
            vec!["site-a".to_string(), "site-b".to_string()],
            None,
            vec!["api".to_string()],
            None,
            DomainStrategy::Shared {
                multisite_domain: "localdev.space".to_string(),
                domain_separator: ".".to_string(),
            },
        )
        .unwrap();
        RequestMatcher::try_from(&conf).unwrap()
    }

    #[test]
    fn test_last_match() {
        let matcher = matcher();
        assert!(matcher.last_match().is_none());

        let first = Arc::new(IncomingRequest::new("site-a.localdev.space"));
        let res = matcher.match_request(&first).unwrap();
        assert_eq!(res.site, "site-a");
        assert_eq!(matcher.last_match().unwrap().host(), "site-a.localdev.space");

        let second = Arc::new(IncomingRequest::new("api--site-b.localdev.space"));
        matcher.match_request(&second).unwrap();
        assert_eq!(
            matcher.last_match().unwrap().host(),
            "api--site-b.localdev.space"
        );

        let failing = Arc::new(IncomingRequest::new("foo.localdev.space"));
        assert!(matcher.match_request(&failing).is_err());
        assert_eq!(
            matcher.last_match().unwrap().host(),
            "api--site-b.localdev.space"
        );
    }

    #[test]
    fn test_last_match_after_url_request() {
        let matcher = matcher();
        let url = Arc::new(url::Url::parse("https://site-b.localdev.space/").unwrap());
        matcher.match_request(&url).unwrap();
        assert_eq!(matcher.last_match().unwrap().host(), "site-b.localdev.space");
    }

    #[test]
    fn test_last_match_does_not_own() {
        let matcher = matcher();
        let request = Arc::new(IncomingRequest::new("site-b.localdev.space"));
        matcher.match_request(&request).unwrap();
        drop(request);
        assert!(matcher.last_match().is_none());
    }

    #[test]
    fn test_match_host_keeps_last_match() {
        let matcher = matcher();
        matcher.match_host("site-b.localdev.space").unwrap();
        assert!(matcher.last_match().is_none());
    }

    #[test]
    fn test_url_request() {
        let matcher = matcher();
        let url = Arc::new(url::Url::parse("https://api--site-a.localdev.space/user").unwrap());
        let res = matcher.match_request(&url).unwrap();
        assert_eq!(res.site, "site-a");
        assert_eq!(res.variant.as_deref(), Some("api"));
    }
}
