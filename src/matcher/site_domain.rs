use crate::domain::{exact_pattern, site_domains, variant_pattern};
use crate::error::{MatchError, Result};
use crate::matcher::{MatchResult, Matcher};
use crate::site_config::{DomainStrategy, SiteConfig};
use anyhow::anyhow;
use regex::Regex;

#[derive(Debug, Clone)]
struct SitePatterns {
    main_host: String,
    exact: Regex,
    variant: Option<Regex>,
}

#[derive(Debug, Clone)]
struct SiteEntry {
    site: String,
    /// `None` if the site lacks a primary domain; reported once reached.
    patterns: Option<SitePatterns>,
}

/// Resolves hosts against each site's own domain and aliases, optionally
/// prefixed with `<variant><sep>`. Sites are tried in declaration order.
#[derive(Debug, Clone)]
pub struct SiteDomainMatcher {
    entries: Vec<SiteEntry>,
}

impl SiteDomainMatcher {
    pub fn new(conf: &SiteConfig) -> anyhow::Result<Self> {
        if let DomainStrategy::Shared { .. } = conf.strategy() {
            return Err(anyhow!("a multisite domain is configured"));
        }

        let mut entries = Vec::with_capacity(conf.sites().len());
        for site in conf.sites() {
            let patterns = match site_domains(conf, site) {
                Some(domains) => Some(SitePatterns {
                    main_host: domains[0].clone(),
                    exact: exact_pattern(&domains)?,
                    variant: variant_pattern(
                        conf.variants(),
                        conf.variant_separator(),
                        &domains,
                    )?,
                }),
                None => None,
            };
            entries.push(SiteEntry {
                site: site.clone(),
                patterns,
            });
        }
        Ok(Self { entries })
    }
}

impl Matcher for SiteDomainMatcher {
    fn match_host(&self, host: &str) -> Result<MatchResult> {
        for entry in self.entries.iter() {
            let patterns = entry
                .patterns
                .as_ref()
                .ok_or_else(|| MatchError::MissingSiteDomain {
                    site: entry.site.clone(),
                })?;

            let variant = if patterns.exact.is_match(host) {
                None
            } else if let Some(caps) = patterns
                .variant
                .as_ref()
                .and_then(|re| re.captures(host))
            {
                Some(caps["variant"].to_string())
            } else {
                continue;
            };

            return Ok(MatchResult {
                site: entry.site.clone(),
                variant,
                effective_host: host.to_string(),
                canonical_host: patterns.main_host.clone(),
            });
        }

        Err(MatchError::UnresolvedHost {
            host: host.to_string(),
        })
    }

    fn strategy_name(&self) -> &'static str {
        "per-site domain"
    }
}

#[cfg(test)]
mod test {
    use crate::domain::parse_aliases;
    use crate::error::MatchError;
    use crate::matcher::{Matcher, SiteDomainMatcher};
    use crate::site_config::{DomainStrategy, SiteConfig};
    use std::collections::HashMap;

    fn config(
        sites: &[&str],
        variants: &[&str],
        domains: &[(&str, &str)],
        aliases: &[(&str, &str)],
    ) -> SiteConfig {
        SiteConfig::new(
            sites.iter().map(|s| s.to_string()).collect(),
            None,
            variants.iter().map(|v| v.to_string()).collect(),
            Some(".".to_string()),
            DomainStrategy::PerSite {
                domains: domains
                    .iter()
                    .map(|(s, d)| (s.to_string(), d.to_string()))
                    .collect(),
                aliases: aliases
                    .iter()
                    .map(|(s, a)| (s.to_string(), parse_aliases(a)))
                    .collect::<HashMap<_, _>>(),
            },
        )
        .unwrap()
    }

    fn default_matcher(variants: &[&str]) -> SiteDomainMatcher {
        let conf = config(
            &["site-a", "site-b"],
            variants,
            &[("site-a", "site-a.com"), ("site-b", "site-b.com")],
            &[("site-a", "site-a.alias.com, site-a.alias2.com")],
        );
        SiteDomainMatcher::new(&conf).unwrap()
    }

    #[test]
    fn test_match_with_variants() {
        let matcher = default_matcher(&["api", "admin"]);
        let cases = [
            ("site-a.com", "site-a", None),
            ("api.site-a.com", "site-a", Some("api")),
            ("admin.site-a.com", "site-a", Some("admin")),
            ("api.site-b.com", "site-b", Some("api")),
            ("admin.site-b.com", "site-b", Some("admin")),
            ("site-b.com", "site-b", None),
            ("site-a.alias.com", "site-a", None),
            ("api.site-a.alias2.com", "site-a", Some("api")),
        ];

        for (host, site, variant) in cases {
            let res = matcher.match_host(host).unwrap();
            assert_eq!(res.site, site, "testing host: {}", host);
            assert_eq!(res.variant.as_deref(), variant, "testing host: {}", host);
            assert_eq!(res.effective_host, host, "testing host: {}", host);
        }
    }

    #[test]
    fn test_alias_keeps_main_host() {
        let matcher = default_matcher(&["api"]);
        let res = matcher.match_host("api.site-a.alias.com").unwrap();
        assert_eq!(res.canonical_host, "site-a.com");
        assert_eq!(
            matcher.match_host("site-a.alias.com").unwrap().canonical_host,
            matcher.match_host("site-a.com").unwrap().canonical_host
        );
    }

    #[test]
    fn test_no_match() {
        let matcher = default_matcher(&["api", "admin"]);
        for host in [
            "com",
            "foo.site-b.com",
            "api--site-b.com",
            "site-a.alias3.com",
            "apixsite-a.com",
        ] {
            assert_eq!(
                matcher.match_host(host).unwrap_err(),
                MatchError::UnresolvedHost {
                    host: host.to_string()
                },
                "testing host: {}",
                host
            );
        }
    }

    #[test]
    fn test_without_variants() {
        let matcher = default_matcher(&[]);
        assert_eq!(matcher.match_host("site-a.com").unwrap().site, "site-a");
        assert_eq!(matcher.match_host("site-b.com").unwrap().site, "site-b");
        for host in ["com", "foo.site-b.com", "admin.site-b.com", "api.site-b.com"] {
            assert!(matcher.match_host(host).is_err(), "testing host: {}", host);
        }
    }

    #[test]
    fn test_idempotent() {
        let matcher = default_matcher(&["api"]);
        let first = matcher.match_host("api.site-a.alias2.com");
        assert_eq!(first, matcher.match_host("api.site-a.alias2.com"));
        assert_eq!(first.unwrap().canonical_host, "site-a.com");
    }

    #[test]
    fn test_missing_domain() {
        let conf = config(
            &["site-a", "site-b", "site-c"],
            &[],
            &[("site-a", "site-a.com"), ("site-c", "site-c.com")],
            &[],
        );
        let matcher = SiteDomainMatcher::new(&conf).unwrap();

        assert_eq!(matcher.match_host("site-a.com").unwrap().site, "site-a");
        let expected = MatchError::MissingSiteDomain {
            site: "site-b".to_string(),
        };
        assert_eq!(matcher.match_host("site-c.com").unwrap_err(), expected);
        assert_eq!(matcher.match_host("unknown.com").unwrap_err(), expected);
    }

    #[test]
    fn test_declaration_order_wins() {
        // "api.shop.com" is both site-a's alias and site-b's variant host.
        let conf = config(
            &["site-b", "site-a"],
            &["api"],
            &[("site-a", "site-a.com"), ("site-b", "shop.com")],
            &[("site-a", "api.shop.com")],
        );
        let matcher = SiteDomainMatcher::new(&conf).unwrap();
        let res = matcher.match_host("api.shop.com").unwrap();
        assert_eq!(res.site, "site-b");
        assert_eq!(res.variant.as_deref(), Some("api"));

        let conf = config(
            &["site-a", "site-b"],
            &["api"],
            &[("site-a", "site-a.com"), ("site-b", "shop.com")],
            &[("site-a", "api.shop.com")],
        );
        let matcher = SiteDomainMatcher::new(&conf).unwrap();
        let res = matcher.match_host("api.shop.com").unwrap();
        assert_eq!(res.site, "site-a");
        assert_eq!(res.variant, None);
    }
}
