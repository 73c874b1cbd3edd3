//! Composition of per-site domain sets and the host patterns built from them.
//!
//! Every literal piece (domains, separators, variant names) is escaped
//! before it becomes part of a pattern, and every pattern is anchored at
//! both ends.

use crate::site_config::{DomainStrategy, SiteConfig};
use regex::{escape, Regex};

/// Characters a site name may consist of in a shared-domain host.
pub const SITE_NAME_CHARSET: &str = "[a-z-]+";

/// Splits a comma separated alias list, keeping declaration order.
pub fn parse_aliases(list: &str) -> Vec<String> {
    list.split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// `site-a` + `_` + `example.com`
pub fn shared_site_host(site: &str, domain_separator: &str, multisite_domain: &str) -> String {
    format!("{}{}{}", site, domain_separator, multisite_domain)
}

/// `admin` + `--` + `site-a_example.com`
pub fn variant_host(variant: &str, variant_separator: &str, host: &str) -> String {
    format!("{}{}{}", variant, variant_separator, host)
}

/// The acceptable domains of a site, primary domain first.
///
/// Returns `None` when the site has no primary domain under the per-site
/// strategy. Duplicates are kept as declared.
pub fn site_domains(conf: &SiteConfig, site: &str) -> Option<Vec<String>> {
    match conf.strategy() {
        DomainStrategy::Shared {
            multisite_domain,
            domain_separator,
        } => Some(vec![shared_site_host(
            site,
            domain_separator,
            multisite_domain,
        )]),
        DomainStrategy::PerSite { .. } => {
            let primary = conf.domain_of(site)?;
            let mut domains = vec![primary.to_string()];
            domains.extend(conf.aliases_of(site).iter().cloned());
            Some(domains)
        }
    }
}

fn alternation<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| escape(item.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Matches exactly one of the given domains.
pub fn exact_pattern<S: AsRef<str>>(domains: &[S]) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", alternation(domains)))
}

/// Matches `<variant><separator><domain>` for any of the variants and
/// domains, capturing the variant as `variant`.
///
/// Without variants there is nothing that may match, so no pattern is built.
pub fn variant_pattern<V: AsRef<str>, D: AsRef<str>>(
    variants: &[V],
    variant_separator: &str,
    domains: &[D],
) -> Result<Option<Regex>, regex::Error> {
    if variants.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(
        "^(?P<variant>{}){}(?:{})$",
        alternation(variants),
        escape(variant_separator),
        alternation(domains)
    ))
    .map(Some)
}

/// Matches `<site><separator><multisite domain>`, capturing the site name.
pub fn shared_site_pattern(
    domain_separator: &str,
    multisite_domain: &str,
) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "^(?P<site>{}){}$",
        SITE_NAME_CHARSET,
        escape(&format!("{}{}", domain_separator, multisite_domain))
    ))
}

/// Matches `<variant><variant separator><site><separator><multisite domain>`.
pub fn shared_variant_pattern<V: AsRef<str>>(
    variants: &[V],
    variant_separator: &str,
    domain_separator: &str,
    multisite_domain: &str,
) -> Result<Option<Regex>, regex::Error> {
    if variants.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(
        "^(?P<variant>{}){}(?P<site>{}){}$",
        alternation(variants),
        escape(variant_separator),
        SITE_NAME_CHARSET,
        escape(&format!("{}{}", domain_separator, multisite_domain))
    ))
    .map(Some)
}
