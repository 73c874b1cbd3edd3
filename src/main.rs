use anyhow::{anyhow, Result};
use multisite_matcher::configuration::Configuration;
use multisite_matcher::{IncomingRequest, RequestMatcher, SiteConfig, SiteContext, SiteVariables};
#[macro_use]
extern crate log;
use clap::Parser;
use multisite_matcher::args::{Cli, Command};
use std::sync::Arc;
use url::Url;

fn print_vars(vars: &SiteVariables) {
    for (key, value) in vars.vars() {
        println!("{}={}", key, value);
    }
}

fn match_hosts(matcher: &RequestMatcher, hosts: &[String]) -> Result<()> {
    let mut failed = 0;
    for input in hosts {
        let res = if input.contains("://") {
            matcher.match_request(&Arc::new(Url::parse(input)?))
        } else {
            matcher.match_request(&Arc::new(IncomingRequest::new(input.as_str())))
        };
        match res {
            Ok(res) => print_vars(&res.into()),
            Err(e) => {
                warn!("{}: {}", input, e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(anyhow!("{} of {} hosts could not be matched", failed, hosts.len()));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let conf = Configuration::parse(cli.config)?;
    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .format_target(false)
        .parse_filters(conf.log_level.clone().as_str())
        .init();
    let site_config = SiteConfig::try_from(conf)?;

    match cli.command {
        Command::Match { hosts } => {
            let matcher = RequestMatcher::try_from(&site_config)?;
            info!(
                "Matching {} sites by {}",
                site_config.sites().len(),
                matcher.strategy_name()
            );
            match_hosts(&matcher, &hosts)?;
        }
        Command::Vars { site, variant } => {
            let ctx = SiteContext::from_env(&site_config);
            let vars = ctx.site_variables(site.as_deref(), variant.as_deref())?;
            print_vars(&vars);
        }
        Command::Link { variant } => {
            let ctx = SiteContext::from_env(&site_config);
            println!("{}", ctx.host_for_variant(&variant)?);
        }
    }

    Ok(())
}
