use thiserror::Error;

/// Why a host could not be resolved to a site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("missing domain configuration for site {site}")]
    MissingSiteDomain { site: String },

    #[error("unable to match host {host} to a site")]
    UnresolvedHost { host: String },

    #[error("unknown site {site} given")]
    UnknownSite { site: String },

    #[error("unknown site variant {variant} given")]
    UnknownVariant { variant: String },
}

pub type Result<T, E = MatchError> = std::result::Result<T, E>;
