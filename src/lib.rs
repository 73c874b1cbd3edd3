pub mod args;
pub mod configuration;
pub mod context;
pub mod domain;
pub mod error;
pub mod matcher;
pub mod request;
pub mod router;
pub mod site_config;

pub use context::{SiteContext, SiteVariables};
pub use error::MatchError;
pub use matcher::MatchResult;
pub use request::{HostRequest, IncomingRequest};
pub use router::RequestMatcher;
pub use site_config::{DomainStrategy, SiteConfig};
