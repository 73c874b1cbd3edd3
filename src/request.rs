use url::Url;

/// What matching needs to know about a request.
pub trait HostRequest {
    fn host(&self) -> &str;
}

/// A request reduced to its host name, as extracted by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    pub host: String,
}

impl IncomingRequest {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl HostRequest for IncomingRequest {
    fn host(&self) -> &str {
        &self.host
    }
}

impl HostRequest for Url {
    fn host(&self) -> &str {
        self.host_str().unwrap_or("")
    }
}
