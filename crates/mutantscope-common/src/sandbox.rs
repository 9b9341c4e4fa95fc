use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::MutantscopeError;

/// Default request timeout for annotation lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP client that only allows requests to approved domains.
/// Every outbound call in MutantScope goes through one of these.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 30 s timeout.
    pub fn new() -> Result<Self, MutantscopeError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with the default allowlist and the given timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, MutantscopeError> {
        let mut allowlist = HashSet::new();
        let domains = [
            "rest.ensembl.org",        // VEP REST
            "grch37.rest.ensembl.org", // VEP REST (GRCh37)
            "eutils.ncbi.nlm.nih.gov", // PubMed
            "localhost",
            "127.0.0.1",
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("mutantscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MutantscopeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Allows the host of `url`, used when a custom annotation endpoint is configured.
    pub fn allow_url_host(&mut self, url: &str) -> Result<(), MutantscopeError> {
        let parsed = Url::parse(url)
            .map_err(|e| MutantscopeError::Config(format!("Invalid URL '{}': {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| MutantscopeError::Config(format!("URL has no host: {}", url)))?;
        self.allow_domain(host);
        Ok(())
    }

    /// Validates if a URL is permitted under the current allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Builds a GET request if the URL passes the allowlist.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, MutantscopeError> {
        if !self.is_allowed(url) {
            return Err(MutantscopeError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}
