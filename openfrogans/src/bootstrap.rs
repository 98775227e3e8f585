//! Bootstrap discovery of naming-service servers.
//!
//! One seed host is chosen from the configured list, its directory document is
//! fetched, and the naming servers it lists become the resolver's server set.
//! Any failure is fatal: there is no fallback seed and no retry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::directory::{parse_naming_servers, ServerDescriptor};
use crate::error::{FormatError, FrogansError, FrogansResult};
use crate::selection::ServerSelector;
use crate::transport::AsyncHttpClient;

/// Loads the naming-server list from a seed host.
#[derive(Debug)]
pub struct BootstrapLoader<'a> {
    config: &'a ClientConfig,
    selector: Arc<dyn ServerSelector>,
}

impl<'a> BootstrapLoader<'a> {
    /// Create a loader choosing seeds with `selector`.
    pub fn new(config: &'a ClientConfig, selector: Arc<dyn ServerSelector>) -> Self {
        Self { config, selector }
    }

    /// Create a loader using the configured selection strategy.
    pub fn from_config(config: &'a ClientConfig) -> Self {
        Self::new(config, config.selection.build())
    }

    /// Fetch and parse the bootstrap document.
    ///
    /// # Errors
    ///
    /// - [`FrogansError::BootstrapFailure`] if no seed is configured, the request
    ///   fails or is rejected, the document is not well-formed, a server entry
    ///   lacks a field or has a bad port, or no naming servers are listed
    /// - [`FrogansError::Format`] if a server entry names an unknown transport
    ///   token
    pub async fn load<C: AsyncHttpClient>(&self, http: &C) -> FrogansResult<Vec<ServerDescriptor>> {
        let seed = self
            .selector
            .select(self.config.seed_hosts.len())
            .and_then(|index| self.config.seed_hosts.get(index))
            .ok_or_else(|| FrogansError::BootstrapFailure {
                url: String::new(),
                reason: "no seed host available".to_string(),
            })?;
        let url = self.config.bootstrap_url(seed);
        let failure = |reason: String| FrogansError::BootstrapFailure {
            url: url.clone(),
            reason,
        };

        debug!(url = %url, "Fetching bootstrap document");
        let response = http.get(&url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Bootstrap request failed");
            failure(e.to_string())
        })?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Bootstrap request rejected");
            return Err(failure(format!("HTTP {}", response.status)));
        }

        let body = response
            .text()
            .ok_or_else(|| failure("response body is not valid UTF-8".to_string()))?;

        let servers = parse_naming_servers(body).map_err(|e| match e {
            e @ FormatError::UnknownTransport { .. } => FrogansError::Format(e),
            FormatError::Xml { reason } => failure(reason),
            other => failure(other.to_string()),
        })?;

        if servers.is_empty() {
            return Err(failure("document lists no naming servers".to_string()));
        }

        info!(url = %url, count = servers.len(), "Loaded naming servers");
        Ok(servers)
    }
}
