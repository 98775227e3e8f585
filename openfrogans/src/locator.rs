//! Retrieval of resources from a resolved site's content servers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::address::FrogansAddress;
use crate::directory::{ServerDescriptor, SiteDescriptor};
use crate::error::{FormatError, FrogansError, FrogansResult};
use crate::selection::ServerSelector;
use crate::transport::{AsyncHttpClient, HttpResponse};

/// Builds resource URLs and fetches them from content servers.
pub struct ResourceLocator<C> {
    http: Arc<C>,
    selector: Arc<dyn ServerSelector>,
    attempts: usize,
}

impl<C: AsyncHttpClient> ResourceLocator<C> {
    /// Create a locator trying at most `attempts` content servers per fetch.
    pub fn new(http: Arc<C>, selector: Arc<dyn ServerSelector>, attempts: usize) -> Self {
        Self {
            http,
            selector,
            attempts: attempts.max(1),
        }
    }

    /// URL of `resource_path` for `address` on `server`.
    ///
    /// `{scheme}://{host}:{port}{directory}/network-{code}.site-{code}/{resource_path}`
    pub fn resource_url(
        server: &ServerDescriptor,
        address: &FrogansAddress,
        resource_path: &str,
    ) -> String {
        format!(
            "{}/{}/{}",
            server.base_url(),
            address.site_segment(),
            resource_path
        )
    }

    /// Fetch `resource_path` of an already resolved site.
    ///
    /// Candidate servers are taken from the selector; with more than one
    /// attempt configured, a rejected or failed request moves on to the next
    /// distinct candidate and the last error is returned if all fail.
    ///
    /// # Errors
    ///
    /// - [`FormatError::NoSiteServers`] if the site lists no content servers
    /// - [`FrogansError::ResourceNotFound`] if the server rejects the request
    /// - [`FrogansError::Transport`] if the request could not be completed
    pub async fn fetch(
        &self,
        address: &FrogansAddress,
        site: &SiteDescriptor,
        resource_path: &str,
    ) -> FrogansResult<HttpResponse> {
        let candidates = self
            .selector
            .select_sequence(site.servers.len(), self.attempts);
        if candidates.is_empty() {
            return Err(FormatError::NoSiteServers {
                address: address.to_string(),
            }
            .into());
        }

        let mut last_error = None;
        for server in candidates.into_iter().filter_map(|index| site.servers.get(index)) {
            let url = Self::resource_url(server, address, resource_path);
            debug!(url = %url, "Fetching resource");

            match self.http.get(&url).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    warn!(url = %url, status = response.status, "Resource not found");
                    last_error = Some(FrogansError::ResourceNotFound {
                        address: address.to_string(),
                        url,
                        status: response.status,
                    });
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Resource request failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            FormatError::NoSiteServers {
                address: address.to_string(),
            }
            .into()
        }))
    }
}

impl<C> std::fmt::Debug for ResourceLocator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLocator")
            .field("selector", &self.selector)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}
