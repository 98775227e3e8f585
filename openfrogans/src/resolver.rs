//! Two-step resolution of Frogans addresses.
//!
//! Resolving `network*site` against a naming server takes two requests:
//!
//! 1. Network validation: `{server}/{prefix}/network-{code}.{ext}`, skipped once
//!    the network has been confirmed
//! 2. Site lookup: `{server}/{prefix}/network-{code}.site-{code}.{ext}`, whose
//!    body is the site document
//!
//! Both requests go to the same naming server, chosen per call by the
//! resolver's [`ServerSelector`]. Resolved sites are cached under the raw
//! address string and returned without network activity afterwards.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::address::FrogansAddress;
use crate::cache::ResolverCache;
use crate::config::ClientConfig;
use crate::directory::{parse_site, ServerDescriptor, SiteDescriptor};
use crate::error::{FormatError, FrogansError, FrogansResult};
use crate::selection::ServerSelector;
use crate::transport::AsyncHttpClient;

/// Resolves addresses against a fixed set of naming servers.
pub struct Resolver<C> {
    http: Arc<C>,
    naming_servers: Vec<ServerDescriptor>,
    cache: ResolverCache,
    selector: Arc<dyn ServerSelector>,
    protocol_prefix: String,
    lookup_extension: String,
}

impl<C: AsyncHttpClient> Resolver<C> {
    /// Create a resolver with empty caches.
    ///
    /// Selection strategy, cache lifetime and lookup paths come from `config`.
    pub fn new(http: Arc<C>, naming_servers: Vec<ServerDescriptor>, config: &ClientConfig) -> Self {
        Self {
            http,
            naming_servers,
            cache: ResolverCache::with_ttl(config.cache_ttl),
            selector: config.selection.build(),
            protocol_prefix: config.protocol_prefix.clone(),
            lookup_extension: config.lookup_extension.clone(),
        }
    }

    /// Replace the naming-server selection policy.
    pub fn with_selector(mut self, selector: Arc<dyn ServerSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Naming servers this resolver selects from.
    pub fn naming_servers(&self) -> &[ServerDescriptor] {
        &self.naming_servers
    }

    /// Network and site caches.
    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    /// URL of the network validation request.
    pub fn network_url(&self, server: &ServerDescriptor, address: &FrogansAddress) -> String {
        self.lookup_url(server, &address.network_segment())
    }

    /// URL of the site lookup request.
    pub fn site_url(&self, server: &ServerDescriptor, address: &FrogansAddress) -> String {
        self.lookup_url(server, &address.site_segment())
    }

    fn lookup_url(&self, server: &ServerDescriptor, segment: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            server.base_url(),
            self.protocol_prefix,
            segment,
            self.lookup_extension
        )
    }

    /// Resolve `address` to its site descriptor.
    ///
    /// A cached descriptor is returned immediately. Otherwise the network is
    /// validated (unless already confirmed) and the site looked up; concurrent
    /// calls for the same address share one resolution.
    ///
    /// # Errors
    ///
    /// - [`FrogansError::Format`] for a malformed address or site document
    /// - [`FrogansError::NetworkNotFound`] if validation is rejected
    /// - [`FrogansError::SiteNotFound`] if the lookup is rejected
    /// - [`FrogansError::Transport`] if a request could not be completed
    /// - [`FrogansError::NoNamingServers`] if there is no server to ask
    pub async fn resolve(&self, address: &str) -> FrogansResult<SiteDescriptor> {
        if let Some(site) = self.cache.site(address).await {
            debug!(address, "Site cache hit");
            return Ok(site);
        }

        let parsed = FrogansAddress::parse(address)?;
        self.cache
            .get_or_resolve(address, self.resolve_uncached(address, &parsed))
            .await
    }

    async fn resolve_uncached(
        &self,
        address: &str,
        parsed: &FrogansAddress,
    ) -> FrogansResult<SiteDescriptor> {
        let server = self
            .selector
            .select(self.naming_servers.len())
            .and_then(|index| self.naming_servers.get(index))
            .ok_or(FrogansError::NoNamingServers)?;
        debug!(address, server = %server, "Selected naming server");

        if self.cache.contains_network(parsed.network()) {
            debug!(network = parsed.network(), "Network cache hit");
        } else {
            self.validate_network(server, parsed).await?;
        }

        self.lookup_site(server, address, parsed).await
    }

    async fn validate_network(
        &self,
        server: &ServerDescriptor,
        address: &FrogansAddress,
    ) -> FrogansResult<()> {
        let url = self.network_url(server, address);
        debug!(url = %url, "Validating network");

        let response = self.http.get(&url).await?;
        if !response.is_success() {
            warn!(network = address.network(), status = response.status, "Network not found");
            return Err(FrogansError::NetworkNotFound {
                network: address.network().to_string(),
                url,
                status: response.status,
            });
        }

        self.cache.confirm_network(address.network()).await;
        Ok(())
    }

    async fn lookup_site(
        &self,
        server: &ServerDescriptor,
        address: &str,
        parsed: &FrogansAddress,
    ) -> FrogansResult<SiteDescriptor> {
        let url = self.site_url(server, parsed);
        debug!(url = %url, "Looking up site");

        let response = self.http.get(&url).await?;
        if !response.is_success() {
            warn!(address, status = response.status, "Site not found");
            return Err(FrogansError::SiteNotFound {
                address: address.to_string(),
                url,
                status: response.status,
            });
        }

        let body = response.text().ok_or_else(|| FormatError::Xml {
            reason: "site document is not valid UTF-8".to_string(),
        })?;
        Ok(parse_site(body)?)
    }
}

impl<C> std::fmt::Debug for Resolver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("naming_servers", &self.naming_servers)
            .field("cache", &self.cache)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::TransportStack;
    use crate::selection::RoundRobinSelector;
    use crate::transport::MockHttpClient;
    use std::time::Duration;

    // encode("ACME") and encode("shop")
    const ACME: &str = "001t001v0025001x";
    const SHOP: &str = "0037002w00330034";

    const SITE_DOCUMENT: &str = r#"<fnsl>
  <home-slide><file-selector>main.fsdl</file-selector></home-slide>
  <fsdl-version>1.0</fsdl-version>
  <frogans-site-servers><content-server>
    <ucsr-path network="IP-DNS-TCP-TLS-HTTP">
      <param name="domain-name">shop.example.org</param>
      <param name="port">443</param>
      <param name="directory">/frogans</param>
    </ucsr-path>
  </content-server></frogans-site-servers>
</fnsl>"#;

    fn naming_server(host: &str) -> ServerDescriptor {
        ServerDescriptor::new(TransportStack::Http, host, 80, "/fns")
    }

    fn network_url(host: &str, code: &str) -> String {
        format!("http://{}:80/fns/architecture-1/fnsl5.0/network-{}.fnsl", host, code)
    }

    fn site_url(host: &str, network: &str, site: &str) -> String {
        format!(
            "http://{}:80/fns/architecture-1/fnsl5.0/network-{}.site-{}.fnsl",
            host, network, site
        )
    }

    fn expected_site() -> SiteDescriptor {
        SiteDescriptor {
            home_index: "main.fsdl".to_string(),
            format_version: "1.0".to_string(),
            servers: vec![ServerDescriptor {
                scheme: "https".to_string(),
                host: "shop.example.org".to_string(),
                port: 443,
                directory: "/frogans".to_string(),
            }],
        }
    }

    fn acme_mock() -> MockHttpClient {
        MockHttpClient::new()
            .with_response(&network_url("fns", ACME), 200, "")
            .with_response(&site_url("fns", ACME, SHOP), 200, SITE_DOCUMENT)
    }

    fn resolver(mock: MockHttpClient) -> (Arc<MockHttpClient>, Resolver<MockHttpClient>) {
        let http = Arc::new(mock);
        let resolver = Resolver::new(Arc::clone(&http), vec![naming_server("fns")], &ClientConfig::default());
        (http, resolver)
    }

    #[test]
    fn test_lookup_urls() {
        let (_, resolver) = resolver(MockHttpClient::new());
        let server = naming_server("fns");
        let address = FrogansAddress::parse("ACME*shop").unwrap();

        assert_eq!(resolver.network_url(&server, &address), network_url("fns", ACME));
        assert_eq!(resolver.site_url(&server, &address), site_url("fns", ACME, SHOP));
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let (http, resolver) = resolver(acme_mock());

        let site = resolver.resolve("ACME*shop").await.unwrap();
        assert_eq!(site, expected_site());
        assert_eq!(
            http.requests(),
            vec![network_url("fns", ACME), site_url("fns", ACME, SHOP)]
        );
        assert!(resolver.cache().contains_network("ACME"));
        assert!(resolver.cache().contains_site("ACME*shop"));
    }

    #[tokio::test]
    async fn test_second_resolve_is_served_from_cache() {
        let (http, resolver) = resolver(acme_mock());

        let first = resolver.resolve("ACME*shop").await.unwrap();
        let requests_after_first = http.requests().len();
        http.clear_routes();

        let second = resolver.resolve("ACME*shop").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(http.requests().len(), requests_after_first);
    }

    #[tokio::test]
    async fn test_confirmed_network_skips_validation() {
        let (http, resolver) = resolver(acme_mock());
        // encode("blog")
        let blog = "002q00300033002v";
        http.set_response(&site_url("fns", ACME, blog), 200, SITE_DOCUMENT);

        resolver.resolve("ACME*shop").await.unwrap();
        resolver.resolve("ACME*blog").await.unwrap();

        assert_eq!(http.request_count(&network_url("fns", ACME)), 1);
        assert_eq!(http.request_count(&site_url("fns", ACME, blog)), 1);
    }

    #[tokio::test]
    async fn test_network_not_found() {
        let (http, resolver) = resolver(MockHttpClient::new());

        let result = resolver.resolve("ACME*shop").await;
        assert_eq!(
            result,
            Err(FrogansError::NetworkNotFound {
                network: "ACME".to_string(),
                url: network_url("fns", ACME),
                status: 404,
            })
        );
        assert!(!resolver.cache().contains_network("ACME"));
        assert!(!resolver.cache().contains_site("ACME*shop"));
        // The site lookup is never attempted.
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_site_not_found() {
        let mock = MockHttpClient::new().with_response(&network_url("fns", ACME), 200, "");
        let (_, resolver) = resolver(mock);

        let result = resolver.resolve("ACME*shop").await;
        assert_eq!(
            result,
            Err(FrogansError::SiteNotFound {
                address: "ACME*shop".to_string(),
                url: site_url("fns", ACME, SHOP),
                status: 404,
            })
        );
        // The network was confirmed before the site lookup failed.
        assert!(resolver.cache().contains_network("ACME"));
        assert!(!resolver.cache().contains_site("ACME*shop"));
    }

    #[tokio::test]
    async fn test_failed_resolution_is_retried_next_call() {
        let mock = MockHttpClient::new().with_response(&network_url("fns", ACME), 200, "");
        let (http, resolver) = resolver(mock);

        assert!(resolver.resolve("ACME*shop").await.is_err());
        http.set_response(&site_url("fns", ACME, SHOP), 200, SITE_DOCUMENT);
        assert_eq!(resolver.resolve("ACME*shop").await.unwrap(), expected_site());
    }

    #[tokio::test]
    async fn test_malformed_address() {
        let (http, resolver) = resolver(acme_mock());

        for address in ["ACME", "ACME*shop*x"] {
            let result = resolver.resolve(address).await;
            assert!(matches!(
                result,
                Err(FrogansError::Format(FormatError::MalformedAddress { .. }))
            ));
        }
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_site_document_missing_fields() {
        let mock = MockHttpClient::new()
            .with_response(&network_url("fns", ACME), 200, "")
            .with_response(&site_url("fns", ACME, SHOP), 200, "<fnsl/>");
        let (_, resolver) = resolver(mock);

        let result = resolver.resolve("ACME*shop").await;
        assert!(matches!(
            result,
            Err(FrogansError::Format(FormatError::MissingField { .. }))
        ));
        assert!(!resolver.cache().contains_site("ACME*shop"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mock = MockHttpClient::new();
        mock.set_transport_error(&network_url("fns", ACME), "connection reset");
        let (_, resolver) = resolver(mock);

        let result = resolver.resolve("ACME*shop").await;
        assert!(matches!(result, Err(FrogansError::Transport { .. })));
    }

    #[derive(Debug)]
    struct OutOfRangeSelector;

    impl ServerSelector for OutOfRangeSelector {
        fn select(&self, candidates: usize) -> Option<usize> {
            Some(candidates)
        }
    }

    #[tokio::test]
    async fn test_out_of_range_server_pick() {
        let (http, resolver) = resolver(acme_mock());
        let resolver = resolver.with_selector(Arc::new(OutOfRangeSelector));

        let result = resolver.resolve("ACME*shop").await;
        assert_eq!(result, Err(FrogansError::NoNamingServers));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_naming_servers() {
        let http = Arc::new(MockHttpClient::new());
        let resolver = Resolver::new(http, Vec::new(), &ClientConfig::default());

        let result = resolver.resolve("ACME*shop").await;
        assert_eq!(result, Err(FrogansError::NoNamingServers));
    }

    #[tokio::test]
    async fn test_server_selection_is_per_call() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_response(&network_url("fns-a", ACME), 200, "")
                .with_response(&site_url("fns-b", ACME, "0001"), 200, SITE_DOCUMENT)
                .with_response(&site_url("fns-a", ACME, SHOP), 200, SITE_DOCUMENT),
        );
        let resolver = Resolver::new(
            Arc::clone(&http),
            vec![naming_server("fns-a"), naming_server("fns-b")],
            &ClientConfig::default(),
        )
        .with_selector(Arc::new(RoundRobinSelector::new()));

        resolver.resolve("ACME*shop").await.unwrap();
        // encode("\u{1}") == "0001"; the next call lands on the second server.
        resolver.resolve("ACME*\u{1}").await.unwrap();

        assert_eq!(http.request_count(&site_url("fns-a", ACME, SHOP)), 1);
        assert_eq!(http.request_count(&site_url("fns-b", ACME, "0001")), 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_requests() {
        let http = Arc::new(acme_mock().with_delay(Duration::from_millis(20)));
        let resolver = Arc::new(Resolver::new(
            Arc::clone(&http),
            vec![naming_server("fns")],
            &ClientConfig::default(),
        ));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                tokio::spawn(async move { resolver.resolve("ACME*shop").await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), expected_site());
        }

        assert_eq!(http.request_count(&network_url("fns", ACME)), 1);
        assert_eq!(http.request_count(&site_url("fns", ACME, SHOP)), 1);
    }
}
