//! Client facade tying bootstrap, resolution and retrieval together.
//!
//! # Example
//!
//! ```no_run
//! use openfrogans::{ClientConfig, FrogansClient};
//!
//! # async fn run() -> openfrogans::FrogansResult<()> {
//! let client = FrogansClient::from_config(ClientConfig::default())?;
//! client.initialize().await?;
//!
//! let site = client.resolve("ACME*shop").await?;
//! let home = client.fetch_resource("ACME*shop", &site.home_index).await?;
//! println!("{} bytes", home.body.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::address::FrogansAddress;
use crate::bootstrap::BootstrapLoader;
use crate::config::ClientConfig;
use crate::directory::{ServerDescriptor, SiteDescriptor};
use crate::error::{FrogansError, FrogansResult};
use crate::locator::ResourceLocator;
use crate::resolver::Resolver;
use crate::transport::{AsyncHttpClient, HttpResponse, ReqwestClient};

/// Frogans client owning its transport, naming servers and caches.
///
/// The naming-server list is loaded once by [`initialize`](Self::initialize)
/// and never changes afterwards. Caches belong to this instance only.
pub struct FrogansClient<C> {
    http: Arc<C>,
    config: ClientConfig,
    resolver: OnceCell<Resolver<C>>,
    locator: ResourceLocator<C>,
}

impl FrogansClient<ReqwestClient> {
    /// Create a client backed by reqwest, using the configured timeout.
    pub fn from_config(config: ClientConfig) -> FrogansResult<Self> {
        let http = ReqwestClient::from_config(&config)?;
        Ok(Self::new(Arc::new(http), config))
    }
}

impl<C: AsyncHttpClient> FrogansClient<C> {
    /// Create an uninitialized client.
    pub fn new(http: Arc<C>, config: ClientConfig) -> Self {
        let locator = ResourceLocator::new(
            Arc::clone(&http),
            config.selection.build(),
            config.resource_attempts,
        );
        Self {
            http,
            config,
            resolver: OnceCell::new(),
            locator,
        }
    }

    /// Create a client with a known naming-server list, skipping bootstrap.
    pub fn with_naming_servers(
        http: Arc<C>,
        config: ClientConfig,
        naming_servers: Vec<ServerDescriptor>,
    ) -> Self {
        let mut client = Self::new(http, config);
        let resolver = Resolver::new(Arc::clone(&client.http), naming_servers, &client.config);
        client.resolver = OnceCell::new_with(Some(resolver));
        client
    }

    /// Load the naming-server list from a seed host.
    ///
    /// Runs the bootstrap at most once: later calls, and calls racing the
    /// first one, return after it completes. A failed bootstrap leaves the
    /// client uninitialized.
    pub async fn initialize(&self) -> FrogansResult<()> {
        self.resolver
            .get_or_try_init(|| async {
                let servers = BootstrapLoader::from_config(&self.config)
                    .load(self.http.as_ref())
                    .await?;
                Ok::<_, FrogansError>(Resolver::new(
                    Arc::clone(&self.http),
                    servers,
                    &self.config,
                ))
            })
            .await?;
        Ok(())
    }

    /// Returns true once the naming-server list is available.
    pub fn is_initialized(&self) -> bool {
        self.resolver.initialized()
    }

    /// Naming servers loaded by [`initialize`](Self::initialize).
    pub fn naming_servers(&self) -> Option<&[ServerDescriptor]> {
        self.resolver.get().map(Resolver::naming_servers)
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying resolver.
    pub fn resolver(&self) -> FrogansResult<&Resolver<C>> {
        self.resolver.get().ok_or(FrogansError::NotInitialized)
    }

    /// Resolve a `network*site` address. See [`Resolver::resolve`].
    pub async fn resolve(&self, address: &str) -> FrogansResult<SiteDescriptor> {
        self.resolver()?.resolve(address).await
    }

    /// Resolve `address` and fetch `resource_path` from one of its content servers.
    ///
    /// # Errors
    ///
    /// Any error of [`resolve`](Self::resolve), plus those of
    /// [`ResourceLocator::fetch`].
    pub async fn fetch_resource(
        &self,
        address: &str,
        resource_path: &str,
    ) -> FrogansResult<HttpResponse> {
        let site = self.resolve(address).await?;
        let parsed = FrogansAddress::parse(address)?;
        self.locator.fetch(&parsed, &site, resource_path).await
    }
}

impl<C> std::fmt::Debug for FrogansClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrogansClient")
            .field("config", &self.config)
            .field("resolver", &self.resolver.get())
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}
