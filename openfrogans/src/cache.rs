//! Per-resolver caches of confirmed networks and resolved sites.
//!
//! Both caches are `moka::future::Cache` instances owned by one resolver, so
//! independent clients never share state. Entries never expire unless a
//! time-to-live is configured.
//!
//! Site resolution goes through [`ResolverCache::get_or_resolve`], which
//! coalesces concurrent callers for the same address: one resolution runs and
//! every waiting caller receives its outcome. Only successful resolutions are
//! stored.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::directory::SiteDescriptor;
use crate::error::{FrogansError, FrogansResult};

/// NetworkCache and SiteCache of one resolver.
#[derive(Clone)]
pub struct ResolverCache {
    /// Network identifiers confirmed by a successful validation response.
    networks: Cache<String, ()>,
    /// Site descriptors keyed by the raw address string.
    sites: Cache<String, Arc<SiteDescriptor>>,
}

impl ResolverCache {
    /// Create empty caches whose entries live as long as the cache.
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    /// Create empty caches, expiring entries after `ttl` when set.
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            networks: build_cache(ttl),
            sites: build_cache(ttl),
        }
    }

    /// Cached descriptor for `address`, if any.
    pub async fn site(&self, address: &str) -> Option<SiteDescriptor> {
        self.sites.get(address).await.map(|site| (*site).clone())
    }

    /// Returns true if `address` has a cached descriptor.
    pub fn contains_site(&self, address: &str) -> bool {
        self.sites.contains_key(address)
    }

    /// Returns true if `network` has been confirmed.
    pub fn contains_network(&self, network: &str) -> bool {
        self.networks.contains_key(network)
    }

    /// Record `network` as confirmed. Confirming twice is a no-op.
    pub async fn confirm_network(&self, network: &str) {
        self.networks.entry_by_ref(network).or_insert(()).await;
    }

    /// Return the cached descriptor for `address`, or run `resolve` to produce it.
    ///
    /// Concurrent calls for the same address share a single `resolve` run. A
    /// failed run is reported to every waiting caller and nothing is stored.
    pub async fn get_or_resolve<F>(&self, address: &str, resolve: F) -> FrogansResult<SiteDescriptor>
    where
        F: Future<Output = FrogansResult<SiteDescriptor>>,
    {
        self.sites
            .try_get_with_by_ref(address, async move { resolve.await.map(Arc::new) })
            .await
            .map(|site| (*site).clone())
            .map_err(unshare)
    }

    /// Drop the descriptor cached for `address`.
    pub async fn evict_site(&self, address: &str) {
        self.sites.invalidate(address).await;
    }

    /// Drop the confirmation of `network`.
    pub async fn evict_network(&self, network: &str) {
        self.networks.invalidate(network).await;
    }

    /// Drop every cached network and site.
    pub async fn clear(&self) {
        self.networks.invalidate_all();
        self.sites.invalidate_all();
        self.networks.run_pending_tasks().await;
        self.sites.run_pending_tasks().await;
    }

    /// Number of cached sites.
    pub async fn site_count(&self) -> u64 {
        self.sites.run_pending_tasks().await;
        self.sites.entry_count()
    }

    /// Number of confirmed networks.
    pub async fn network_count(&self) -> u64 {
        self.networks.run_pending_tasks().await;
        self.networks.entry_count()
    }
}

impl Default for ResolverCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResolverCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverCache")
            .field("networks", &self.networks.entry_count())
            .field("sites", &self.sites.entry_count())
            .finish()
    }
}

fn build_cache<V>(ttl: Option<Duration>) -> Cache<String, V>
where
    V: Clone + Send + Sync + 'static,
{
    let builder = Cache::builder();
    match ttl {
        Some(ttl) => builder.time_to_live(ttl).build(),
        None => builder.build(),
    }
}

/// Recover an owned error from one shared among coalesced callers.
fn unshare(err: Arc<FrogansError>) -> FrogansError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| (*shared).clone())
}
