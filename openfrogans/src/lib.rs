//! OpenFrogans - client-side resolution of Frogans addresses
//!
//! A Frogans address has the form `network*site`. Resolving it means
//! discovering the naming servers from a seed host, confirming the network
//! with one of them, and fetching the site document that names the site's
//! home slide, its format version, and the content servers hosting it.
//! Resources are then fetched from those content servers.
//!
//! Identifiers travel in URLs in a fixed-width base-36 form produced by
//! [`codec::encode`].
//!
//! # Layers
//!
//! - [`client::FrogansClient`] bootstraps once and exposes resolution and
//!   resource retrieval
//! - [`resolver::Resolver`] validates networks and looks up sites, caching
//!   results per client in [`cache::ResolverCache`]
//! - [`locator::ResourceLocator`] fetches resources from content servers
//! - [`transport::AsyncHttpClient`] is the HTTP seam, implemented by
//!   [`transport::ReqwestClient`]

pub mod address;
pub mod bootstrap;
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod directory;
pub mod error;
pub mod locator;
pub mod logging;
pub mod resolver;
pub mod selection;
pub mod transport;

pub use address::FrogansAddress;
pub use client::FrogansClient;
pub use codec::{decode, encode};
pub use config::ClientConfig;
pub use directory::{ServerDescriptor, SiteDescriptor, TransportStack};
pub use error::{FormatError, FormatResult, FrogansError, FrogansResult};
pub use logging::{init_logging, LoggingConfig};
pub use selection::{SelectionStrategy, ServerSelector};
pub use transport::{AsyncHttpClient, HttpResponse, ReqwestClient};
