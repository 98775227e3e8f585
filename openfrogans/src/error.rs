//! Error types for Frogans resolution and retrieval.

use thiserror::Error;

/// Result type for client operations.
pub type FrogansResult<T> = Result<T, FrogansError>;

/// Result type for parsing and decoding operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Malformed input encountered while parsing addresses, codes or directory documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Address does not contain exactly one `*` delimiter.
    #[error("malformed address {address:?}: expected exactly one '*' delimiter")]
    MalformedAddress { address: String },

    /// Transport token not present in the transport table.
    #[error("unknown transport token {token:?}")]
    UnknownTransport { token: String },

    /// Encoded string length is zero or not a multiple of 4.
    #[error("encoded string has invalid length {length} (must be a positive multiple of 4)")]
    InvalidCodeLength { length: usize },

    /// Encoded chunk contains a character outside `[0-9a-zA-Z]`.
    #[error("invalid encoded chunk {chunk:?}")]
    InvalidCodeChunk { chunk: String },

    /// Encoded chunk decodes to a value that is not a Unicode scalar value.
    #[error("encoded chunk {chunk:?} is not a valid code point ({value})")]
    InvalidCodePoint { chunk: String, value: u32 },

    /// Required element or attribute missing from a directory document.
    #[error("missing required field {field:?} in {document}")]
    MissingField {
        field: &'static str,
        document: &'static str,
    },

    /// Port value is not a valid 16-bit port number.
    #[error("invalid port {value:?}")]
    InvalidPort { value: String },

    /// Directory document is not well-formed XML.
    #[error("malformed document: {reason}")]
    Xml { reason: String },

    /// Resolved site lists no content servers.
    #[error("site {address:?} lists no content servers")]
    NoSiteServers { address: String },
}

/// Errors surfaced by the bootstrap loader, resolver and resource locator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrogansError {
    /// Seed host could not be contacted or its directory could not be parsed.
    #[error("bootstrap via {url} failed: {reason}")]
    BootstrapFailure { url: String, reason: String },

    /// Naming server rejected the network validation request.
    #[error("network {network:?} not found (HTTP {status} from {url})")]
    NetworkNotFound {
        network: String,
        url: String,
        status: u16,
    },

    /// Naming server rejected the site lookup request.
    #[error("site {address:?} not found (HTTP {status} from {url})")]
    SiteNotFound {
        address: String,
        url: String,
        status: u16,
    },

    /// Content server rejected the resource request.
    #[error("resource of {address:?} not found (HTTP {status} from {url})")]
    ResourceNotFound {
        address: String,
        url: String,
        status: u16,
    },

    /// Malformed address, code or document.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Request could not be completed at the transport level.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Client used before `initialize()` completed.
    #[error("client is not initialized")]
    NotInitialized,

    /// Resolver has no naming servers to select from.
    #[error("no naming servers available")]
    NoNamingServers,
}

impl FrogansError {
    /// Returns true for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NetworkNotFound { .. } | Self::SiteNotFound { .. } | Self::ResourceNotFound { .. }
        )
    }
}
