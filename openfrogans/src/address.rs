//! Frogans address parsing.
//!
//! A Frogans address names a site inside a network: `network*site`. Both parts are
//! arbitrary text and are only ever placed in URLs through [`crate::codec::encode`].

use std::fmt;
use std::str::FromStr;

use crate::codec::encode;
use crate::error::FormatError;

/// Reserved delimiter between the network and site identifiers.
pub const ADDRESS_DELIMITER: char = '*';

/// A parsed `network*site` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrogansAddress {
    network: String,
    site: String,
}

impl FrogansAddress {
    /// Creates an address from its two identifiers.
    pub fn new(network: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            site: site.into(),
        }
    }

    /// Parses `network*site`.
    ///
    /// Exactly one delimiter is required. Empty identifiers are accepted.
    pub fn parse(address: &str) -> Result<Self, FormatError> {
        let malformed = || FormatError::MalformedAddress {
            address: address.to_string(),
        };

        let (network, site) = address.split_once(ADDRESS_DELIMITER).ok_or_else(malformed)?;
        if site.contains(ADDRESS_DELIMITER) {
            return Err(malformed());
        }

        Ok(Self::new(network, site))
    }

    /// Network identifier.
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Site identifier.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Path segment identifying the network: `network-{code}`.
    pub fn network_segment(&self) -> String {
        format!("network-{}", encode(&self.network))
    }

    /// Path segment identifying the site: `network-{code}.site-{code}`.
    pub fn site_segment(&self) -> String {
        format!("{}.site-{}", self.network_segment(), encode(&self.site))
    }
}

impl FromStr for FrogansAddress {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FrogansAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.network, ADDRESS_DELIMITER, self.site)
    }
}
