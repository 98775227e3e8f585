//! Directory documents served by seed hosts and naming servers.
//!
//! Both documents describe servers the same way: a `ucsr-path` element whose
//! `network` attribute names the transport stack, and descendants carrying a
//! `name` attribute of `domain-name`, `port` or `directory`:
//!
//! ```xml
//! <content-server>
//!   <ucsr-path network="IP-DNS-TCP-TLS-HTTP">
//!     <param name="domain-name">shop.example.org</param>
//!     <param name="port">443</param>
//!     <param name="directory">/frogans</param>
//!   </ucsr-path>
//! </content-server>
//! ```
//!
//! The bootstrap document lists naming servers under `fnsl-servers`; a site
//! document lists content servers under `frogans-site-servers` together with
//! the home slide and FSDL version.

use std::fmt;

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::error::{FormatError, FormatResult};

const BOOTSTRAP_SERVERS_PATH: &[&str] = &["fnsl-servers", "content-server", "ucsr-path"];
const SITE_SERVERS_PATH: &[&str] = &["frogans-site-servers", "content-server", "ucsr-path"];
const HOME_INDEX_PATH: &[&str] = &["home-slide", "file-selector"];
const FORMAT_VERSION_PATH: &[&str] = &["fsdl-version"];

/// Transport stacks a server can be reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportStack {
    /// Plain HTTP over TCP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl TransportStack {
    /// All known stacks.
    pub const ALL: &'static [TransportStack] = &[TransportStack::Http, TransportStack::Https];

    /// Looks up a stack by its directory token.
    pub fn from_token(token: &str) -> FormatResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|stack| stack.token() == token)
            .ok_or_else(|| FormatError::UnknownTransport {
                token: token.to_string(),
            })
    }

    /// Token used in directory documents.
    pub fn token(self) -> &'static str {
        match self {
            Self::Http => "IP-DNS-TCP-HTTP",
            Self::Https => "IP-DNS-TCP-TLS-HTTP",
        }
    }

    /// URL scheme for this stack.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Base location of a naming or content server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerDescriptor {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub directory: String,
}

impl ServerDescriptor {
    pub fn new(
        stack: TransportStack,
        host: impl Into<String>,
        port: u16,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            scheme: stack.scheme().to_string(),
            host: host.into(),
            port,
            directory: directory.into(),
        }
    }

    /// `{scheme}://{host}:{port}{directory}`
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme, self.host, self.port, self.directory
        )
    }
}

impl fmt::Display for ServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Resolved record of one Frogans site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    /// Resource name of the site's home slide.
    pub home_index: String,
    /// FSDL format version marker.
    pub format_version: String,
    /// Candidate content servers, in document order.
    pub servers: Vec<ServerDescriptor>,
}

/// Parses the bootstrap document into its naming-server list.
pub fn parse_naming_servers(xml: &str) -> FormatResult<Vec<ServerDescriptor>> {
    let doc = parse_document(xml)?;
    select_all(doc.root(), BOOTSTRAP_SERVERS_PATH)
        .into_iter()
        .map(|node| parse_server(node, "bootstrap document"))
        .collect()
}

/// Parses a site lookup document.
pub fn parse_site(xml: &str) -> FormatResult<SiteDescriptor> {
    const DOCUMENT: &str = "site document";

    let doc = parse_document(xml)?;
    let root = doc.root();

    let home_index = select_text(root, HOME_INDEX_PATH).ok_or(FormatError::MissingField {
        field: "home-slide file-selector",
        document: DOCUMENT,
    })?;
    let format_version =
        select_text(root, FORMAT_VERSION_PATH).ok_or(FormatError::MissingField {
            field: "fsdl-version",
            document: DOCUMENT,
        })?;
    let servers = select_all(root, SITE_SERVERS_PATH)
        .into_iter()
        .map(|node| parse_server(node, DOCUMENT))
        .collect::<FormatResult<Vec<_>>>()?;

    Ok(SiteDescriptor {
        home_index,
        format_version,
        servers,
    })
}

fn parse_document(xml: &str) -> FormatResult<Document<'_>> {
    Document::parse(xml).map_err(|e| FormatError::Xml {
        reason: e.to_string(),
    })
}

fn parse_server(node: Node<'_, '_>, document: &'static str) -> FormatResult<ServerDescriptor> {
    let token = node.attribute("network").ok_or(FormatError::MissingField {
        field: "network",
        document,
    })?;
    let stack = TransportStack::from_token(token)?;

    let param = |field: &'static str| {
        named_text(node, field).ok_or(FormatError::MissingField { field, document })
    };

    let host = param("domain-name")?;
    if host.is_empty() {
        return Err(FormatError::MissingField {
            field: "domain-name",
            document,
        });
    }
    let port_text = param("port")?;
    let port = port_text
        .parse::<u16>()
        .map_err(|_| FormatError::InvalidPort { value: port_text })?;
    let directory = param("directory")?;

    Ok(ServerDescriptor::new(stack, host, port, directory))
}

/// Collects elements matching a descendant selector such as `a b c`.
fn select_all<'a, 'input>(root: Node<'a, 'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
    let mut current = vec![root];
    for name in path {
        let mut next: Vec<Node<'a, 'input>> = Vec::new();
        for node in &current {
            for found in node
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == *name && n != node)
            {
                if !next.contains(&found) {
                    next.push(found);
                }
            }
        }
        current = next;
    }
    current.sort_by_key(|n| n.range().start);
    current
}

fn select_text(root: Node<'_, '_>, path: &[&str]) -> Option<String> {
    select_all(root, path)
        .first()
        .map(|n| element_text(*n))
        .filter(|text| !text.is_empty())
}

/// Text of the first descendant carrying `name="{name}"`, possibly empty.
fn named_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.is_element() && n.attribute("name") == Some(name))
        .map(element_text)
}

fn element_text(node: Node<'_, '_>) -> String {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    text.trim().to_string()
}
