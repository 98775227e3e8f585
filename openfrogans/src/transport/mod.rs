//! HTTP transport abstraction.
//!
//! Resolution and retrieval only need a single `GET` returning status and body.
//! [`AsyncHttpClient`] is that seam; [`ReqwestClient`] is the production
//! implementation and tests substitute a mock.

mod http;

pub use http::{AsyncHttpClient, HttpResponse, ReqwestClient};

#[cfg(test)]
pub use http::tests::MockHttpClient;
