//! # Transfer Connector Traits
//!
//! Contracts between the transfer service and its storage backends.
//!
//! ## Overview
//!
//! This crate defines two seams:
//!
//! - The **inbound contract**: [`StorageConnector`](connector::StorageConnector),
//!   the uniform listing/download interface the rest of the service calls,
//!   together with the canonical data model ([`Listing`](connector::Listing),
//!   [`ListingItem`](connector::ListingItem),
//!   [`NavigationContext`](connector::NavigationContext)).
//! - The **outbound contract**: [`HttpClient`](http::HttpClient), the
//!   authenticated request primitive connectors consume. Keeping the
//!   transport behind a trait lets every connector be tested against a mock
//!   client and keeps TLS/pooling concerns in one adapter crate.
//!
//! ## Error Handling
//!
//! All connectors report through [`ConnectorError`](error::ConnectorError):
//! `Auth` for rejected credentials, `Api` for any other non-2xx response,
//! `Transport` for failures below the status line, passed through unchanged.
//! Classification happens exactly once per request boundary; nothing in this
//! layer retries.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` so connectors can be shared across async
//! tasks. Connectors hold no per-call mutable state.

pub mod connector;
pub mod error;
pub mod http;

pub use connector::{
    DownloadStream, Listing, ListingItem, LogoutStatus, NavigationContext, StorageConnector,
};
pub use error::{ConnectorError, Result, TransportError};
pub use http::{ByteStream, HttpClient, HttpMethod, HttpRequest, HttpResponse, StreamingResponse};
