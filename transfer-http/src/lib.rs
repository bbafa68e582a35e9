//! # Transfer HTTP Adapter
//!
//! Reqwest-backed implementation of the
//! [`HttpClient`](transfer_traits::http::HttpClient) outbound contract.
//!
//! Provides connection pooling, TLS and timeouts. It deliberately does not
//! retry and does not interpret status codes: every response with a status
//! line is `Ok`, and resilience stays with the caller.

mod client;

pub use client::ReqwestHttpClient;
