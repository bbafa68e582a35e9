//! # OneDrive Provider
//!
//! Implements the [`StorageConnector`](transfer_traits::StorageConnector)
//! contract for Microsoft Graph (OneDrive and SharePoint).
//!
//! ## Overview
//!
//! This crate provides:
//! - Canonical directory listings for the account's drives, a drive's
//!   folders, and SharePoint sites behind a synthetic pseudo-folder
//! - Concurrent fan-out across a site's drives with a merged, stably
//!   ordered result
//! - Opaque pagination-cursor threading (`$skiptoken`)
//! - Streaming downloads and byte-size lookups
//! - A single error classifier shared by every request boundary
//!
//! Token acquisition and refresh happen upstream; every call carries an
//! opaque bearer token in its
//! [`NavigationContext`](transfer_traits::NavigationContext).
//!
//! ## Example
//!
//! ```ignore
//! use provider_onedrive::OneDriveConnector;
//! use transfer_traits::{NavigationContext, StorageConnector};
//!
//! let connector = OneDriveConnector::new(http_client);
//! let listing = connector.listing(&NavigationContext::root(token)).await?;
//! ```

mod classify;
mod client;
mod config;
mod connector;
mod normalize;
pub mod types;

pub use config::{OneDriveConfig, DEFAULT_API_BASE, MANUAL_REVOKE_URL};
pub use connector::OneDriveConnector;
pub use normalize::SITES_SENTINEL;
