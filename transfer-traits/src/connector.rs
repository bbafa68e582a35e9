//! Storage Connector Contract
//!
//! The uniform listing/download interface the transfer service programs
//! against, regardless of which storage backend is configured. Each backend
//! crate implements [`StorageConnector`] and maps its own wire shapes onto
//! the canonical [`Listing`] model defined here.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, Result};

/// Where in the remote account a call is navigating.
///
/// Built once per call and never mutated. `drive_id == None` addresses the
/// account root (the list of drives); a backend may reserve a sentinel
/// `drive_id` for synthetic folders of its own (see the OneDrive provider's
/// sites pseudo-folder). Otherwise `drive_id` plus `directory_id` address a
/// concrete folder inside a concrete drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationContext {
    /// Folder to list, as previously handed out in a [`ListingItem::request_path`].
    /// `None` or `"root"` means the drive's root folder.
    pub directory_id: Option<String>,

    /// Drive the folder lives in. `None` means the account root.
    pub drive_id: Option<String>,

    /// Opaque continuation token from a previous [`Listing::next_page_cursor`].
    /// Threaded back to the backend verbatim, never inspected.
    pub cursor: Option<String>,

    /// Bearer token for the backend API. Acquisition and refresh happen
    /// upstream; this layer only forwards it.
    pub token: String,
}

impl NavigationContext {
    /// Context addressing the account root (the list of drives).
    pub fn root(token: impl Into<String>) -> Self {
        Self {
            directory_id: None,
            drive_id: None,
            cursor: None,
            token: token.into(),
        }
    }

    /// Context addressing a folder inside a concrete drive.
    pub fn drive(
        token: impl Into<String>,
        drive_id: impl Into<String>,
        directory_id: impl Into<String>,
    ) -> Self {
        Self {
            directory_id: Some(directory_id.into()),
            drive_id: Some(drive_id.into()),
            cursor: None,
            token: token.into(),
        }
    }

    /// Resume a paginated listing with a cursor from a previous response.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

/// One entry of a canonical directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingItem {
    /// Stable backend id of the item.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Whether navigating into the item makes sense.
    pub is_folder: bool,

    /// Icon class for the frontend ("folder", "file-image", ...).
    pub icon: String,

    /// MIME type; folders use `httpd/unix-directory`.
    pub mime_type: String,

    /// Backend-provided preview URL, if the backend rendered one.
    pub thumbnail_url: Option<String>,

    /// What a future navigation call must echo back to re-enter this node.
    /// Opaque to the caller and owned by the connector that produced it.
    pub request_path: String,

    /// Last modification time, Unix seconds.
    pub modified_at: Option<i64>,

    /// Byte size; absent for folders and drives where the backend omits it.
    pub size: Option<u64>,
}

/// Aggregate result of one listing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Display identity of the account the listing came from.
    pub username: String,

    /// The items, one per remote record plus any synthetic entries.
    pub items: Vec<ListingItem>,

    /// Continuation token for the next page, `None` at the end of the listing.
    pub next_page_cursor: Option<String>,
}

/// Outcome of a logout attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutStatus {
    /// Whether the token was actually revoked server-side.
    pub revoked: bool,

    /// Where a human can revoke access manually when the backend has no
    /// programmatic revocation endpoint.
    pub manual_revoke_url: Option<String>,
}

/// Lazy, finite, non-restartable sequence of downloaded byte chunks.
pub type DownloadStream = BoxStream<'static, Result<Bytes>>;

/// Uniform listing/download contract implemented by every storage backend.
///
/// All methods classify errors into [`ConnectorError`] at the request
/// boundary; no method retries or recovers silently.
#[async_trait]
pub trait StorageConnector: Send + Sync {
    /// Human-readable backend name, used in logs and error fallbacks.
    fn provider(&self) -> &'static str;

    /// Produce one canonical directory listing for the given context.
    async fn listing(&self, context: &NavigationContext) -> Result<Listing>;

    /// Reported byte size of a single item.
    async fn size(&self, item_id: &str, context: &NavigationContext) -> Result<u64>;

    /// Open a streaming download of a single item's content.
    ///
    /// A non-2xx initial response yields a single classified error instead
    /// of a stream; mid-stream failures are surfaced as an error item.
    async fn download(&self, item_id: &str, context: &NavigationContext)
        -> Result<DownloadStream>;

    /// Revoke the current credentials, or report how a human can.
    async fn logout(&self) -> Result<LogoutStatus>;

    /// Fetch a rendered thumbnail for an item.
    ///
    /// Backends that only hand out thumbnail URLs (see
    /// [`ListingItem::thumbnail_url`]) return [`ConnectorError::Unsupported`].
    async fn thumbnail(&self, item_id: &str, context: &NavigationContext) -> Result<Bytes> {
        let _ = (item_id, context);
        Err(ConnectorError::Unsupported("thumbnail"))
    }
}
