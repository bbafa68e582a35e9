//! Microsoft Graph API response types
//!
//! Data structures for deserializing the Graph responses this connector
//! touches. Only the fields the connector reads are declared; everything
//! else in the wire payload is ignored.

use serde::Deserialize;

/// Generic Graph collection page.
///
/// Both response shapes the connector lists from (drive items and sites)
/// carry their records under `value` and their continuation link under
/// `@odata.nextLink`, so one extraction step covers both.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    /// Records of this page
    pub value: Vec<T>,

    /// Link to the next page, absent on the last page
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Folder facet: present iff the item is a folder
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: Option<u64>,
}

/// File facet: present iff the item is a file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    pub mime_type: Option<String>,
}

/// Pointer back to the drive an item lives in
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    pub drive_id: Option<String>,
}

/// One rendered preview size
#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Set of previews Graph rendered for an item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThumbnailSet {
    pub small: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub large: Option<Thumbnail>,
}

impl ThumbnailSet {
    /// Best preview URL, preferring the medium rendition.
    pub fn preferred_url(&self) -> Option<String> {
        self.medium
            .as_ref()
            .or(self.large.as_ref())
            .or(self.small.as_ref())
            .map(|t| t.url.clone())
    }
}

/// A drive item or a drive, as returned by `/me/drives`, `.../children` and
/// `sites/{id}/drives`.
///
/// Drives carry neither facet; drive items carry exactly one. See
/// [`DriveItem::is_folder`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,

    pub name: Option<String>,

    /// Byte size; Graph omits it for folders and drives
    pub size: Option<u64>,

    pub folder: Option<FolderFacet>,

    pub file: Option<FileFacet>,

    pub last_modified_date_time: Option<String>,

    pub parent_reference: Option<ParentReference>,

    #[serde(default)]
    pub thumbnails: Vec<ThumbnailSet>,
}

impl DriveItem {
    /// Folder marker. Items without a file facet (folders, drives, packages)
    /// are navigable.
    pub fn is_folder(&self) -> bool {
        self.folder.is_some() || self.file.is_none()
    }
}

/// A SharePoint site from the `sites?search=` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,

    pub display_name: Option<String>,

    /// Hostname-qualified short name, fallback when `displayName` is absent
    pub name: Option<String>,
}

impl Site {
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// `/me` identity response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub mail: Option<String>,

    pub user_principal_name: Option<String>,
}

impl Profile {
    /// Display identity: mail when present, otherwise the principal name.
    pub fn username(&self) -> String {
        self.mail
            .clone()
            .or_else(|| self.user_principal_name.clone())
            .unwrap_or_default()
    }
}

/// Structured Graph error body (`{"error":{"code":...,"message":...}}`)
#[derive(Debug, Deserialize)]
pub struct GraphErrorBody {
    pub error: GraphErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct GraphErrorDetail {
    #[allow(dead_code)]
    pub code: Option<String>,
    pub message: Option<String>,
}
