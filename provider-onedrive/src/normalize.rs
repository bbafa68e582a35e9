//! Response normalization
//!
//! Turns one raw Graph collection page into a canonical [`Listing`]. Every
//! projection in here is total and side-effect free: a record that parses
//! always maps to exactly one [`ListingItem`], missing optional fields map
//! to the documented fallbacks, and pagination is surfaced as an opaque
//! cursor without ever being interpreted.

use chrono::DateTime;
use transfer_traits::connector::{Listing, ListingItem};
use url::Url;

use crate::types::{Collection, DriveItem};

/// Reserved `drive_id` addressing the synthetic SharePoint-sites folder.
pub const SITES_SENTINEL: &str = "sites";

const FOLDER_MIME: &str = "httpd/unix-directory";
const DEFAULT_MIME: &str = "application/octet-stream";

/// Name of the continuation parameter, both inside a Graph
/// `@odata.nextLink` and when threading a caller's cursor back out.
pub(crate) const SKIP_TOKEN_PARAM: &str = "$skiptoken";

/// Map one drive-items page to a canonical listing.
///
/// `include_remote_folder` appends the sites pseudo-folder after all real
/// items; it is set only for account-root listings.
pub(crate) fn listing(
    page: Collection<DriveItem>,
    username: &str,
    include_remote_folder: bool,
) -> Listing {
    let next_page_cursor = next_cursor(page.next_link.as_deref());

    let mut items: Vec<ListingItem> = page.value.into_iter().map(to_item).collect();
    if include_remote_folder {
        items.push(remote_drives_folder());
    }

    Listing {
        username: username.to_string(),
        items,
        next_page_cursor,
    }
}

/// Project one raw record into its canonical item.
pub(crate) fn to_item(raw: DriveItem) -> ListingItem {
    let is_folder = raw.is_folder();
    let mime_type = mime_for(&raw, is_folder);
    let icon = icon_for(is_folder, &mime_type);
    let request_path = request_path(&raw);
    let thumbnail_url = raw
        .thumbnails
        .first()
        .and_then(|set| set.preferred_url());
    let modified_at = raw
        .last_modified_date_time
        .as_deref()
        .and_then(parse_timestamp);
    let name = raw.name.unwrap_or_else(|| raw.id.clone());

    ListingItem {
        id: raw.id,
        name,
        is_folder,
        icon,
        mime_type,
        thumbnail_url,
        request_path,
        modified_at,
        size: raw.size,
    }
}

/// The synthetic entry point into SharePoint site enumeration. Generated per
/// request, never persisted, and only present on account-root listings.
pub(crate) fn remote_drives_folder() -> ListingItem {
    ListingItem {
        id: "root".to_string(),
        name: "Shared libraries".to_string(),
        is_folder: true,
        icon: "folder".to_string(),
        mime_type: FOLDER_MIME.to_string(),
        thumbnail_url: None,
        request_path: format!("root?driveId={}", SITES_SENTINEL),
        modified_at: None,
        size: None,
    }
}

/// Extract the continuation token from a `@odata.nextLink`.
///
/// The token is surfaced verbatim; absence of a link (or of the parameter)
/// means end of listing, never an error.
pub(crate) fn next_cursor(next_link: Option<&str>) -> Option<String> {
    let parsed = Url::parse(next_link?).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case(SKIP_TOKEN_PARAM))
        .map(|(_, value)| value.into_owned())
}

/// The string a later call must echo back to re-enter this node. Items
/// inside a drive re-enter by id; drives enter at their own root.
fn request_path(raw: &DriveItem) -> String {
    match raw
        .parent_reference
        .as_ref()
        .and_then(|parent| parent.drive_id.as_deref())
    {
        Some(drive_id) => format!("{}?driveId={}", raw.id, drive_id),
        None => format!("root?driveId={}", raw.id),
    }
}

fn mime_for(raw: &DriveItem, is_folder: bool) -> String {
    if is_folder {
        return FOLDER_MIME.to_string();
    }
    raw.file
        .as_ref()
        .and_then(|file| file.mime_type.clone())
        .unwrap_or_else(|| DEFAULT_MIME.to_string())
}

fn icon_for(is_folder: bool, mime_type: &str) -> String {
    if is_folder {
        return "folder".to_string();
    }
    let class = match mime_type.split('/').next().unwrap_or_default() {
        "image" => "file-image",
        "video" => "file-video",
        "audio" => "file-audio",
        "text" => "file-text",
        _ if mime_type == "application/pdf" => "file-pdf",
        _ => "file",
    };
    class.to_string()
}

/// RFC 3339 timestamp to Unix seconds
fn parse_timestamp(rfc3339: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(rfc3339)
        .ok()
        .map(|dt| dt.timestamp())
}
