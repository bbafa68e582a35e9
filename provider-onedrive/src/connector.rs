//! OneDrive listing orchestrator
//!
//! Implements the `StorageConnector` contract against Microsoft Graph.
//! The interesting part is the listing pipeline: the navigation context
//! selects one of three remote shapes (account drives, SharePoint sites,
//! drive children), the raw page is normalized into a canonical listing,
//! and for the sites shape one sub-request per site is fanned out and the
//! results are merged in submission order.

use async_trait::async_trait;
use futures::future;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use transfer_traits::connector::{
    DownloadStream, Listing, ListingItem, LogoutStatus, NavigationContext, StorageConnector,
};
use transfer_traits::error::{ConnectorError, Result};
use transfer_traits::http::HttpClient;

use crate::classify::PROVIDER;
use crate::client::GraphClient;
use crate::config::OneDriveConfig;
use crate::normalize::{self, SITES_SENTINEL, SKIP_TOKEN_PARAM};
use crate::types::{Collection, DriveItem, Site};

/// OneDrive/SharePoint storage connector.
///
/// Holds no per-call state; one instance may serve concurrent calls. The
/// bearer token travels inside each [`NavigationContext`].
pub struct OneDriveConnector {
    client: GraphClient,
    manual_revoke_url: String,
}

impl OneDriveConnector {
    /// Connector against the worldwide Graph endpoint.
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::with_config(http, OneDriveConfig::default())
    }

    pub fn with_config(http: Arc<dyn HttpClient>, config: OneDriveConfig) -> Self {
        Self {
            client: GraphClient::new(http, &config),
            manual_revoke_url: config.manual_revoke_url,
        }
    }

    /// Forward the caller's cursor, if any, as the backend's continuation
    /// parameter. The token is never inspected or decoded.
    fn cursor_query(context: &NavigationContext) -> Vec<(&'static str, String)> {
        context
            .cursor
            .iter()
            .map(|cursor| (SKIP_TOKEN_PARAM, cursor.clone()))
            .collect()
    }

    /// Metadata path for a single item, drive-relative when the context
    /// addresses a concrete drive, account-default otherwise.
    fn item_path(item_id: &str, context: &NavigationContext) -> String {
        match context.drive_id.as_deref() {
            Some(drive_id) if drive_id != SITES_SENTINEL => {
                format!("drives/{}/items/{}", drive_id, item_id)
            }
            _ => format!("me/drive/items/{}", item_id),
        }
    }

    /// Shape 1: the account root, the set of drives plus the sites
    /// pseudo-folder.
    async fn list_drives(&self, context: &NavigationContext) -> Result<Listing> {
        let page: Collection<DriveItem> = self
            .client
            .get_json("me/drives", &Self::cursor_query(context), &context.token)
            .await?;
        let username = self.client.who_am_i(&context.token).await?;

        Ok(normalize::listing(page, &username, true))
    }

    /// Shape 3: children of a folder inside a concrete drive, with inline
    /// thumbnail expansion.
    async fn list_children(&self, context: &NavigationContext, drive_id: &str) -> Result<Listing> {
        let directory = context
            .directory_id
            .as_deref()
            .filter(|dir| !dir.is_empty() && *dir != "root");
        let path = match directory {
            Some(dir) => format!("drives/{}/items/{}/children", drive_id, dir),
            None => format!("drives/{}/root/children", drive_id),
        };

        let mut query = vec![("$expand", "thumbnails".to_string())];
        query.extend(Self::cursor_query(context));

        let page: Collection<DriveItem> = self
            .client
            .get_json(&path, &query, &context.token)
            .await?;
        let username = self.client.who_am_i(&context.token).await?;

        Ok(normalize::listing(page, &username, false))
    }

    /// Shape 2: enumerate SharePoint sites, then fan out one drives request
    /// per site and merge.
    async fn list_sites(&self, context: &NavigationContext) -> Result<Listing> {
        let mut query = vec![("search", String::new())];
        query.extend(Self::cursor_query(context));

        let sites: Collection<Site> = self
            .client
            .get_json("sites", &query, &context.token)
            .await?;
        let username = self.client.who_am_i(&context.token).await?;

        self.aggregate_sites(sites, username, &context.token).await
    }

    /// Fan-out/join across all sites of one enumeration page.
    ///
    /// Sub-requests run concurrently and results land in submission order,
    /// so the merged listing is stable regardless of completion order. The
    /// first failure aborts the whole aggregate; results of the remaining
    /// sub-requests are discarded, never returned as a partial listing.
    async fn aggregate_sites(
        &self,
        sites: Collection<Site>,
        username: String,
        token: &str,
    ) -> Result<Listing> {
        // Pagination of the aggregate is site-enumeration pagination, not
        // drive-content pagination.
        let next_page_cursor = normalize::next_cursor(sites.next_link.as_deref());

        let fetches = sites
            .value
            .iter()
            .map(|site| self.site_drive_items(site, &username, token));
        let per_site = future::try_join_all(fetches).await?;

        let items: Vec<ListingItem> = per_site.into_iter().flatten().collect();
        debug!(sites = sites.value.len(), items = items.len(), "Merged site drives");

        Ok(Listing {
            username,
            items,
            next_page_cursor,
        })
    }

    /// One fan-out leg: the drives of a single site, each item prefixed
    /// with the owning site's display name.
    async fn site_drive_items(
        &self,
        site: &Site,
        username: &str,
        token: &str,
    ) -> Result<Vec<ListingItem>> {
        let page: Collection<DriveItem> = self
            .client
            .get_json(&format!("sites/{}/drives", site.id), &[], token)
            .await?;

        let sub = normalize::listing(page, username, false);
        Ok(sub
            .items
            .into_iter()
            .map(|mut item| {
                item.name = format!("{} - {}", site.label(), item.name);
                item
            })
            .collect())
    }
}

#[async_trait]
impl StorageConnector for OneDriveConnector {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self, context), fields(drive_id = ?context.drive_id, directory_id = ?context.directory_id))]
    async fn listing(&self, context: &NavigationContext) -> Result<Listing> {
        let listing = match context.drive_id.as_deref() {
            None => self.list_drives(context).await?,
            Some(SITES_SENTINEL) => self.list_sites(context).await?,
            Some(drive_id) => self.list_children(context, drive_id).await?,
        };

        info!(
            items = listing.items.len(),
            has_next_page = listing.next_page_cursor.is_some(),
            "Listing produced"
        );
        Ok(listing)
    }

    #[instrument(skip(self, context), fields(item_id = %item_id))]
    async fn size(&self, item_id: &str, context: &NavigationContext) -> Result<u64> {
        let item: DriveItem = self
            .client
            .get_json(&Self::item_path(item_id, context), &[], &context.token)
            .await?;
        Ok(item.size.unwrap_or(0))
    }

    #[instrument(skip(self, context), fields(item_id = %item_id))]
    async fn download(
        &self,
        item_id: &str,
        context: &NavigationContext,
    ) -> Result<DownloadStream> {
        let path = format!("{}/content", Self::item_path(item_id, context));
        let response = self.client.stream(&path, &context.token).await?;

        debug!(status = response.status, "Download stream opened");
        Ok(response
            .chunks
            .map(|chunk| chunk.map_err(ConnectorError::Transport))
            .boxed())
    }

    async fn logout(&self) -> Result<LogoutStatus> {
        // Graph has no token-revocation endpoint; report non-revocation and
        // point at the consent management page.
        Ok(LogoutStatus {
            revoked: false,
            manual_revoke_url: Some(self.manual_revoke_url.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures_util::stream;
    use mockall::mock;
    use std::collections::HashMap;
    use transfer_traits::error::TransportError;
    use transfer_traits::http::{HttpRequest, HttpResponse, StreamingResponse};

    mock! {
        Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
            async fn stream(&self, request: HttpRequest) -> std::result::Result<StreamingResponse, TransportError>;
        }
    }

    fn ok_json(body: &str) -> std::result::Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        })
    }

    fn status_only(status: u16) -> std::result::Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        })
    }

    fn expect_whoami(http: &mut MockHttp) {
        http.expect_execute()
            .withf(|req| req.url.ends_with("/me"))
            .times(1)
            .returning(|_| ok_json(r#"{"mail":"a@b.com"}"#));
    }

    fn connector(http: MockHttp) -> OneDriveConnector {
        OneDriveConnector::new(Arc::new(http))
    }

    #[tokio::test]
    async fn test_account_root_lists_drives_plus_pseudo_folder() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.contains("/me/drives") && !req.url.contains('?'))
            .times(1)
            .returning(|_| {
                ok_json(
                    r#"{
                        "value": [
                            { "id": "d1", "name": "Personal" },
                            { "id": "d2", "name": "Shared" }
                        ]
                    }"#,
                )
            });
        expect_whoami(&mut http);

        let listing = connector(http)
            .listing(&NavigationContext::root("tok"))
            .await
            .unwrap();

        assert_eq!(listing.username, "a@b.com");
        assert_eq!(listing.items.len(), 3);
        assert_eq!(listing.items[0].name, "Personal");
        assert_eq!(listing.items[0].request_path, "root?driveId=d1");
        assert_eq!(listing.items[1].name, "Shared");

        let pseudo = &listing.items[2];
        assert_eq!(pseudo.id, "root");
        assert_eq!(pseudo.request_path, "root?driveId=sites");
        assert!(listing.next_page_cursor.is_none());
    }

    #[tokio::test]
    async fn test_children_request_threads_cursor_and_thumbnail_expansion() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| {
                req.url.contains("/drives/d1/root/children")
                    && req.url.contains("$expand=thumbnails")
                    && req.url.contains("$skiptoken=tok123")
            })
            .times(1)
            .returning(|_| {
                ok_json(
                    r#"{
                        "value": [
                            {
                                "id": "f1",
                                "name": "notes.txt",
                                "size": 10,
                                "file": { "mimeType": "text/plain" },
                                "parentReference": { "driveId": "d1" }
                            }
                        ],
                        "@odata.nextLink": "https://graph.microsoft.com/v1.0/drives/d1/root/children?$skiptoken=s2"
                    }"#,
                )
            });
        expect_whoami(&mut http);

        let context = NavigationContext::drive("tok", "d1", "root").with_cursor("tok123");
        let listing = connector(http).listing(&context).await.unwrap();

        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].size, Some(10));
        // No pseudo-folder outside the account root.
        assert!(listing.items.iter().all(|i| i.id != "root"));
        assert_eq!(listing.next_page_cursor.as_deref(), Some("s2"));
    }

    #[tokio::test]
    async fn test_directory_id_addresses_item_children() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.contains("/drives/d1/items/dirA/children"))
            .times(1)
            .returning(|_| ok_json(r#"{ "value": [] }"#));
        expect_whoami(&mut http);

        let context = NavigationContext::drive("tok", "d1", "dirA");
        let listing = connector(http).listing(&context).await.unwrap();
        assert!(listing.items.is_empty());
    }

    #[tokio::test]
    async fn test_401_yields_auth_error() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .times(1)
            .returning(|_| status_only(401));

        let result = connector(http)
            .listing(&NavigationContext::root("expired"))
            .await;
        assert!(matches!(result, Err(ConnectorError::Auth)));
    }

    #[tokio::test]
    async fn test_identity_failure_fails_the_whole_listing() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.contains("/me/drives"))
            .times(1)
            .returning(|_| ok_json(r#"{ "value": [] }"#));
        http.expect_execute()
            .withf(|req| req.url.ends_with("/me"))
            .times(1)
            .returning(|_| status_only(503));

        let result = connector(http)
            .listing(&NavigationContext::root("tok"))
            .await;
        assert!(matches!(
            result,
            Err(ConnectorError::Api { status_code: 503, .. })
        ));
    }

    const SITES_PAGE: &str = r#"{
        "value": [
            { "id": "siteA", "displayName": "Alpha" },
            { "id": "siteB", "displayName": "Beta" }
        ],
        "@odata.nextLink": "https://graph.microsoft.com/v1.0/sites?$skiptoken=siteTok"
    }"#;

    fn sites_context() -> NavigationContext {
        NavigationContext {
            directory_id: Some("root".to_string()),
            drive_id: Some(SITES_SENTINEL.to_string()),
            cursor: None,
            token: "tok".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fanout_merges_in_submission_order_with_site_prefix() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.contains("/sites?search="))
            .times(1)
            .returning(|_| ok_json(SITES_PAGE));
        expect_whoami(&mut http);
        http.expect_execute()
            .withf(|req| req.url.contains("/sites/siteA/drives"))
            .times(1)
            .returning(|_| ok_json(r#"{ "value": [ { "id": "da", "name": "Docs" } ] }"#));
        http.expect_execute()
            .withf(|req| req.url.contains("/sites/siteB/drives"))
            .times(1)
            .returning(|_| ok_json(r#"{ "value": [ { "id": "db", "name": "Records" } ] }"#));

        let listing = connector(http).listing(&sites_context()).await.unwrap();

        assert_eq!(listing.items.len(), 2);
        assert_eq!(listing.items[0].name, "Alpha - Docs");
        assert_eq!(listing.items[0].request_path, "root?driveId=da");
        assert_eq!(listing.items[1].name, "Beta - Records");
        // Cursor comes from the sites enumeration, not drive contents.
        assert_eq!(listing.next_page_cursor.as_deref(), Some("siteTok"));
    }

    #[tokio::test]
    async fn test_fanout_first_failure_aborts_the_aggregate() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.contains("/sites?search="))
            .times(1)
            .returning(|_| ok_json(SITES_PAGE));
        expect_whoami(&mut http);
        http.expect_execute()
            .withf(|req| req.url.contains("/sites/siteA/drives"))
            .times(1)
            .returning(|_| status_only(500));
        // siteB's sub-request may or may not run before the abort.
        http.expect_execute()
            .withf(|req| req.url.contains("/sites/siteB/drives"))
            .times(0..=1)
            .returning(|_| ok_json(r#"{ "value": [ { "id": "db", "name": "Records" } ] }"#));

        let result = connector(http).listing(&sites_context()).await;
        assert!(matches!(
            result,
            Err(ConnectorError::Api { status_code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_size_uses_drive_relative_path() {
        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| req.url.contains("/drives/d1/items/f9") && !req.url.contains("content"))
            .times(1)
            .returning(|_| ok_json(r#"{ "id": "f9", "name": "big.bin", "size": 4096, "file": {} }"#));

        let context = NavigationContext::drive("tok", "d1", "root");
        let size = connector(http).size("f9", &context).await.unwrap();
        assert_eq!(size, 4096);
    }

    #[tokio::test]
    async fn test_download_forwards_chunks_until_end_of_stream() {
        let mut http = MockHttp::new();
        http.expect_stream()
            .withf(|req| {
                req.url.contains("/me/drive/items/f1/content")
                    && req.headers.get("Authorization") == Some(&"Bearer tok".to_string())
            })
            .times(1)
            .returning(|_| {
                let chunks = stream::iter(vec![
                    Ok(Bytes::from_static(b"hello ")),
                    Ok(Bytes::from_static(b"world")),
                ])
                .boxed();
                Ok(StreamingResponse {
                    status: 200,
                    headers: HashMap::new(),
                    chunks,
                })
            });

        let context = NavigationContext::root("tok");
        let mut download = connector(http).download("f1", &context).await.unwrap();

        let mut collected = Vec::new();
        while let Some(chunk) = download.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"hello world");
    }

    #[tokio::test]
    async fn test_download_non_2xx_initial_status_is_one_classified_error() {
        let mut http = MockHttp::new();
        http.expect_stream().times(1).returning(|_| {
            Ok(StreamingResponse {
                status: 404,
                headers: HashMap::new(),
                chunks: stream::empty().boxed(),
            })
        });

        let context = NavigationContext::root("tok");
        let result = connector(http).download("gone", &context).await;
        match result {
            Err(ConnectorError::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 404);
                assert_eq!(message, "request to OneDrive returned 404");
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected a classified error, got a stream"),
        }
    }

    #[tokio::test]
    async fn test_download_midstream_transport_failure_surfaces_as_error_item() {
        let mut http = MockHttp::new();
        http.expect_stream().times(1).returning(|_| {
            let chunks = stream::iter(vec![
                Ok(Bytes::from_static(b"partial")),
                Err(TransportError::Timeout),
            ])
            .boxed();
            Ok(StreamingResponse {
                status: 200,
                headers: HashMap::new(),
                chunks,
            })
        });

        let context = NavigationContext::root("tok");
        let mut download = connector(http).download("f1", &context).await.unwrap();

        let first = download.next().await.unwrap().unwrap();
        assert_eq!(&first[..], b"partial");

        let second = download.next().await.unwrap();
        assert!(matches!(
            second,
            Err(ConnectorError::Transport(TransportError::Timeout))
        ));
    }

    #[tokio::test]
    async fn test_logout_reports_manual_revocation_only() {
        let status = connector(MockHttp::new()).logout().await.unwrap();
        assert!(!status.revoked);
        assert_eq!(
            status.manual_revoke_url.as_deref(),
            Some("https://account.live.com/consent/Manage")
        );
    }

    #[tokio::test]
    async fn test_thumbnail_is_unsupported() {
        let context = NavigationContext::root("tok");
        let result = connector(MockHttp::new()).thumbnail("f1", &context).await;
        assert!(matches!(result, Err(ConnectorError::Unsupported(_))));
    }
}
