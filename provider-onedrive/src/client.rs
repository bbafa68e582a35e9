//! Authenticated Graph request wrapper
//!
//! Thin collaborator between the orchestrator and the injected
//! [`HttpClient`]: builds the request URL against the configured API base,
//! attaches the bearer token, and funnels every outcome through the error
//! classifier so all call paths share one error shape.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};
use transfer_traits::error::ConnectorError;
use transfer_traits::http::{HttpClient, HttpRequest, StreamingResponse};

use crate::classify::{classify_status, ensure_success};
use crate::config::OneDriveConfig;
use crate::types::Profile;

pub(crate) struct GraphClient {
    http: Arc<dyn HttpClient>,
    api_base: String,
}

impl GraphClient {
    pub(crate) fn new(http: Arc<dyn HttpClient>, config: &OneDriveConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Join a relative Graph path and query pairs onto the API base.
    ///
    /// Keys are emitted literally (OData keys like `$skiptoken` stay
    /// readable); values are percent-encoded.
    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}", self.api_base, path.trim_start_matches('/'));
        let mut separator = '?';
        for (key, value) in query {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }
        url
    }

    /// Authenticated GET returning a parsed JSON body.
    #[instrument(skip(self, query, token), fields(path = %path))]
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<T, ConnectorError> {
        let request = HttpRequest::get(self.url(path, query))
            .bearer_token(token)
            .header("Accept", "application/json");

        let response = ensure_success(self.http.execute(request).await)?;
        debug!(status = response.status, "Graph request succeeded");

        response
            .json()
            .map_err(|e| ConnectorError::Decode(e.to_string()))
    }

    /// Authenticated streaming GET.
    ///
    /// The initial status is classified before any chunk is handed out; a
    /// non-2xx status yields one classified error instead of a stream. The
    /// body is not buffered, so the Api message falls back to the generic
    /// form.
    #[instrument(skip(self, token), fields(path = %path))]
    pub(crate) async fn stream(
        &self,
        path: &str,
        token: &str,
    ) -> Result<StreamingResponse, ConnectorError> {
        let request = HttpRequest::get(self.url(path, &[])).bearer_token(token);

        let response = self
            .http
            .stream(request)
            .await
            .map_err(ConnectorError::Transport)?;

        if !(200..300).contains(&response.status) {
            return Err(classify_status(response.status));
        }
        Ok(response)
    }

    /// Resolve the account's display identity via `/me`.
    pub(crate) async fn who_am_i(&self, token: &str) -> Result<String, ConnectorError> {
        let profile: Profile = self.get_json("me", &[], token).await?;
        Ok(profile.username())
    }
}
