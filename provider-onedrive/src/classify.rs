//! Error classification
//!
//! Single funnel every request boundary routes through, so the error shape
//! is identical across the orchestrator, the fan-out and the thin wrappers.
//! 401 means the credentials are dead and classification stops there; any
//! other non-2xx becomes an API error carrying the backend's own message
//! when its structured error body parses.

use transfer_traits::error::{ConnectorError, TransportError};
use transfer_traits::http::HttpResponse;

use crate::types::GraphErrorBody;

pub(crate) const PROVIDER: &str = "OneDrive";

/// Map a non-2xx response to its domain error kind.
pub(crate) fn classify_response(response: &HttpResponse) -> ConnectorError {
    if response.status == 401 {
        return ConnectorError::Auth;
    }

    let message = response
        .json::<GraphErrorBody>()
        .ok()
        .and_then(|body| body.error.message)
        .unwrap_or_else(|| format!("request to {} returned {}", PROVIDER, response.status));

    ConnectorError::Api {
        status_code: response.status,
        message,
    }
}

/// Classify the outcome of one buffered request: transport failures pass
/// through unchanged, non-2xx statuses are mapped, 2xx responses come back
/// untouched.
pub(crate) fn ensure_success(
    outcome: Result<HttpResponse, TransportError>,
) -> Result<HttpResponse, ConnectorError> {
    match outcome {
        Ok(response) if response.is_success() => Ok(response),
        Ok(response) => Err(classify_response(&response)),
        Err(transport) => Err(ConnectorError::Transport(transport)),
    }
}

/// Same mapping for a status observed without a buffered body (streaming
/// responses); the fallback message is used since the body is not available
/// for inspection.
pub(crate) fn classify_status(status: u16) -> ConnectorError {
    if status == 401 {
        return ConnectorError::Auth;
    }
    ConnectorError::Api {
        status_code: status,
        message: format!("request to {} returned {}", PROVIDER, status),
    }
}
