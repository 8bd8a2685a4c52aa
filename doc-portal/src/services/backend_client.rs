//! REST client for the document backend.
//!
//! The backend owns every request record and status transition; this client
//! only relays form submissions and admin decisions and reads the list back.

use crate::config::BackendSettings;
use crate::models::{BackendReply, DocumentRequest, NewDocumentRequest, ReplyBody, RequestAction};
use crate::services::metrics::record_backend_call;
use portal_core::observability::TracedClientExt;
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend responded with status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("invalid backend response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    fn outcome(&self) -> &'static str {
        match self {
            BackendError::Transport(_) => "transport_error",
            BackendError::UnexpectedStatus(_) => "unexpected_status",
            BackendError::Decode(_) => "decode_error",
        }
    }
}

pub struct BackendClient {
    client: Client,
    settings: BackendSettings,
}

impl BackendClient {
    pub fn new(settings: BackendSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build backend HTTP client: {}", e))?;

        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url, path)
    }

    /// `POST /request-document` with `{email, document_name}`.
    ///
    /// Non-2xx replies are returned as-is so the caller can show their
    /// `error` text.
    pub async fn submit_request(
        &self,
        payload: &NewDocumentRequest,
        request_id: Option<&str>,
    ) -> Result<BackendReply, BackendError> {
        let url = self.url("/request-document");

        let result: Result<BackendReply, BackendError> = async {
            let response = self
                .client
                .traced_post(&url)
                .request_id(request_id)
                .json(payload)
                .send()
                .await?;
            read_reply(response).await
        }
        .await;

        record_reply("request-document", &result);
        match &result {
            Ok(reply) => tracing::info!(
                status = reply.status.as_u16(),
                document = %payload.document_name,
                "Document request forwarded"
            ),
            Err(e) => tracing::error!(url = %url, error = %e, "Document request submission failed"),
        }

        result
    }

    /// `GET /get-requests`, in the order the backend returns them.
    pub async fn list_requests(
        &self,
        request_id: Option<&str>,
    ) -> Result<Vec<DocumentRequest>, BackendError> {
        let url = self.url("/get-requests");

        let result: Result<Vec<DocumentRequest>, BackendError> = async {
            let response = self
                .client
                .traced_get(&url)
                .request_id(request_id)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(BackendError::UnexpectedStatus(status));
            }

            let body = response.text().await?;
            Ok(serde_json::from_str::<Vec<DocumentRequest>>(&body)?)
        }
        .await;

        match &result {
            Ok(requests) => {
                record_backend_call("get-requests", "ok");
                tracing::debug!(count = requests.len(), "Fetched document requests");
            }
            Err(e) => {
                record_backend_call("get-requests", e.outcome());
                tracing::error!(url = %url, error = %e, "Failed to fetch document requests");
            }
        }

        result
    }

    /// `POST /approve-request/:id` or `POST /reject-request/:id`.
    pub async fn perform(
        &self,
        action: RequestAction,
        id: i64,
        request_id: Option<&str>,
    ) -> Result<BackendReply, BackendError> {
        let url = self.url(&action.path(id));

        let result: Result<BackendReply, BackendError> = async {
            let response = self
                .client
                .traced_post(&url)
                .request_id(request_id)
                .send()
                .await?;
            read_reply(response).await
        }
        .await;

        let endpoint = match action {
            RequestAction::Approve => "approve-request",
            RequestAction::Reject => "reject-request",
        };
        record_reply(endpoint, &result);
        match &result {
            Ok(reply) => tracing::info!(
                request = id,
                action = action.label(),
                status = reply.status.as_u16(),
                "Admin action answered"
            ),
            Err(e) => tracing::error!(
                request = id,
                action = action.label(),
                error = %e,
                "Admin action failed"
            ),
        }

        result
    }
}

/// Read a `{message}` / `{error}` body, whatever the status. Any JSON body
/// is accepted; only text that is not JSON at all is a decode error.
async fn read_reply(response: Response) -> Result<BackendReply, BackendError> {
    let status = response.status();
    let body = response.text().await?;
    let value: serde_json::Value = serde_json::from_str(&body)?;
    let body = ReplyBody::from_json(&value);

    Ok(BackendReply { status, body })
}

fn record_reply(endpoint: &str, result: &Result<BackendReply, BackendError>) {
    let outcome = match result {
        Ok(reply) if reply.is_success() => "ok",
        Ok(_) => "error_reply",
        Err(e) => e.outcome(),
    };
    record_backend_call(endpoint, outcome);
}
