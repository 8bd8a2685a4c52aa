use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Lifecycle of a document request. Only the backend moves a request out of
/// `Pending`; `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `GET /get-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub id: i64,
    pub email: String,
    pub document: String,
    pub status: RequestStatus,
}

/// Payload of the request form, forwarded as JSON to `POST /request-document`.
///
/// The rules are the ones the browser already enforces on the form inputs
/// (`required`, `type="email"`), applied again for posts that skip the form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewDocumentRequest {
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email must be a valid address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "document name is required"))]
    pub document_name: String,
}

/// `{message}` / `{error}` body returned by the create and action endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ReplyBody {
    /// Pick the text fields out of any JSON reply. Non-object bodies and
    /// non-string fields simply leave them unset.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };

        Self {
            message: field("message"),
            error: field("error"),
        }
    }

    /// The `error` text, when the backend sent a non-empty one.
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub status: reqwest::StatusCode,
    pub body: ReplyBody,
}

impl BackendReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Text to show the admin: the message, falling back to the error.
    /// Empty strings count as missing.
    pub fn display_text(&self) -> String {
        self.body
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.body.error_text())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Backend responded with status {}", self.status.as_u16()))
    }
}

/// Admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Approve,
    Reject,
}

impl RequestAction {
    /// Backend path for this action on request `id`.
    pub fn path(&self, id: i64) -> String {
        match self {
            RequestAction::Approve => format!("/approve-request/{}", id),
            RequestAction::Reject => format!("/reject-request/{}", id),
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
        }
    }

    /// Alert shown when the backend call itself fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            RequestAction::Approve => "Error approving request!",
            RequestAction::Reject => "Error rejecting request!",
        }
    }
}
