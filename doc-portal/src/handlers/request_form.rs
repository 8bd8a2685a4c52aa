use crate::handlers::htmx::is_htmx;
use crate::models::{BackendReply, NewDocumentRequest};
use crate::services::BackendError;
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Form,
};
use portal_core::error::AppError;
use portal_core::observability::extract_request_id;
use validator::Validate;

/// What the requester sees after pressing "Submit Request".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Failed(String),
    Unreachable,
}

impl SubmitOutcome {
    pub fn message(&self) -> String {
        match self {
            SubmitOutcome::Submitted => "Request submitted successfully!".to_string(),
            SubmitOutcome::Failed(error) => format!("Failed: {}", error),
            SubmitOutcome::Unreachable => "Error connecting to backend!".to_string(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SubmitOutcome::Submitted => "message success",
            SubmitOutcome::Failed(_) => "message failure",
            SubmitOutcome::Unreachable => "message warning",
        }
    }
}

impl From<Result<BackendReply, BackendError>> for SubmitOutcome {
    fn from(result: Result<BackendReply, BackendError>) -> Self {
        match result {
            Ok(reply) if reply.is_success() => SubmitOutcome::Submitted,
            Ok(reply) => SubmitOutcome::Failed(
                reply
                    .body
                    .error_text()
                    .unwrap_or("unknown error")
                    .to_string(),
            ),
            // A body that is not JSON is reported like a dropped connection.
            Err(_) => SubmitOutcome::Unreachable,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub outcome: Option<SubmitOutcome>,
}

#[derive(Template)]
#[template(path = "partials/message.html")]
pub struct MessageTemplate {
    pub outcome: Option<SubmitOutcome>,
}

pub async fn index() -> impl IntoResponse {
    IndexTemplate { outcome: None }
}

pub async fn submit_request_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(payload): Form<NewDocumentRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let request_id = extract_request_id(&headers);
    let outcome: SubmitOutcome = state
        .backend
        .submit_request(&payload, request_id.as_deref())
        .await
        .into();

    let outcome = Some(outcome);
    if is_htmx(&headers) {
        Ok(MessageTemplate { outcome }.into_response())
    } else {
        Ok(IndexTemplate { outcome }.into_response())
    }
}
