use crate::handlers::htmx::{show_message, HX_RESWAP, HX_TRIGGER};
use crate::models::{DocumentRequest, RequestAction};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use portal_core::observability::extract_request_id;

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {}

/// A table row plus whether an action on it is still outstanding.
pub struct RequestRow {
    pub request: DocumentRequest,
    pub processing: bool,
}

#[derive(Template)]
#[template(path = "partials/requests_table.html")]
pub struct RequestsTableTemplate {
    pub rows: Vec<RequestRow>,
}

#[derive(Template)]
#[template(path = "partials/requests_error.html")]
pub struct RequestsErrorTemplate {}

/// Dashboard shell. The table itself is loaded by HTMX right after mount,
/// so the page first shows the loading state.
pub async fn admin_dashboard_handler() -> impl IntoResponse {
    AdminTemplate {}
}

pub async fn requests_fragment(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = extract_request_id(&headers);
    render_requests(&state, request_id.as_deref()).await
}

pub async fn approve_request_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    run_action(&state, RequestAction::Approve, id, &headers).await
}

pub async fn reject_request_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    run_action(&state, RequestAction::Reject, id, &headers).await
}

async fn render_requests(state: &AppState, request_id: Option<&str>) -> Response {
    match state.backend.list_requests(request_id).await {
        Ok(requests) => {
            let rows = requests
                .into_iter()
                .map(|request| RequestRow {
                    processing: state.in_flight.is_in_flight(request.id),
                    request,
                })
                .collect();
            RequestsTableTemplate { rows }.into_response()
        }
        // Already logged by the client; the fragment replaces the table.
        Err(_) => RequestsErrorTemplate {}.into_response(),
    }
}

/// Relay one admin decision, then answer with the refreshed table and the
/// backend's text as an alert.
///
/// The row is marked as processing only until the backend answers, so the
/// refreshed table already shows it enabled with its new status. When the
/// call itself fails the table is left untouched and no refresh is made.
async fn run_action(
    state: &AppState,
    action: RequestAction,
    id: i64,
    headers: &HeaderMap,
) -> Response {
    let request_id = extract_request_id(headers);

    let Some(guard) = state.in_flight.try_begin(id) else {
        tracing::warn!(
            request = id,
            action = action.label(),
            "Action refused, request is already being processed"
        );
        return alert_only(&format!("Request {} is already being processed", id));
    };

    let result = state
        .backend
        .perform(action, id, request_id.as_deref())
        .await;
    drop(guard);

    match result {
        Ok(reply) => {
            let mut response = render_requests(state, request_id.as_deref()).await;
            response
                .headers_mut()
                .insert(HX_TRIGGER, show_message(&reply.display_text()));
            response
        }
        Err(_) => alert_only(action.failure_message()),
    }
}

/// Raise an alert without swapping anything into the page.
fn alert_only(message: &str) -> Response {
    (
        [
            (HX_TRIGGER, show_message(message)),
            (HX_RESWAP, HeaderValue::from_static("none")),
        ],
        "",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestStatus;

    fn row(id: i64, status: RequestStatus, processing: bool) -> RequestRow {
        RequestRow {
            request: DocumentRequest {
                id,
                email: format!("user{}@example.com", id),
                document: format!("Rev-{}", id),
                status,
            },
            processing,
        }
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let html = RequestsTableTemplate { rows: vec![] }.render().unwrap();
        assert!(html.contains("No requests found."));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn actions_only_for_pending_rows() {
        let html = RequestsTableTemplate {
            rows: vec![
                row(1, RequestStatus::Pending, false),
                row(2, RequestStatus::Approved, false),
                row(3, RequestStatus::Rejected, false),
            ],
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"id="approve-1""#));
        assert!(html.contains(r#"id="reject-1""#));
        assert!(!html.contains(r#"id="approve-2""#));
        assert!(!html.contains(r#"id="reject-3""#));
    }

    #[test]
    fn rows_keep_backend_order() {
        let html = RequestsTableTemplate {
            rows: vec![
                row(9, RequestStatus::Pending, false),
                row(2, RequestStatus::Approved, false),
                row(5, RequestStatus::Pending, false),
            ],
        }
        .render()
        .unwrap();

        let position = |id: i64| html.find(&format!(r#"id="request-{}""#, id)).unwrap();
        assert!(position(9) < position(2));
        assert!(position(2) < position(5));
    }

    #[test]
    fn processing_row_is_disabled() {
        let html = RequestsTableTemplate {
            rows: vec![
                row(7, RequestStatus::Pending, true),
                row(8, RequestStatus::Pending, false),
            ],
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"id="request-7" data-request-id="7" data-processing="true""#));
        assert!(html.contains(r#"id="request-8" data-request-id="8" data-processing="false""#));
        assert!(html.contains("Processing..."));
    }

    #[test]
    fn alert_only_does_not_swap() {
        let response = alert_only("Error approving request!");
        assert_eq!(response.headers().get(HX_RESWAP).unwrap(), "none");
        assert_eq!(
            response.headers().get(HX_TRIGGER).unwrap(),
            r#"{"showMessage":"Error approving request!"}"#
        );
    }
}
