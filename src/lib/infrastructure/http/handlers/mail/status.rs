//! Mail server status handler

use axum::{extract::State, http::StatusCode};

use crate::{
    domain::communication::Mailer,
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Check that the mail server accepts a session
///
/// Connects (and authenticates, when enabled) without sending anything.
#[utoipa::path(
    get,
    operation_id = "mail_status",
    tag = "Mail",
    path = "/api/mail/status",
    responses(
        (status = StatusCode::OK, description = "Mail server reachable", body = String, content_type = "text/plain"),
        (status = StatusCode::UNAUTHORIZED, description = "Mail server rejected the credentials", body = String, content_type = "text/plain"),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "Mail server unavailable", body = String, content_type = "text/plain"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Mail is not configured", body = String, content_type = "text/plain"),
    )
)]
pub async fn handler<M: Mailer>(State(state): State<AppState<M>>) -> Result<&'static str, ApiError> {
    state
        .mailer
        .check_connection()
        .await
        .map_err(|err| ApiError::from(err).plain_text())?;

    Ok("Mail server is reachable.")
}
