//! Submit enquiry handler

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::{Mailer, OutboundMessage},
        enquiries::{validate, EnquiryPayload},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        extractors::EnquiryBody,
        state::AppState,
    },
};

/// Enquiry received response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryReceivedResponse {
    /// Always `"received"`
    #[schema(example = "received")]
    pub status: String,

    /// The customer's first name
    #[schema(example = "Jane")]
    pub first_name: String,
}

/// Submit a customer enquiry
///
/// Validates the enquiry and notifies the operations team by email.
#[utoipa::path(
    post,
    operation_id = "submit_enquiry",
    tag = "Enquiries",
    path = "/api/logistic/enquiry",
    request_body = EnquiryPayload,
    responses(
        (status = StatusCode::CREATED, description = "Enquiry received", body = EnquiryReceivedResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid enquiry", body = String, content_type = "text/plain", example = json!("invalid phone number")),
        (status = StatusCode::UNAUTHORIZED, description = "Mail server rejected the credentials", body = ErrorResponse),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "Mail server unavailable", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Notification could not be sent", body = ErrorResponse),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
    EnquiryBody(payload): EnquiryBody,
) -> Result<(StatusCode, Json<EnquiryReceivedResponse>), ApiError> {
    let enquiry = validate(payload.as_ref())?;

    info!(
        first_name = enquiry.first_name(),
        city = enquiry.city(),
        inquiry_type = enquiry.inquiry_type(),
        "received enquiry"
    );

    let message = OutboundMessage::compose(&enquiry, &state.mail);

    state.mailer.send(&message).await?;

    Ok((
        StatusCode::CREATED,
        Json(EnquiryReceivedResponse {
            status: "received".to_string(),
            first_name: enquiry.first_name().to_string(),
        }),
    ))
}
