//! Direct mail send handler

use axum::{extract::State, http::StatusCode};
use tracing::info;

use crate::{
    domain::{
        communication::{Mailer, OutboundMessage},
        enquiries::{validate, EnquiryPayload},
    },
    infrastructure::http::{errors::ApiError, extractors::EnquiryBody, state::AppState},
};

/// Send the enquiry notification email directly
///
/// A test path for mail dispatch. All responses are plain text.
#[utoipa::path(
    post,
    operation_id = "send_enquiry_mail",
    tag = "Mail",
    path = "/api/mail/send",
    request_body = EnquiryPayload,
    responses(
        (status = StatusCode::OK, description = "Mail sent", body = String, content_type = "text/plain"),
        (status = StatusCode::BAD_REQUEST, description = "Invalid enquiry", body = String, content_type = "text/plain"),
        (status = StatusCode::UNAUTHORIZED, description = "Mail server rejected the credentials", body = String, content_type = "text/plain"),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "Mail server unavailable", body = String, content_type = "text/plain"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Unexpected error", body = String, content_type = "text/plain"),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
    EnquiryBody(payload): EnquiryBody,
) -> Result<&'static str, ApiError> {
    let enquiry = validate(payload.as_ref())?;

    let message = OutboundMessage::compose(&enquiry, &state.mail);

    state
        .mailer
        .send(&message)
        .await
        .map_err(|err| ApiError::from(err).plain_text())?;

    info!(first_name = enquiry.first_name(), "enquiry mail sent");

    Ok("Mail sent.")
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::{
            communication::{tests::MockMailer, DispatchError},
            enquiries::tests::valid_payload,
        },
        infrastructure::http::{router, state::tests::test_state},
    };

    const PATH: &str = "/api/mail/send";

    #[tokio::test]
    async fn test_send_mail_success() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send().times(1).returning(|_| Ok(()));

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(PATH)
            .json(&valid_payload())
            .await;

        response.assert_status_ok();
        response.assert_text("Mail sent.");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_auth_failure_is_plain_text() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send().returning(|_| {
            Err(DispatchError::AuthFailed(
                "535 Authentication failed".to_string(),
            ))
        });

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(PATH)
            .json(&valid_payload())
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert!(response
            .text()
            .starts_with("SMTP authentication failed. Verify username/API key"));
        assert!(!response.text().contains("s3cr3t-api-key"));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_transport_failure() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send().returning(|_| {
            Err(DispatchError::TransportUnavailable(
                "Connection refused (os error 111)".to_string(),
            ))
        });

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(PATH)
            .json(&valid_payload())
            .await;

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.text(),
            "Mail server unavailable or failed: Connection refused (os error 111)"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_config_failure() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send().returning(|_| {
            Err(DispatchError::ConfigInvalid(
                "mail password / API key is empty".to_string(),
            ))
        });

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(PATH)
            .json(&valid_payload())
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_validation_failure() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send().never();

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(PATH)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "request body required");

        Ok(())
    }
}
