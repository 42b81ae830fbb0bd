//! Service information handler

use axum::http::StatusCode;

/// Service information
#[utoipa::path(
    get,
    operation_id = "logistic_info",
    tag = "Enquiries",
    path = "/api/logistic/info",
    responses(
        (status = StatusCode::OK, description = "Service information", body = String, content_type = "text/plain"),
    )
)]
pub async fn handler() -> &'static str {
    "Sparta Logistic Information"
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::infrastructure::http::{router, state::tests::test_state};

    #[tokio::test]
    async fn test_info_handler() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .get("/api/logistic/info")
            .await;

        response.assert_status_ok();
        response.assert_text("Sparta Logistic Information");

        Ok(())
    }
}
