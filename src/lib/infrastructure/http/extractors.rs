//! Request extractors

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};

use crate::domain::enquiries::EnquiryPayload;

use super::errors::ApiError;

/// The JSON enquiry body. An empty body or a literal `null` yields `None`.
#[derive(Debug)]
pub struct EnquiryBody(pub Option<EnquiryPayload>);

#[async_trait]
impl<S> FromRequest<S> for EnquiryBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::new(rejection.status(), &rejection.body_text()).plain_text()
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        let Json(payload) = Json::<Option<EnquiryPayload>>::from_bytes(&bytes)?;

        Ok(Self(payload))
    }
}
