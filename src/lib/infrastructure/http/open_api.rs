//! OpenAPI module

use utoipa::OpenApi;

use crate::{
    domain::enquiries::EnquiryPayload,
    infrastructure::http::{errors::ErrorResponse, handlers::*},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Logistic Enquiries"),
    paths(
        logistic::enquiry::handler,
        logistic::info::handler,
        mail::send::handler,
        mail::status::handler,
        uptime::handler
    ),
    components(schemas(
        EnquiryPayload,
        logistic::enquiry::EnquiryReceivedResponse,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
