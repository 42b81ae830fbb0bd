//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::error;
use utoipa::OpenApi;

use crate::domain::communication::Mailer;

use super::{errors::ApiError, open_api::ApiDocs, state::AppState};

pub mod logistic;
pub mod mail;
pub mod stoplight;
pub mod uptime;

/// Routes mounted under `/api`
pub fn router<M: Mailer>() -> Router<AppState<M>> {
    let logistic = Router::new()
        .route("/enquiry", post(logistic::enquiry::handler))
        .route("/info", get(logistic::info::handler));

    let mail = Router::new()
        .route("/send", post(mail::send::handler))
        .route("/status", get(mail::status::handler))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/docs", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler))
        .nest("/logistic", logistic)
        .nest("/mail", mail)
}

/// Catch panics and return a 500 error
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("handler panicked: {details}");

    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
