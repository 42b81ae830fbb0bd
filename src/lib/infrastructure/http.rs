//! HTTP Server

use std::{
    net::{Ipv4Addr, SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{extract::Request, Router};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, info, info_span};

use crate::domain::communication::Mailer;

use state::AppState;

mod errors;
mod extractors;
mod handlers;
mod open_api;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[arg(long, env = "HTTP_PORT", default_value = "8080")]
    pub http_port: u16,

    /// PEM certificate; serves HTTPS when set together with `--key-path`
    #[arg(long, env = "TLS_CERT_PATH", requires = "key_path")]
    pub cert_path: Option<String>,

    /// PEM private key
    #[arg(long, env = "TLS_KEY_PATH", requires = "cert_path")]
    pub key_path: Option<String>,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
    tls_config: Option<RustlsConfig>,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(config: HttpServerConfig, state: AppState<impl Mailer>) -> Result<Self> {
        let router = router(state);

        let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.http_port));
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {}", config.http_port))?;

        listener
            .set_nonblocking(true)
            .context("failed to set listener to non-blocking")?;

        let tls_config = match (&config.cert_path, &config.key_path) {
            (Some(cert_path), Some(key_path)) => Some(
                RustlsConfig::from_pem_file(cert_path, key_path)
                    .await
                    .context("failed to load TLS config")?,
            ),
            _ => None,
        };

        Ok(Self {
            router,
            listener,
            tls_config,
        })
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    #[mutants::skip]
    pub async fn run(self) -> Result<()> {
        let Self {
            router,
            listener,
            tls_config,
        } = self;

        let address = listener
            .local_addr()
            .context("failed to get local address")?;

        let handle = Handle::new();

        tokio::spawn(shutdown_signal(handle.clone()));

        let service = router.into_make_service();

        let result = match tls_config {
            Some(tls_config) => {
                info!("HTTPS server listening on {address}");

                axum_server::from_tcp_rustls(listener, tls_config)
                    .handle(handle)
                    .serve(service)
                    .await
            }
            None => {
                info!("HTTP server listening on {address}");

                axum_server::from_tcp(listener)
                    .handle(handle)
                    .serve(service)
                    .await
            }
        };

        result.context("server error")?;

        info!("server stopped");

        Ok(())
    }
}

/// Create the application's router
pub fn router<M: Mailer>(state: AppState<M>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .nest("/api", handlers::router())
        .layer(CatchPanicLayer::custom(handlers::panic_handler))
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    debug!("shutting down gracefully");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use testresult::TestResult;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::handlers::panic_handler;

    #[tokio::test]
    async fn test_panics_become_500() -> TestResult {
        async fn boom() -> &'static str {
            panic!("secret internals")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_handler));

        let response = TestServer::new(app)?.get("/boom").await;

        assert_eq!(response.status_code(), 500);
        assert!(!response.text().contains("secret internals"));

        Ok(())
    }

    #[test]
    fn test_server_config_defaults() -> TestResult {
        use clap::Parser;

        let config = super::HttpServerConfig::try_parse_from(["server"])?;

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.cert_path, None);

        Ok(())
    }
}
