#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API accepting customer enquiries

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use logistic_enquiries::{
    domain::communication::MailConfig,
    infrastructure::{
        email::{check_addresses, ConfiguredMailer},
        http::{state::AppState, HttpServer, HttpServerConfig},
    },
};
use tracing::{info, warn};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(about)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The mail configuration
    #[clap(flatten)]
    pub mail: MailConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt::init();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("a rustls crypto provider was already installed");
    }

    let args = Args::parse();

    let mail = Arc::new(args.mail);

    if let Err(e) = mail.ensure_credentials() {
        warn!("{e}; enquiries will not be delivered until this is fixed");
    }

    if let Err(e) = check_addresses(&mail) {
        warn!("{e}; set MAIL_FROM or MAIL_DEFAULT_FROM to a valid address");
    }

    info!(
        transport = ?mail.transport,
        host = %mail.host,
        port = mail.port,
        recipient = %mail.to_address,
        "mail configured"
    );

    let mailer = ConfiguredMailer::new(Arc::clone(&mail))?;
    let state = AppState::new(mail, mailer);

    HttpServer::new(args.server, state).await?.run().await
}
