//! # Ingress Server Binary
//!
//! Standalone entry point for the webhook ingress layer. Runs the listener
//! with tracing-only collaborators: admitted events are logged instead of
//! forwarded, which is useful for wiring up and verifying new webhook sources
//! before the full assistant process supplies the real downstream handlers.

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use attache_ingress::config::IngressConfig;
use attache_ingress::registry::WebhookRegistry;
use attache_ingress::sources::{
    register_sources, InboundSmsHandler, TranscriptNotice, TranscriptSink,
};
use attache_ingress::web::{AppState, WebhookServer};

#[derive(Parser)]
#[command(name = "ingress")]
#[command(about = "Attache webhook ingress server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Listen port (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,
}

/// Logs admitted SMS messages instead of forwarding them.
struct LoggingSmsHandler;

#[async_trait]
impl InboundSmsHandler for LoggingSmsHandler {
    async fn handle_inbound_sms(&self, from_number: &str, text: &str) -> anyhow::Result<()> {
        info!(from = %from_number, chars = text.len(), "Inbound SMS (standalone mode, not forwarded)");
        Ok(())
    }
}

/// Logs transcript notices instead of processing them.
struct LoggingTranscriptSink;

#[async_trait]
impl TranscriptSink for LoggingTranscriptSink {
    async fn process_transcript(&self, notice: TranscriptNotice) -> anyhow::Result<()> {
        info!(
            file_name = %notice.file_name,
            meeting_date = %notice.meeting_date,
            "Transcript notice (standalone mode, not processed)"
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let mut config = IngressConfig::load().context("loading ingress configuration")?;
    if let Some(port) = cli.port {
        config.webhook.port = port;
    }

    let registry = Arc::new(WebhookRegistry::new());
    register_sources(
        &registry,
        &config,
        Arc::new(LoggingSmsHandler),
        Arc::new(LoggingTranscriptSink),
    )
    .await;

    let state = AppState::new(Arc::clone(&registry), config.webhook.secret.clone());
    let mut server = WebhookServer::new(&config.webhook);
    server.start(state).await.context("starting ingress server")?;

    if !server.is_listening() {
        // Disabled configuration; nothing to wait on.
        return Ok(());
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("Shutdown signal received");

    server.stop().await;
    Ok(())
}
