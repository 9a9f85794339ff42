//! # Webhook Sources
//!
//! Source-specific handlers and the explicit startup registration sequence.
//!
//! Registration is a plain call made once during startup, before the ingress
//! server binds its socket — no import-time side effects, no reflection. Each
//! source takes its downstream collaborator as a trait object so the ingress
//! layer stays free of business-logic dependencies.

pub mod plaud;
pub mod sms;

pub use plaud::{PlaudSource, TranscriptNotice, TranscriptSink};
pub use sms::{AdmissionDecision, InboundSmsHandler, SmsSource, EVENT_MESSAGE_RECEIVED};

use std::sync::Arc;
use tracing::info;

use crate::config::IngressConfig;
use crate::registry::WebhookRegistry;

/// Source key for the Telnyx SMS gateway.
pub const SMS_SOURCE: &str = "sms";
/// Source key for Plaud transcript notifications.
pub const PLAUD_SOURCE: &str = "plaud";

/// Register all configured webhook sources.
///
/// Must run before [`crate::web::WebhookServer::start`] so routing is wired
/// ahead of first traffic. The SMS source is registered only when the Telnyx
/// credential and owner number are both configured; an unconfigured source is
/// simply unresolvable and the server answers 404 for it.
pub async fn register_sources(
    registry: &WebhookRegistry,
    config: &IngressConfig,
    sms_downstream: Arc<dyn InboundSmsHandler>,
    transcript_sink: Arc<dyn TranscriptSink>,
) {
    registry
        .register(PLAUD_SOURCE, Arc::new(PlaudSource::new(transcript_sink)))
        .await;

    if config.sms.is_configured() {
        let source = SmsSource::new(config.sms.owner_phone.clone(), sms_downstream);
        registry.register(SMS_SOURCE, Arc::new(source)).await;
    } else {
        info!("SMS source not configured; skipping registration");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IngressConfig, SmsConfig};
    use async_trait::async_trait;

    struct NoopSms;

    #[async_trait]
    impl InboundSmsHandler for NoopSms {
        async fn handle_inbound_sms(&self, _from_number: &str, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoopSink;

    #[async_trait]
    impl TranscriptSink for NoopSink {
        async fn process_transcript(&self, _notice: TranscriptNotice) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sms_registered_only_when_configured() {
        let registry = WebhookRegistry::new();
        let config = IngressConfig::default();

        register_sources(&registry, &config, Arc::new(NoopSms), Arc::new(NoopSink)).await;

        assert_eq!(registry.list_sources().await, vec![PLAUD_SOURCE]);
    }

    #[tokio::test]
    async fn test_sms_registered_when_configured() {
        let registry = WebhookRegistry::new();
        let config = IngressConfig {
            sms: SmsConfig {
                telnyx_api_key: "KEY".to_string(),
                owner_phone: "+15551230000".to_string(),
            },
            ..IngressConfig::default()
        };

        register_sources(&registry, &config, Arc::new(NoopSms), Arc::new(NoopSink)).await;

        assert_eq!(registry.list_sources().await, vec![PLAUD_SOURCE, SMS_SOURCE]);
    }
}
