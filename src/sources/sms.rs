//! # SMS Source (Telnyx)
//!
//! Webhook handler for the Telnyx SMS gateway, registered under the `sms`
//! source key. Telnyx multiplexes several event kinds (inbound message,
//! delivery receipt, failure notice) onto one webhook path, and the gateway
//! will relay traffic from any sender, so this handler applies a two-stage
//! admission filter before any expensive work:
//!
//! 1. only `message.received` events are eligible; receipts and failure
//!    notices are acknowledged and dropped so they never consume an LLM call,
//! 2. only messages from the configured owner number are processed; everything
//!    else is accepted-and-dropped (defense in depth behind the shared secret).
//!
//! Both rejections are invisible to the gateway: the outer layer has already
//! returned its `200` by the time the filter runs.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::registry::WebhookHandler;

/// The only Telnyx event kind that reaches business logic.
pub const EVENT_MESSAGE_RECEIVED: &str = "message.received";

/// Downstream processing for an admitted inbound SMS.
///
/// This is the collaborator boundary: the conversation session, LLM call, and
/// reply delivery live behind it, outside the ingress layer. Implementations
/// must tolerate concurrent invocation.
#[async_trait]
pub trait InboundSmsHandler: Send + Sync {
    /// Process one admitted inbound message from the owner.
    async fn handle_inbound_sms(&self, from_number: &str, text: &str) -> anyhow::Result<()>;
}

/// Per-payload admission decision. Computed, logged, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Ok,
    WrongEventType,
    SenderNotAllowed,
    MissingSender,
}

/// Webhook handler for Telnyx inbound pushes.
pub struct SmsSource {
    owner_phone: String,
    downstream: Arc<dyn InboundSmsHandler>,
}

impl SmsSource {
    pub fn new(owner_phone: String, downstream: Arc<dyn InboundSmsHandler>) -> Self {
        Self {
            owner_phone,
            downstream,
        }
    }

    /// Apply the admission filter to a decoded Telnyx payload.
    ///
    /// On `Ok`, also returns the sender number and message text (text defaults
    /// to empty when absent; empty-body handling belongs downstream).
    fn admit<'a>(&self, payload: &'a Value) -> (AdmissionDecision, Option<(&'a str, &'a str)>) {
        let data = payload.get("data");

        let event_type = data
            .and_then(|d| d.get("event_type"))
            .and_then(Value::as_str)
            .unwrap_or("");
        if event_type != EVENT_MESSAGE_RECEIVED {
            return (AdmissionDecision::WrongEventType, None);
        }

        let message = data.and_then(|d| d.get("payload"));

        let from_number = message
            .and_then(|m| m.get("from"))
            .and_then(|f| f.get("phone_number"))
            .and_then(Value::as_str)
            .unwrap_or("");
        if from_number.is_empty() {
            return (AdmissionDecision::MissingSender, None);
        }

        if from_number != self.owner_phone {
            return (AdmissionDecision::SenderNotAllowed, None);
        }

        let text = message
            .and_then(|m| m.get("text"))
            .and_then(Value::as_str)
            .unwrap_or("");

        (AdmissionDecision::Ok, Some((from_number, text)))
    }
}

#[async_trait]
impl WebhookHandler for SmsSource {
    async fn handle(&self, payload: Value) -> anyhow::Result<()> {
        match self.admit(&payload) {
            (AdmissionDecision::Ok, Some((from_number, text))) => {
                info!(from = %from_number, "Inbound SMS admitted");
                self.downstream.handle_inbound_sms(from_number, text).await
            }
            (AdmissionDecision::WrongEventType, _) => {
                debug!("SMS event ignored: not a message.received event");
                Ok(())
            }
            (AdmissionDecision::MissingSender, _) => {
                warn!("SMS ignored: missing sender phone number");
                Ok(())
            }
            (AdmissionDecision::SenderNotAllowed, _) => {
                warn!("SMS rejected: sender is not the owner");
                Ok(())
            }
            // admit() always pairs Ok with the extracted fields
            (AdmissionDecision::Ok, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingSms {
        received: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSms {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                received: Mutex::new(Vec::new()),
            })
        }

        fn received(&self) -> Vec<(String, String)> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InboundSmsHandler for RecordingSms {
        async fn handle_inbound_sms(&self, from_number: &str, text: &str) -> anyhow::Result<()> {
            self.received
                .lock()
                .unwrap()
                .push((from_number.to_string(), text.to_string()));
            Ok(())
        }
    }

    const OWNER: &str = "+15551230000";

    fn inbound_payload(event_type: &str, from: Option<&str>, text: &str) -> Value {
        let mut message = json!({ "text": text });
        if let Some(from) = from {
            message["from"] = json!({ "phone_number": from });
        }
        json!({
            "data": {
                "event_type": event_type,
                "payload": message,
            }
        })
    }

    fn source_with(downstream: Arc<RecordingSms>) -> SmsSource {
        SmsSource::new(OWNER.to_string(), downstream)
    }

    #[tokio::test]
    async fn test_owner_message_is_processed() {
        let downstream = RecordingSms::new();
        let source = source_with(downstream.clone());

        source
            .handle(inbound_payload(EVENT_MESSAGE_RECEIVED, Some(OWNER), "hello"))
            .await
            .unwrap();

        assert_eq!(
            downstream.received(),
            vec![(OWNER.to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delivery_receipt_is_dropped() {
        let downstream = RecordingSms::new();
        let source = source_with(downstream.clone());

        source
            .handle(inbound_payload("message.finalized", Some(OWNER), "hello"))
            .await
            .unwrap();

        assert!(downstream.received().is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_sender_is_dropped() {
        let downstream = RecordingSms::new();
        let source = source_with(downstream.clone());

        source
            .handle(inbound_payload(
                EVENT_MESSAGE_RECEIVED,
                Some("+15559998888"),
                "hi there",
            ))
            .await
            .unwrap();

        assert!(downstream.received().is_empty());
    }

    #[tokio::test]
    async fn test_missing_sender_is_dropped() {
        let downstream = RecordingSms::new();
        let source = source_with(downstream.clone());

        source
            .handle(inbound_payload(EVENT_MESSAGE_RECEIVED, None, "hi"))
            .await
            .unwrap();

        assert!(downstream.received().is_empty());
    }

    #[tokio::test]
    async fn test_missing_payload_substructure_is_dropped() {
        let downstream = RecordingSms::new();
        let source = source_with(downstream.clone());

        source.handle(json!({})).await.unwrap();
        source.handle(json!({"data": {}})).await.unwrap();
        source
            .handle(json!({"data": {"event_type": EVENT_MESSAGE_RECEIVED}}))
            .await
            .unwrap();

        assert!(downstream.received().is_empty());
    }

    #[tokio::test]
    async fn test_missing_text_defaults_to_empty() {
        let downstream = RecordingSms::new();
        let source = source_with(downstream.clone());

        source
            .handle(json!({
                "data": {
                    "event_type": EVENT_MESSAGE_RECEIVED,
                    "payload": { "from": { "phone_number": OWNER } },
                }
            }))
            .await
            .unwrap();

        assert_eq!(
            downstream.received(),
            vec![(OWNER.to_string(), String::new())]
        );
    }

    #[test]
    fn test_admission_decisions() {
        let source = source_with(RecordingSms::new());

        // Payloads outlive the borrowed sender/text slices admit() hands back.
        let owner_message = inbound_payload(EVENT_MESSAGE_RECEIVED, Some(OWNER), "ok");
        let (decision, extracted) = source.admit(&owner_message);
        assert_eq!(decision, AdmissionDecision::Ok);
        assert_eq!(extracted, Some((OWNER, "ok")));

        let receipt = inbound_payload("message.sent", Some(OWNER), "ok");
        let (decision, _) = source.admit(&receipt);
        assert_eq!(decision, AdmissionDecision::WrongEventType);

        let stranger_message =
            inbound_payload(EVENT_MESSAGE_RECEIVED, Some("+10000000000"), "ok");
        let (decision, _) = source.admit(&stranger_message);
        assert_eq!(decision, AdmissionDecision::SenderNotAllowed);

        let anonymous_message = inbound_payload(EVENT_MESSAGE_RECEIVED, None, "ok");
        let (decision, _) = source.admit(&anonymous_message);
        assert_eq!(decision, AdmissionDecision::MissingSender);
    }
}
