//! # Plaud Source
//!
//! Webhook handler for Plaud meeting-transcript notifications, registered
//! under the `plaud` source key. A Zapier automation fires when a new
//! transcript lands in Google Drive; the payload carries the Drive file ID,
//! file name, and meeting date. This handler extracts those fields and hands
//! them to the transcript sink — fetching the transcript, summarization, and
//! owner notification all live behind that seam.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::registry::WebhookHandler;

/// Notification that a new meeting transcript is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptNotice {
    /// Drive file ID, when the automation supplies one.
    pub file_id: Option<String>,
    pub file_name: String,
    pub meeting_date: String,
}

/// Downstream processing for a transcript notice.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn process_transcript(&self, notice: TranscriptNotice) -> anyhow::Result<()>;
}

/// Webhook handler for Plaud transcript pushes.
pub struct PlaudSource {
    sink: Arc<dyn TranscriptSink>,
}

impl PlaudSource {
    pub fn new(sink: Arc<dyn TranscriptSink>) -> Self {
        Self { sink }
    }

    fn notice_from(payload: &Value) -> TranscriptNotice {
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        TranscriptNotice {
            file_id: field("file_id").filter(|id| !id.is_empty()),
            file_name: field("file_name").unwrap_or_else(|| "unknown".to_string()),
            meeting_date: field("meeting_date").unwrap_or_default(),
        }
    }
}

#[async_trait]
impl WebhookHandler for PlaudSource {
    async fn handle(&self, payload: Value) -> anyhow::Result<()> {
        let notice = Self::notice_from(&payload);
        info!(
            file_name = %notice.file_name,
            meeting_date = %notice.meeting_date,
            "Plaud transcript received"
        );
        self.sink.process_transcript(notice).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingSink {
        notices: Mutex<Vec<TranscriptNotice>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                notices: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TranscriptSink for RecordingSink {
        async fn process_transcript(&self, notice: TranscriptNotice) -> anyhow::Result<()> {
            self.notices.lock().unwrap().push(notice);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_notice_extraction() {
        let sink = RecordingSink::new();
        let source = PlaudSource::new(sink.clone());

        source
            .handle(json!({
                "file_id": "abc123",
                "file_name": "standup.txt",
                "meeting_date": "2025-06-02",
            }))
            .await
            .unwrap();

        let notices = sink.notices.lock().unwrap();
        assert_eq!(
            notices[0],
            TranscriptNotice {
                file_id: Some("abc123".to_string()),
                file_name: "standup.txt".to_string(),
                meeting_date: "2025-06-02".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_fields_get_defaults() {
        let sink = RecordingSink::new();
        let source = PlaudSource::new(sink.clone());

        source.handle(json!({})).await.unwrap();

        let notices = sink.notices.lock().unwrap();
        assert_eq!(
            notices[0],
            TranscriptNotice {
                file_id: None,
                file_name: "unknown".to_string(),
                meeting_date: String::new(),
            }
        );
    }
}
