//! Extraction step: one model call per uploaded file.

use async_trait::async_trait;

use crate::documents::encoding::EncodedPayload;
use crate::documents::prompts::EXTRACTION_PROMPT;
use crate::llm_client::prompts::EXTRACTION_SAMPLING;
use crate::llm_client::{GeminiClient, InlineData, LlmError, Part};

/// Turns one encoded file into free text.
///
/// Carried in `AppState` as `Arc<dyn DocumentExtractor>`.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, payload: &EncodedPayload) -> Result<String, LlmError>;
}

/// Sends the file as inline data together with the fixed extraction instruction.
pub struct GeminiExtractor {
    llm: GeminiClient,
}

impl GeminiExtractor {
    pub fn new(llm: GeminiClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl DocumentExtractor for GeminiExtractor {
    async fn extract(&self, payload: &EncodedPayload) -> Result<String, LlmError> {
        let parts = vec![
            Part::Text {
                text: EXTRACTION_PROMPT,
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: &payload.mime_type,
                    data: &payload.data,
                },
            },
        ];
        self.llm.generate(parts, EXTRACTION_SAMPLING).await
    }
}
