use std::path::Path;

use async_trait::async_trait;

use crate::chat::ChatTurn;
use crate::error::IntakeError;
use crate::session::UserId;

/// Result of one recognition pass over an image.
///
/// Ephemeral: consumed immediately by the normalizer/extractor, never stored.
/// Callers must check `failed` before trusting `text`.
#[derive(Debug, Clone)]
pub struct RecognitionOutcome {
    pub text: String,
    pub failed: bool,
    pub error_detail: Option<String>,
}

impl RecognitionOutcome {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into(), failed: false, error_detail: None }
    }

    /// A failed pass still carries visible text so the dialogue can surface
    /// the problem in place of the expected content.
    pub fn failure(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            text: format!("[не вдалося розпізнати документ: {detail}]"),
            failed: true,
            error_detail: Some(detail),
        }
    }
}

/// Image-to-text engine. Infallible at the call site: every failure mode
/// (missing file, engine crash, unsupported language) folds into a
/// `RecognitionOutcome` with `failed = true`. No retries.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn recognize(&self, image_path: &Path, language_hint: &str) -> RecognitionOutcome;
}

/// External chat-completion collaborator used for OCR-noise structuring and
/// free-form question answering.
#[async_trait]
pub trait Collaborator: Send + Sync {
    fn name(&self) -> &str;

    /// Send the accumulated history plus one new user prompt; returns the
    /// assistant reply text.
    async fn converse(&self, history: &[ChatTurn], prompt: &str) -> Result<String, IntakeError>;
}

/// Outbound reply channel back to the user. Implemented by the transport
/// adapter; the session machine only ever emits through this seam.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_text(&self, user: UserId, text: &str) -> Result<(), IntakeError>;

    /// Deliver a file attachment (the policy artifact) with a caption.
    async fn send_document(
        &self,
        user: UserId,
        path: &Path,
        caption: &str,
    ) -> Result<(), IntakeError>;
}
