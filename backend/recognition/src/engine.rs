//! Tesseract recognition engine.
//!
//! Implements the `RecognitionEngine` seam over a local Tesseract install.
//! The contract is deliberately infallible: every failure mode — missing
//! image, missing traineddata, engine crash — folds into a
//! `RecognitionOutcome` with `failed = true`, and nothing is retried.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tesseract::Tesseract;
use tracing::{debug, warn};

use polisbot_core::{RecognitionEngine, RecognitionOutcome};

/// Recognition adapter backed by the Tesseract OCR engine.
pub struct TesseractEngine {
    tessdata_dir: Option<PathBuf>,
}

impl TesseractEngine {
    /// Locate tessdata via `TESSDATA_PREFIX` or common install directories;
    /// `None` lets Tesseract use its compiled-in default.
    pub fn new() -> Self {
        Self { tessdata_dir: discover_tessdata() }
    }

    pub fn with_tessdata_dir(dir: impl Into<PathBuf>) -> Self {
        Self { tessdata_dir: Some(dir.into()) }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_tessdata() -> Option<PathBuf> {
    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let dir = PathBuf::from(prefix);
        if dir.is_dir() {
            return Some(dir);
        }
    }
    ["/usr/share/tessdata", "/usr/local/share/tessdata", "/opt/homebrew/share/tessdata"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_dir())
}

/// Run one blocking recognition pass. Tries the requested languages first,
/// then plain English as a last resort (a missing traineddata pack should
/// not look like an unreadable image).
fn run_tesseract(
    tessdata: Option<&str>,
    image_path: &str,
    language_hint: &str,
) -> Result<String, String> {
    let mut last_err = String::new();
    for lang in [language_hint, "eng"] {
        match Tesseract::new(tessdata, Some(lang)) {
            Ok(tess) => match tess.set_image(image_path) {
                Ok(mut tess) => match tess.get_text() {
                    Ok(text) => return Ok(text),
                    Err(e) => last_err = format!("text extraction failed: {e}"),
                },
                Err(e) => last_err = format!("could not load image: {e}"),
            },
            Err(e) => {
                last_err = format!("engine init failed for '{lang}': {e}");
                continue;
            }
        }
        // Image/extraction errors will not improve with another language.
        break;
    }
    Err(last_err)
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path, language_hint: &str) -> RecognitionOutcome {
        debug!(image = %image_path.display(), lang = language_hint, "running recognition");

        if !image_path.is_file() {
            warn!(image = %image_path.display(), "image file missing before recognition");
            return RecognitionOutcome::failure(format!(
                "image not found: {}",
                image_path.display()
            ));
        }

        let tessdata = self.tessdata_dir.as_ref().map(|p| p.to_string_lossy().into_owned());
        let image = image_path.to_string_lossy().into_owned();
        let lang = language_hint.to_string();

        let result = tokio::task::spawn_blocking(move || {
            run_tesseract(tessdata.as_deref(), &image, &lang)
        })
        .await;

        match result {
            Ok(Ok(text)) => RecognitionOutcome::ok(text),
            Ok(Err(detail)) => {
                warn!(image = %image_path.display(), detail, "recognition failed");
                RecognitionOutcome::failure(detail)
            }
            Err(join_err) => {
                warn!(image = %image_path.display(), %join_err, "recognition task panicked");
                RecognitionOutcome::failure(format!("recognition task failed: {join_err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_image_folds_into_failed_outcome() {
        let engine = TesseractEngine::new();
        let outcome = engine
            .recognize(Path::new("/nonexistent/passport.jpg"), "ukr")
            .await;
        assert!(outcome.failed);
        assert!(outcome.error_detail.as_deref().unwrap_or("").contains("not found"));
        // The visible text still carries the problem for the dialogue.
        assert!(!outcome.text.is_empty());
    }
}
