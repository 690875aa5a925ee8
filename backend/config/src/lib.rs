//! Runtime configuration from environment variables.
//!
//! Credentials and paths are external configuration, not core contracts:
//! everything here has a sensible default except the two secrets.

use std::path::PathBuf;

use anyhow::{bail, Result};

/// Full runtime configuration, loaded once at startup.
#[derive(Clone)]
pub struct BotConfig {
    /// Telegram bot token (`POLIS_TELEGRAM_TOKEN`). Required.
    pub telegram_token: String,
    /// API key for the chat-completions collaborator (`POLIS_OPENAI_KEY`). Required.
    pub openai_key: String,
    /// Collaborator model name (`POLIS_MODEL`).
    pub model: String,
    /// Optional override for the collaborator endpoint (`POLIS_OPENAI_BASE_URL`).
    pub openai_base_url: Option<String>,
    /// Where downloaded document photos land (`POLIS_MEDIA_DIR`).
    pub media_dir: PathBuf,
    /// Where policy artifacts are written (`POLIS_ARTIFACTS_DIR`).
    pub artifacts_dir: PathBuf,
    /// Log directory (`POLIS_LOG_DIR`) and default level (`POLIS_LOG_LEVEL`).
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Recognition language hint (`POLIS_OCR_LANG`), Tesseract syntax.
    pub ocr_lang: String,
    /// Premium text shown to the user and printed on the artifact
    /// (`POLIS_PREMIUM`). Decorative.
    pub premium: String,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let Ok(telegram_token) = std::env::var("POLIS_TELEGRAM_TOKEN") else {
            bail!("POLIS_TELEGRAM_TOKEN is not set");
        };
        let Ok(openai_key) = std::env::var("POLIS_OPENAI_KEY") else {
            bail!("POLIS_OPENAI_KEY is not set");
        };

        Ok(Self {
            telegram_token,
            openai_key,
            model: env_or("POLIS_MODEL", "gpt-4o-mini"),
            openai_base_url: std::env::var("POLIS_OPENAI_BASE_URL").ok(),
            media_dir: env_or("POLIS_MEDIA_DIR", "data/media").into(),
            artifacts_dir: env_or("POLIS_ARTIFACTS_DIR", "data/policies").into(),
            log_dir: env_or("POLIS_LOG_DIR", "logs").into(),
            log_level: env_or("POLIS_LOG_LEVEL", "info"),
            ocr_lang: env_or("POLIS_OCR_LANG", "ukr+eng"),
            premium: env_or("POLIS_PREMIUM", "1500 грн"),
        })
    }
}

// Manual impl so tokens never land in logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("telegram_token", &"***")
            .field("openai_key", &"***")
            .field("model", &self.model)
            .field("openai_base_url", &self.openai_base_url)
            .field("media_dir", &self.media_dir)
            .field("artifacts_dir", &self.artifacts_dir)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .field("ocr_lang", &self.ocr_lang)
            .field("premium", &self.premium)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let config = BotConfig {
            telegram_token: "7751870205:secret".into(),
            openai_key: "sk-secret".into(),
            model: "gpt-4o-mini".into(),
            openai_base_url: None,
            media_dir: "data/media".into(),
            artifacts_dir: "data/policies".into(),
            log_dir: "logs".into(),
            log_level: "info".into(),
            ocr_lang: "ukr+eng".into(),
            premium: "1500 грн".into(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("gpt-4o-mini"));
    }
}
