//! Policy artifact generation.
//!
//! Renders the confirmed document data into the final plain-text policy
//! file, one per user. The full content is composed before a single write
//! call, so consumers never observe a partially written artifact.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use polisbot_normalize::{clean_text, normalize_vehicle_line, KNOWN_MAKES, KNOWN_REGIONS};

/// Default premium line. Decorative: nothing parses it back.
pub const DEFAULT_PREMIUM: &str = "1500 грн";

/// Writes one policy artifact per user under a fixed directory.
pub struct PolicyGenerator {
    artifacts_dir: PathBuf,
    premium: String,
}

impl PolicyGenerator {
    pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
        Self { artifacts_dir: artifacts_dir.into(), premium: DEFAULT_PREMIUM.to_string() }
    }

    pub fn with_premium(mut self, premium: impl Into<String>) -> Self {
        self.premium = premium.into();
        self
    }

    pub fn artifact_path(&self, user: i64) -> PathBuf {
        self.artifacts_dir.join(format!("policy_{user}.txt"))
    }

    /// Render and persist the artifact. Deterministic for given inputs (the
    /// issuance date is a static placeholder); overwrites any prior artifact
    /// for the same user.
    pub async fn generate(
        &self,
        user: i64,
        identity_text: &str,
        vehicle_text: &str,
    ) -> Result<PathBuf> {
        let content = self.render(identity_text, vehicle_text);
        let path = self.artifact_path(user);

        tokio::fs::create_dir_all(&self.artifacts_dir)
            .await
            .with_context(|| format!("creating {}", self.artifacts_dir.display()))?;
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        info!(user, path = %path.display(), "policy artifact written");
        Ok(path)
    }

    fn render(&self, identity_text: &str, vehicle_text: &str) -> String {
        let identity = clean_text(identity_text);
        let vehicle = clean_text(vehicle_text)
            .lines()
            .map(|line| normalize_vehicle_line(line, KNOWN_MAKES, KNOWN_REGIONS))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "СТРАХОВИЙ ПОЛІС\n\
             ================\n\n\
             --- СТРАХУВАЛЬНИК ---\n{identity}\n\n\
             --- ТРАНСПОРТНИЙ ЗАСІБ ---\n{vehicle}\n\n\
             Страхова премія: {premium}\n\
             Дата оформлення: ____-__-__\n",
            premium = self.premium,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_deterministic_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let generator = PolicyGenerator::new(dir.path());

        let path = generator
            .generate(42, "ПЕТРЕНКО ІВАН\nFE1234567", "Toyoto Camry 2015")
            .await
            .unwrap();
        let first = tokio::fs::read_to_string(&path).await.unwrap();

        let path2 = generator
            .generate(42, "ПЕТРЕНКО ІВАН\nFE1234567", "Toyoto Camry 2015")
            .await
            .unwrap();
        let second = tokio::fs::read_to_string(&path2).await.unwrap();

        assert_eq!(path, path2);
        assert_eq!(first, second);
        assert!(first.contains("СТРАХОВИЙ ПОЛІС"));
        // Vehicle section went through fuzzy normalization.
        assert!(first.contains("Toyota Camry 2015"));
        assert!(first.contains("1500 грн"));
    }

    #[tokio::test]
    async fn overwrites_prior_artifact_for_same_user() {
        let dir = tempfile::tempdir().unwrap();
        let generator = PolicyGenerator::new(dir.path());

        generator.generate(7, "перший", "Ford Focus").await.unwrap();
        let path = generator.generate(7, "другий", "Ford Focus").await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("другий"));
        assert!(!content.contains("перший"));
    }

    #[tokio::test]
    async fn premium_is_configurable() {
        let dir = tempfile::tempdir().unwrap();
        let generator = PolicyGenerator::new(dir.path()).with_premium("2000 грн");
        let path = generator.generate(1, "а", "б").await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("2000 грн"));
    }
}
