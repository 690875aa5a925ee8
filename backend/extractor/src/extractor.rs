//! OCR-to-structured-report extraction.
//!
//! The hard part — turning noisy recognition output into typed fields — is
//! delegated to the AI collaborator with a fixed instruction template. The
//! call is stateful per session: the system instruction is appended once,
//! then user/assistant turns accumulate so later free-form questions in the
//! confirmation phase keep their context. For identity documents a passport
//! machine-readable zone, when present, is parsed first at fixed offsets and
//! the raw OCR text is only the fallback.

use std::sync::Arc;

use tracing::{info, warn};

use polisbot_core::{ChatTurn, Collaborator, Session};
use polisbot_recognition::parse_mrz;

/// Fixed degrade text for any collaborator failure. The dialogue state is
/// left untouched so the user can simply send another message.
pub const COLLABORATOR_APOLOGY: &str =
    "Вибач, зараз не можу обробити запит. Спробуй, будь ласка, ще раз трохи пізніше.";

const SYSTEM_INSTRUCTION: &str = "\
Ти — помічник страхового агента. Ти отримуєш розпізнаний текст із фото \
паспорта та техпаспорта авто. Текст містить помилки розпізнавання — виправляй \
їх, а не просто переформатовуй. Відповідай українською, стисло і по суті.";

/// Structures recognized document text through the AI collaborator.
pub struct StructuredExtractor {
    collaborator: Arc<dyn Collaborator>,
}

impl StructuredExtractor {
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self { collaborator }
    }

    fn extraction_prompt(identity_text: &str, vehicle_text: &str) -> String {
        format!(
            "Ось розпізнаний текст документів.\n\n\
             === ПАСПОРТ ===\n{identity_text}\n\n\
             === ТЕХПАСПОРТ ===\n{vehicle_text}\n\n\
             Виділи з паспорта: повне ім'я, номер документа, дату народження, \
             ким виданий, дату видачі. \
             З техпаспорта: марку і модель авто, рік випуску, VIN або номерний \
             знак, регіон реєстрації. \
             Поля, яких немає в тексті, познач як «не розпізнано». \
             Поверни акуратний список полів, без зайвих коментарів."
        )
    }

    /// Produce the human-readable structured report for both documents.
    ///
    /// Best-effort: a collaborator failure degrades to a fixed apology and
    /// leaves the session usable.
    pub async fn extract(
        &self,
        identity_raw: &str,
        vehicle_raw: &str,
        session: &mut Session,
    ) -> String {
        // MRZ fast path: fixed-offset fields beat noisy free text when the
        // machine-readable layout is present.
        let identity_text = match parse_mrz(identity_raw) {
            Some(mrz) => {
                info!(user = session.user, "identity parsed via MRZ fast path");
                mrz.to_report_text()
            }
            None => identity_raw.to_string(),
        };

        let prompt = Self::extraction_prompt(&identity_text, vehicle_raw);
        self.converse_turn(session, prompt).await
    }

    /// Free-form question answering during the confirmation phase, with the
    /// same session history and the same degrade behavior.
    pub async fn answer_question(&self, session: &mut Session, question: &str) -> String {
        self.converse_turn(session, question.to_string()).await
    }

    async fn converse_turn(&self, session: &mut Session, prompt: String) -> String {
        if session.history.is_empty() {
            session.push_turn(ChatTurn::system(SYSTEM_INSTRUCTION));
        }

        match self.collaborator.converse(&session.history, &prompt).await {
            Ok(reply) => {
                session.push_turn(ChatTurn::user(prompt));
                session.push_turn(ChatTurn::assistant(reply.clone()));
                reply
            }
            Err(err) => {
                warn!(user = session.user, %err, "collaborator call failed");
                COLLABORATOR_APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use polisbot_core::{ChatRole, IntakeError};
    use std::sync::Mutex;

    /// Records prompts and replies with a canned answer.
    struct EchoCollaborator {
        prompts: Mutex<Vec<String>>,
    }

    impl EchoCollaborator {
        fn new() -> Arc<Self> {
            Arc::new(Self { prompts: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl Collaborator for EchoCollaborator {
        fn name(&self) -> &str {
            "echo"
        }
        async fn converse(
            &self,
            _history: &[ChatTurn],
            prompt: &str,
        ) -> Result<String, IntakeError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("структурований звіт".to_string())
        }
    }

    struct FailingCollaborator;

    #[async_trait]
    impl Collaborator for FailingCollaborator {
        fn name(&self) -> &str {
            "failing"
        }
        async fn converse(&self, _: &[ChatTurn], _: &str) -> Result<String, IntakeError> {
            Err(IntakeError::Collaborator {
                provider: "failing".into(),
                message: "quota exceeded".into(),
            })
        }
    }

    #[tokio::test]
    async fn accumulates_history_with_single_system_turn() {
        let collaborator = EchoCollaborator::new();
        let extractor = StructuredExtractor::new(collaborator);
        let mut session = Session::start(1);

        extractor.extract("паспорт текст", "техпаспорт текст", &mut session).await;
        extractor.answer_question(&mut session, "а що з ціною?").await;

        let system_turns = session
            .history
            .iter()
            .filter(|t| t.role == ChatRole::System)
            .count();
        assert_eq!(system_turns, 1);
        // system + 2 × (user, assistant)
        assert_eq!(session.history.len(), 5);
    }

    #[tokio::test]
    async fn mrz_fast_path_feeds_parsed_fields_into_prompt() {
        let collaborator = EchoCollaborator::new();
        let extractor = StructuredExtractor::new(collaborator.clone());
        let mut session = Session::start(1);

        let identity = "P<UKRPETRENKO<<IVAN<MYKOLAYOVYCH<<<<<<<<<<<<\n\
                        FE1234567<UKR9003122M2503145<<<<<<<<<<<<<<04";
        extractor.extract(identity, "Toyota Camry", &mut session).await;

        let prompts = collaborator.prompts.lock().unwrap();
        assert!(prompts[0].contains("PETRENKO IVAN MYKOLAYOVYCH"));
        assert!(prompts[0].contains("12.03.1990"));
        // The raw MRZ line itself should not leak into the prompt.
        assert!(!prompts[0].contains("P<UKR"));
    }

    #[tokio::test]
    async fn failure_degrades_to_apology_without_history_growth() {
        let extractor = StructuredExtractor::new(Arc::new(FailingCollaborator));
        let mut session = Session::start(1);

        let reply = extractor.extract("текст", "текст", &mut session).await;
        assert_eq!(reply, COLLABORATOR_APOLOGY);
        // Only the system turn was appended; no dangling user turn.
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].role, ChatRole::System);
    }
}
