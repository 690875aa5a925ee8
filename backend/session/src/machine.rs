//! The document intake and verification state machine.
//!
//! One inbound event per user is handled to completion before the next; the
//! machine mutates the session through the injected store and emits every
//! reply through the `ReplySink` seam, so no transport detail lives here.
//!
//! Dialogue flow: greet → identity photo → vehicle photo → synchronous
//! recognition/normalization/extraction → confirmation gate → fixed-price
//! gate → artifact delivery. Rejection at the confirmation gate discards the
//! documents and restarts the intake; rejection at the price gate re-asks,
//! since the premium is fixed and non-negotiable.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use polisbot_core::{
    DialogueState, EventKind, InboundEvent, IntakeError, RecognitionEngine, ReplySink, Session,
    UserId,
};
use polisbot_extractor::StructuredExtractor;
use polisbot_normalize::{clean_text, normalize_vehicle_line, KNOWN_MAKES, KNOWN_REGIONS};
use polisbot_policy::PolicyGenerator;

use crate::store::SessionStore;

const AFFIRMATIVE: &str = "так";
const NEGATIVE: &str = "ні";

mod msg {
    pub const GREETING: &str = "Привіт! Я бот, який допоможе тобі з оформленням автостраховки 🚗📄.\n\
        Надішли мені фото свого паспорта, а потім фото техпаспорта авто — і я все зроблю!";
    pub const START_FIRST: &str = "Щоб почати оформлення, надішли команду /start.";
    pub const IDENTITY_RECEIVED: &str =
        "Паспорт отримав ✅. Тепер надішли, будь ласка, фото техпаспорта авто.";
    pub const EXTRACTING: &str = "Дякую! Хвилинку, розпізнаю документи 🔍";
    pub const CONFIRM_PROMPT: &str = "Перевір, будь ласка, дані вище. Все вірно? (так / ні)";
    pub const RESTART_AFTER_REJECT: &str =
        "Добре, почнемо спочатку. Надішли, будь ласка, фото паспорта ще раз.";
    pub const PRICE_FIXED_REPEAT: &str = "Вартість поліса фіксована і не підлягає зміні.";
    pub const POLICY_CAPTION: &str = "Твій страховий поліс 📄";
    pub const POLICY_DONE: &str = "Готово! Поліс оформлено ✅. Гарної дороги!";
    pub const PHOTO_NOT_EXPECTED: &str =
        "Фото зараз не потрібне. Відповідай, будь ласка, на попереднє питання.";
    pub const AWAITING_PHOTO: &str =
        "Зараз я чекаю на фото документа — надішли його, будь ласка, зображенням.";
    pub const UNSUPPORTED_MEDIA: &str =
        "Я працюю лише з фото документів і текстовими повідомленнями 🙂";
}

/// Drives the per-user intake dialogue over injected collaborators.
pub struct IntakeMachine {
    store: Arc<dyn SessionStore>,
    engine: Arc<dyn RecognitionEngine>,
    extractor: StructuredExtractor,
    generator: PolicyGenerator,
    sink: Arc<dyn ReplySink>,
    identity_lang: String,
    vehicle_lang: String,
    premium_text: String,
}

impl IntakeMachine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        engine: Arc<dyn RecognitionEngine>,
        extractor: StructuredExtractor,
        generator: PolicyGenerator,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            store,
            engine,
            extractor,
            generator,
            sink,
            identity_lang: "ukr+eng".to_string(),
            vehicle_lang: "ukr+eng".to_string(),
            premium_text: polisbot_policy::DEFAULT_PREMIUM.to_string(),
        }
    }

    pub fn with_languages(
        mut self,
        identity: impl Into<String>,
        vehicle: impl Into<String>,
    ) -> Self {
        self.identity_lang = identity.into();
        self.vehicle_lang = vehicle.into();
        self
    }

    pub fn with_premium_text(mut self, premium: impl Into<String>) -> Self {
        self.premium_text = premium.into();
        self
    }

    fn premium_prompt(&self) -> String {
        format!(
            "Чудово! Вартість поліса — {}. Оформлюємо? (так / ні)",
            self.premium_text
        )
    }

    /// Explicit session start (the `/start` command). Restarting at any
    /// point recreates the session and discards prior documents.
    #[instrument(skip(self))]
    pub async fn start_session(&self, user: UserId) -> Result<(), IntakeError> {
        let mut session = Session::start(user);
        session.dialogue_state = DialogueState::AwaitingIdentityPhoto;
        self.store.create(session).await?;
        info!(user, "session started");
        self.sink.send_text(user, msg::GREETING).await
    }

    /// Handle one inbound event to completion. A missing session means the
    /// user never started: everything is answered with a start prompt or a
    /// media guidance, and no session is created implicitly.
    #[instrument(skip(self, event), fields(user = event.user))]
    pub async fn handle_event(&self, event: InboundEvent) -> Result<(), IntakeError> {
        let Some(session) = self.store.get(event.user).await? else {
            let text = if matches!(event.kind, EventKind::Other) {
                msg::UNSUPPORTED_MEDIA
            } else {
                msg::START_FIRST
            };
            return self.sink.send_text(event.user, text).await;
        };

        match event.kind {
            EventKind::Image(path) => self.handle_image(session, path).await,
            EventKind::Text(text) => self.handle_text(session, text).await,
            EventKind::Other => self.sink.send_text(event.user, msg::UNSUPPORTED_MEDIA).await,
        }
    }

    async fn handle_image(&self, mut session: Session, path: PathBuf) -> Result<(), IntakeError> {
        let user = session.user;
        match session.dialogue_state {
            DialogueState::AwaitingIdentityPhoto => {
                session.documents.identity_image = Some(path);
                session.dialogue_state = DialogueState::AwaitingVehiclePhoto;
                self.store.update(session).await?;
                self.sink.send_text(user, msg::IDENTITY_RECEIVED).await
            }
            DialogueState::AwaitingVehiclePhoto => {
                // Ordering invariant: the machine never reaches this state
                // without an identity image in place.
                debug_assert!(session.documents.ready_for_vehicle());
                session.documents.vehicle_image = Some(path);
                session.dialogue_state = DialogueState::Extracting;
                self.store.update(session.clone()).await?;
                self.run_extraction(session).await
            }
            DialogueState::New => self.sink.send_text(user, msg::START_FIRST).await,
            _ => self.sink.send_text(user, msg::PHOTO_NOT_EXPECTED).await,
        }
    }

    /// Recognize both stored images, normalize the vehicle text, and present
    /// the structured report. Recognition failures stay visible inside the
    /// report text; they never abort the dialogue.
    async fn run_extraction(&self, mut session: Session) -> Result<(), IntakeError> {
        let user = session.user;
        let identity_path = session.documents.identity_image.clone().ok_or_else(|| {
            IntakeError::Protocol("identity image missing at extraction".into())
        })?;
        let vehicle_path = session.documents.vehicle_image.clone().ok_or_else(|| {
            IntakeError::Protocol("vehicle image missing at extraction".into())
        })?;

        self.sink.send_text(user, msg::EXTRACTING).await?;

        let identity = self.engine.recognize(&identity_path, &self.identity_lang).await;
        let vehicle = self.engine.recognize(&vehicle_path, &self.vehicle_lang).await;
        if identity.failed || vehicle.failed {
            warn!(
                user,
                identity_failed = identity.failed,
                vehicle_failed = vehicle.failed,
                "recognition reported failure; proceeding with returned text"
            );
        }

        let vehicle_text = clean_text(&vehicle.text)
            .lines()
            .map(|line| normalize_vehicle_line(line, KNOWN_MAKES, KNOWN_REGIONS))
            .collect::<Vec<_>>()
            .join("\n");

        session.documents.identity_text = Some(identity.text.clone());
        session.documents.vehicle_text = Some(vehicle_text.clone());

        let report = self.extractor.extract(&identity.text, &vehicle_text, &mut session).await;

        session.dialogue_state = DialogueState::AwaitingConfirmation;
        self.store.update(session).await?;

        self.sink
            .send_text(user, &format!("{report}\n\n{}", msg::CONFIRM_PROMPT))
            .await
    }

    async fn handle_text(&self, session: Session, text: String) -> Result<(), IntakeError> {
        let user = session.user;
        let reply = text.trim().to_lowercase();

        match session.dialogue_state {
            DialogueState::AwaitingConfirmation => match reply.as_str() {
                AFFIRMATIVE => self.accept_report(session).await,
                NEGATIVE => self.reject_report(session).await,
                _ => {
                    self.answer_freeform(session, &text, Some(msg::CONFIRM_PROMPT.to_string()))
                        .await
                }
            },
            DialogueState::AwaitingPriceAcceptance => match reply.as_str() {
                AFFIRMATIVE => self.issue_policy(session).await,
                NEGATIVE => {
                    let text = format!("{} {}", msg::PRICE_FIXED_REPEAT, self.premium_prompt());
                    self.sink.send_text(user, &text).await
                }
                _ => {
                    let gate = self.premium_prompt();
                    self.answer_freeform(session, &text, Some(gate)).await
                }
            },
            DialogueState::Done => self.answer_freeform(session, &text, None).await,
            DialogueState::New => self.sink.send_text(user, msg::START_FIRST).await,
            DialogueState::AwaitingIdentityPhoto
            | DialogueState::AwaitingVehiclePhoto
            | DialogueState::Extracting => self.sink.send_text(user, msg::AWAITING_PHOTO).await,
        }
    }

    async fn accept_report(&self, mut session: Session) -> Result<(), IntakeError> {
        let user = session.user;
        session.dialogue_state = DialogueState::AwaitingPriceAcceptance;
        self.store.update(session).await?;
        info!(user, "report confirmed");
        self.sink.send_text(user, &self.premium_prompt()).await
    }

    async fn reject_report(&self, mut session: Session) -> Result<(), IntakeError> {
        let user = session.user;
        session.reset_intake();
        self.store.update(session).await?;
        info!(user, "report rejected, intake restarted");
        self.sink.send_text(user, msg::RESTART_AFTER_REJECT).await
    }

    async fn issue_policy(&self, mut session: Session) -> Result<(), IntakeError> {
        let user = session.user;
        let identity_text = session.documents.identity_text.clone().unwrap_or_default();
        let vehicle_text = session.documents.vehicle_text.clone().unwrap_or_default();

        let path = self
            .generator
            .generate(user, &identity_text, &vehicle_text)
            .await
            .map_err(|e| IntakeError::Storage(e.to_string()))?;

        session.dialogue_state = DialogueState::Done;
        self.store.update(session).await?;
        info!(user, "policy issued");

        self.sink.send_document(user, &path, msg::POLICY_CAPTION).await?;
        self.sink.send_text(user, msg::POLICY_DONE).await
    }

    /// Collaborator fallback for input that is not a recognized yes/no
    /// token. When a gate is pending, its prompt is re-emitted after the
    /// answer so the user always sees the next step.
    async fn answer_freeform(
        &self,
        mut session: Session,
        question: &str,
        pending_gate: Option<String>,
    ) -> Result<(), IntakeError> {
        let user = session.user;
        let answer = self.extractor.answer_question(&mut session, question).await;
        self.store.update(session).await?;
        self.sink.send_text(user, &answer).await?;
        if let Some(gate) = pending_gate {
            self.sink.send_text(user, &gate).await?;
        }
        Ok(())
    }
}
