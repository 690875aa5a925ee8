pub mod chat;
pub mod error;
pub mod event;
pub mod session;
pub mod traits;

pub use chat::{ChatRole, ChatTurn};
pub use error::IntakeError;
pub use event::{EventKind, InboundEvent};
pub use session::{DialogueState, DocumentSlots, Session, UserId, MAX_HISTORY_TURNS};
pub use traits::{Collaborator, RecognitionEngine, RecognitionOutcome, ReplySink};
