//! Per-user session state for the document intake dialogue.
//!
//! One `Session` aggregate holds everything the dialogue needs for a user:
//! document slots, the dialogue state, and the collaborator history. Keeping
//! these together (instead of parallel maps keyed by the same id) makes it
//! impossible for them to drift out of sync.

use std::path::PathBuf;

use crate::chat::{ChatRole, ChatTurn};

/// Stable per-user key. Telegram chat ids fit here directly.
pub type UserId = i64;

/// Cap on collaborator history length per session. When exceeded, the oldest
/// non-system turns are dropped.
pub const MAX_HISTORY_TURNS: usize = 40;

/// Where the dialogue currently is for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    New,
    AwaitingIdentityPhoto,
    AwaitingVehiclePhoto,
    Extracting,
    AwaitingConfirmation,
    AwaitingPriceAcceptance,
    Done,
}

/// Document images and their recognized texts for one session.
#[derive(Debug, Clone, Default)]
pub struct DocumentSlots {
    pub identity_image: Option<PathBuf>,
    pub vehicle_image: Option<PathBuf>,
    pub identity_text: Option<String>,
    pub vehicle_text: Option<String>,
}

impl DocumentSlots {
    /// The vehicle slot may only be filled after the identity slot.
    pub fn ready_for_vehicle(&self) -> bool {
        self.identity_image.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Full per-user conversational and document state.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserId,
    pub documents: DocumentSlots,
    pub dialogue_state: DialogueState,
    pub history: Vec<ChatTurn>,
}

impl Session {
    /// A session only exists after an explicit start; there is no implicit
    /// creation on first message. It begins in `New` until the machine has
    /// greeted the user and asked for the first document.
    pub fn start(user: UserId) -> Self {
        Self {
            user,
            documents: DocumentSlots::default(),
            dialogue_state: DialogueState::New,
            history: Vec::new(),
        }
    }

    /// Discard stored documents and return to the start of the intake phase.
    /// Collaborator history is also dropped so a restarted dialogue does not
    /// inherit stale document context.
    pub fn reset_intake(&mut self) {
        self.documents.clear();
        self.history.clear();
        self.dialogue_state = DialogueState::AwaitingIdentityPhoto;
    }

    /// Append a turn, enforcing the history cap. The system turn (if any) is
    /// always retained; the oldest user/assistant turns go first.
    pub fn push_turn(&mut self, turn: ChatTurn) {
        self.history.push(turn);
        while self.history.len() > MAX_HISTORY_TURNS {
            let drop_at = self
                .history
                .iter()
                .position(|t| t.role != ChatRole::System)
                .unwrap_or(0);
            self.history.remove(drop_at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_cap_keeps_system_turn() {
        let mut session = Session::start(7);
        session.push_turn(ChatTurn::system("instructions"));
        for i in 0..(MAX_HISTORY_TURNS * 2) {
            session.push_turn(ChatTurn::user(format!("q{i}")));
            session.push_turn(ChatTurn::assistant(format!("a{i}")));
        }
        assert_eq!(session.history.len(), MAX_HISTORY_TURNS);
        assert_eq!(session.history[0].role, ChatRole::System);
    }

    #[test]
    fn reset_intake_discards_documents_and_history() {
        let mut session = Session::start(7);
        session.documents.identity_image = Some("a.jpg".into());
        session.documents.identity_text = Some("text".into());
        session.push_turn(ChatTurn::user("hello"));
        session.dialogue_state = DialogueState::AwaitingConfirmation;

        session.reset_intake();
        assert!(session.documents.identity_image.is_none());
        assert!(session.documents.identity_text.is_none());
        assert!(session.history.is_empty());
        assert_eq!(session.dialogue_state, DialogueState::AwaitingIdentityPhoto);
    }
}
