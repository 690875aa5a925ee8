use std::path::PathBuf;

use crate::session::UserId;

/// Payload of an inbound transport event.
///
/// The transport adapter reduces every update to one of these three kinds;
/// the session machine never sees channel-specific framing.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// A document photo, already downloaded to local storage.
    Image(PathBuf),
    /// A plain-text user message.
    Text(String),
    /// Any other media kind (audio, sticker, video, ...).
    Other,
}

/// One inbound event for one user.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub user: UserId,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn image(user: UserId, path: impl Into<PathBuf>) -> Self {
        Self { user, kind: EventKind::Image(path.into()) }
    }

    pub fn text(user: UserId, text: impl Into<String>) -> Self {
        Self { user, kind: EventKind::Text(text.into()) }
    }

    pub fn other(user: UserId) -> Self {
        Self { user, kind: EventKind::Other }
    }
}
