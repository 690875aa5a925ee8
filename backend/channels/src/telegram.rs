//! Telegram transport adapter.
//!
//! Reduces every Telegram update to one of the three core event kinds
//! (image / text / other) and implements the outbound `ReplySink`. Photos
//! are downloaded to counter-named files before the machine ever sees them;
//! no Telegram framing crosses this boundary.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::{error, info};

use polisbot_core::{InboundEvent, IntakeError, ReplySink, UserId};
use polisbot_session::IntakeMachine;

const START_COMMAND: &str = "/start";

pub struct TelegramAdapter {
    bot: Bot,
    media_dir: PathBuf,
    photo_counter: AtomicU64,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            bot: Bot::new(token.into()),
            media_dir: media_dir.into(),
            photo_counter: AtomicU64::new(0),
        }
    }

    /// Run the long-polling dispatcher until shutdown.
    pub async fn run(self: Arc<Self>, machine: Arc<IntakeMachine>) -> Result<()> {
        info!("starting Telegram adapter");

        let bot = self.bot.clone();
        let handler = Update::filter_message().endpoint(
            |msg: Message, machine: Arc<IntakeMachine>, adapter: Arc<TelegramAdapter>| async move {
                if let Err(err) = adapter.dispatch_message(&machine, &msg).await {
                    error!(chat = msg.chat.id.0, %err, "failed to handle update");
                }
                respond(())
            },
        );

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![machine, self.clone()])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }

    /// Map one inbound message to a core event and hand it to the machine.
    async fn dispatch_message(&self, machine: &IntakeMachine, msg: &Message) -> Result<()> {
        let user: UserId = msg.chat.id.0;

        if let Some(text) = msg.text() {
            if text.trim() == START_COMMAND {
                machine.start_session(user).await?;
            } else {
                machine.handle_event(InboundEvent::text(user, text)).await?;
            }
        } else if let Some(sizes) = msg.photo() {
            // Telegram sends several resolutions; the last one is largest.
            let Some(photo) = sizes.last() else {
                machine.handle_event(InboundEvent::other(user)).await?;
                return Ok(());
            };
            let path = self.download_photo(&photo.file.id).await?;
            machine.handle_event(InboundEvent::image(user, path)).await?;
        } else {
            machine.handle_event(InboundEvent::other(user)).await?;
        }
        Ok(())
    }

    /// Persist photo bytes to a counter-named local path before recognition.
    async fn download_photo(&self, file_id: &str) -> Result<PathBuf> {
        let file = self
            .bot
            .get_file(file_id)
            .await
            .context("fetching Telegram file metadata")?;

        let n = self.photo_counter.fetch_add(1, Ordering::SeqCst);
        let path = self.media_dir.join(format!("doc_{n}.jpg"));

        tokio::fs::create_dir_all(&self.media_dir)
            .await
            .with_context(|| format!("creating {}", self.media_dir.display()))?;
        let mut dst = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("creating {}", path.display()))?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .context("downloading Telegram photo")?;

        info!(file_id, path = %path.display(), "photo downloaded");
        Ok(path)
    }
}

#[async_trait]
impl ReplySink for TelegramAdapter {
    async fn send_text(&self, user: UserId, text: &str) -> Result<(), IntakeError> {
        self.bot
            .send_message(ChatId(user), text)
            .await
            .map_err(|e| IntakeError::Other(e.into()))?;
        Ok(())
    }

    async fn send_document(
        &self,
        user: UserId,
        path: &Path,
        caption: &str,
    ) -> Result<(), IntakeError> {
        self.bot
            .send_document(ChatId(user), InputFile::file(path.to_path_buf()))
            .caption(caption.to_string())
            .await
            .map_err(|e| IntakeError::Other(e.into()))?;
        Ok(())
    }
}
