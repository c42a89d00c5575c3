//! The channel chat pane.
//!
//! Fetch-on-open, optimistic append on send, wholesale replace on re-open.
//! Nothing is merged: re-opening the pane (switching channels and back)
//! discards whatever was shown and trusts the gateway's order.

use std::sync::Arc;

use tracing::info;

use voxen_gateway::{
    AuthUser, Channel, Direction, FileKind, Filter, Gateway, ListQuery, Message, MessageDraft,
    ProgressFn, UploadFile, UploadOptions,
};
use voxen_shared::constants::MESSAGE_PAGE_LIMIT;

use crate::error::ClientError;
use crate::notify::{reject, surface, Notifier};
use crate::session::Session;
use crate::sync::SyncedList;
use crate::upload::UploadSlot;

/// One open channel's message view.
pub struct ChannelPane<G> {
    gateway: Arc<G>,
    notices: Notifier,
    user: AuthUser,
    channel: Channel,
    messages: SyncedList<Message>,
    draft: String,
}

impl<G: Gateway> ChannelPane<G> {
    /// Open a channel: fetch its recent messages. A failed fetch surfaces a
    /// notice and leaves the pane empty but usable.
    pub async fn open(session: &Session<G>, channel: Channel) -> Self {
        let mut pane = Self {
            gateway: session.gateway().clone(),
            notices: session.notices().clone(),
            user: session.user().clone(),
            channel,
            messages: SyncedList::new(),
            draft: String::new(),
        };
        let _ = pane.refresh().await;
        pane
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.items()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Replace the visible list with the authoritative recent page.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let fetched: Vec<Message> = self
            .gateway
            .list(
                ListQuery::new()
                    .filter(Filter::eq("channelId", self.channel.id.to_string()))
                    .order_by("createdAt", Direction::Asc)
                    .limit(MESSAGE_PAGE_LIMIT),
            )
            .await
            .map_err(|e| surface(&self.notices, "Failed to load messages", e))?;

        self.messages.replace(fetched);
        Ok(())
    }

    /// Send the current draft. Whitespace-only input is a silent no-op; on
    /// success the confirmed record is appended and the draft cleared. On
    /// failure the list and the draft are left untouched.
    pub async fn send(&mut self) -> Result<(), ClientError> {
        let content = self.draft.trim().to_string();
        if content.is_empty() {
            return Ok(());
        }

        let draft = MessageDraft::text(self.channel.id, self.user.id.clone(), content);
        let message = self
            .gateway
            .create::<Message>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Failed to send message", e))?;

        info!(message = %message.id, channel = %self.channel.id, "message sent");
        self.messages.push(message);
        self.draft.clear();
        Ok(())
    }

    /// Upload a file into the channel and send the message carrying it.
    pub async fn attach(
        &mut self,
        file: UploadFile,
        on_progress: Option<ProgressFn>,
    ) -> Result<(), ClientError> {
        UploadSlot::Attachment
            .validate(&file)
            .map_err(|v| reject(&self.notices, v.title, v.detail))?;

        let file_name = file.file_name.clone();
        let file_size = file.size() as u64;
        let file_kind = FileKind::from_content_type(&file.content_type);

        let path = format!("uploads/{}/{}", self.channel.id, file_name);
        let opts = UploadOptions {
            upsert: true,
            on_progress,
        };
        let url = self
            .gateway
            .upload(file, &path, opts)
            .await
            .map_err(|e| surface(&self.notices, "Upload failed", e))?;

        let draft = MessageDraft {
            content: Some(format!("Uploaded {file_name}")),
            file_url: Some(url.public_url),
            file_kind: Some(file_kind),
            file_size: Some(file_size),
            ..MessageDraft::text(self.channel.id, self.user.id.clone(), String::new())
        };
        let message = self
            .gateway
            .create::<Message>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Upload failed", e))?;

        self.messages.push(message);
        self.notices.info(
            "File uploaded",
            format!("{file_name} has been uploaded successfully"),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use crate::testutil::{signed_in, upload_file};
    use voxen_shared::types::UserId;

    async fn open_general(
        session: &mut Session<voxen_gateway::MemoryGateway>,
    ) -> (AppState, ChannelPane<voxen_gateway::MemoryGateway>) {
        let mut state = AppState::new();
        session.bootstrap(&mut state).await;
        let channel = state.channels[0].clone();
        let pane = ChannelPane::open(session, channel).await;
        (state, pane)
    }

    #[tokio::test]
    async fn sending_appends_one_entry_and_clears_the_draft() {
        let (_gateway, mut session) = signed_in();
        let (_state, mut pane) = open_general(&mut session).await;

        pane.set_draft("  hello there  ");
        pane.send().await.unwrap();

        assert_eq!(pane.messages().len(), 1);
        assert_eq!(pane.messages()[0].content.as_deref(), Some("hello there"));
        assert_eq!(pane.messages()[0].author_id, session.user().id);
        assert_eq!(pane.draft(), "");
    }

    #[tokio::test]
    async fn whitespace_only_send_is_a_silent_noop() {
        let (gateway, mut session) = signed_in();
        let (_state, mut pane) = open_general(&mut session).await;

        pane.set_draft("   \n\t ");
        pane.send().await.unwrap();

        assert!(pane.messages().is_empty());
        assert_eq!(gateway.collection_len("messages"), 0);
    }

    #[tokio::test]
    async fn failed_create_leaves_list_and_draft_untouched() {
        let (gateway, mut session) = signed_in();
        let (_state, mut pane) = open_general(&mut session).await;

        pane.set_draft("doomed");
        gateway.fail_next_create();
        let result = pane.send().await;

        assert!(matches!(result, Err(ClientError::Gateway(_))));
        assert!(pane.messages().is_empty());
        assert_eq!(pane.draft(), "doomed");
        assert_eq!(gateway.collection_len("messages"), 0);
    }

    #[tokio::test]
    async fn reopening_refetches_instead_of_reusing_the_cache() {
        let (gateway, mut session) = signed_in();
        let (_state, mut pane) = open_general(&mut session).await;
        let channel = pane.channel().clone();

        pane.set_draft("first");
        pane.send().await.unwrap();

        // Someone else writes to the channel behind this pane's back.
        let foreign = gateway
            .create::<Message>(MessageDraft::text(
                channel.id,
                UserId::from("user_bob"),
                "hi from bob".to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(pane.messages().len(), 1);

        // Switching away and back re-opens the pane.
        let pane = ChannelPane::open(&session, channel).await;
        assert_eq!(pane.messages().len(), 2);
        assert_eq!(pane.messages()[1].id, foreign.id);
    }

    #[tokio::test]
    async fn attaching_uploads_then_sends_the_file_message() {
        let (gateway, mut session) = signed_in();
        let (_state, mut pane) = open_general(&mut session).await;

        pane.attach(upload_file("clip.mp4", "video/mp4", 2048), None)
            .await
            .unwrap();

        assert_eq!(pane.messages().len(), 1);
        let message = &pane.messages()[0];
        assert_eq!(message.content.as_deref(), Some("Uploaded clip.mp4"));
        assert_eq!(message.file_kind, Some(FileKind::Video));
        assert_eq!(message.file_size, Some(2048));
        assert!(message
            .file_url
            .as_deref()
            .unwrap()
            .ends_with("clip.mp4"));

        let uploads = gateway.uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].path.starts_with("uploads/"));
    }

    #[tokio::test]
    async fn upload_success_but_create_failure_orphans_the_blob() {
        let (gateway, mut session) = signed_in();
        let (_state, mut pane) = open_general(&mut session).await;

        gateway.fail_next_create();
        let result = pane
            .attach(upload_file("doc.pdf", "application/pdf", 64), None)
            .await;

        assert!(matches!(result, Err(ClientError::Gateway(_))));
        // The blob landed but no message references it, and the list shows
        // no ghost entry.
        assert_eq!(gateway.uploads().len(), 1);
        assert!(pane.messages().is_empty());
        assert_eq!(gateway.collection_len("messages"), 0);
    }
}
