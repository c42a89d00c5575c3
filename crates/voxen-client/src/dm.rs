//! The direct-message pane.
//!
//! Same reconciliation shape as the channel pane, specialised to a user
//! pair: the fetch matches both orderings of (sender, recipient), and
//! appended entries carry the locally-known sender display fields the
//! gateway does not store.

use std::sync::Arc;

use tracing::info;

use voxen_gateway::{
    AuthUser, DirectMessage, DirectMessageDraft, Direction, Filter, Gateway, ListQuery,
    ProgressFn, UploadFile, UploadOptions,
};
use voxen_shared::types::UserId;

use crate::error::ClientError;
use crate::notify::{reject, surface, Notifier};
use crate::session::Session;
use crate::sync::SyncedList;
use crate::upload::UploadSlot;

/// One visible DM entry: the record plus display-only sender fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DmEntry {
    pub message: DirectMessage,
    pub sender_name: String,
    pub sender_avatar: Option<String>,
}

/// One open DM conversation.
pub struct DmPane<G> {
    gateway: Arc<G>,
    notices: Notifier,
    user: AuthUser,
    my_name: String,
    my_avatar: Option<String>,
    friend_id: UserId,
    friend_name: String,
    entries: SyncedList<DmEntry>,
    draft: String,
}

impl<G: Gateway> DmPane<G> {
    /// Open the conversation with one friend and fetch its history.
    pub async fn open(session: &Session<G>, friend_id: UserId, friend_name: String) -> Self {
        let (my_name, my_avatar) = match session.profile() {
            Some(profile) => (profile.display_name.clone(), profile.avatar_url.clone()),
            None => (session.user().display_handle(), None),
        };

        let mut pane = Self {
            gateway: session.gateway().clone(),
            notices: session.notices().clone(),
            user: session.user().clone(),
            my_name,
            my_avatar,
            friend_id,
            friend_name,
            entries: SyncedList::new(),
            draft: String::new(),
        };
        let _ = pane.refresh().await;
        pane
    }

    pub fn friend_name(&self) -> &str {
        &self.friend_name
    }

    pub fn entries(&self) -> &[DmEntry] {
        self.entries.items()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Replace the visible conversation with the authoritative history,
    /// oldest first. Both directions of the pair are matched.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let me = self.user.id.as_str();
        let friend = self.friend_id.as_str();

        let filter = Filter::or([
            Filter::and([
                Filter::eq("senderId", me),
                Filter::eq("recipientId", friend),
            ]),
            Filter::and([
                Filter::eq("senderId", friend),
                Filter::eq("recipientId", me),
            ]),
        ]);

        let fetched: Vec<DirectMessage> = self
            .gateway
            .list(
                ListQuery::new()
                    .filter(filter)
                    .order_by("createdAt", Direction::Asc),
            )
            .await
            .map_err(|e| surface(&self.notices, "Failed to load messages", e))?;

        let entries = fetched.into_iter().map(|m| self.entry_for(m)).collect();
        self.entries.replace(entries);
        Ok(())
    }

    /// Send the current draft to the friend.
    pub async fn send(&mut self) -> Result<(), ClientError> {
        let content = self.draft.trim().to_string();
        if content.is_empty() {
            return Ok(());
        }

        let draft =
            DirectMessageDraft::text(self.user.id.clone(), self.friend_id.clone(), content);
        let message = self
            .gateway
            .create::<DirectMessage>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Failed to send message", e))?;

        info!(message = %message.id, friend = %self.friend_id, "direct message sent");
        let entry = self.entry_for(message);
        self.entries.push(entry);
        self.draft.clear();
        Ok(())
    }

    /// Upload a file and send the message sharing it.
    pub async fn share_file(
        &mut self,
        file: UploadFile,
        on_progress: Option<ProgressFn>,
    ) -> Result<(), ClientError> {
        UploadSlot::Attachment
            .validate(&file)
            .map_err(|v| reject(&self.notices, v.title, v.detail))?;

        let file_name = file.file_name.clone();
        let file_size = file.size() as u64;

        let path = format!("dm-files/{file_name}");
        let opts = UploadOptions {
            upsert: true,
            on_progress,
        };
        let url = self
            .gateway
            .upload(file, &path, opts)
            .await
            .map_err(|e| surface(&self.notices, "Upload failed", e))?;

        let draft = DirectMessageDraft {
            content: format!("Shared a file: {file_name}"),
            file_url: Some(url.public_url),
            file_name: Some(file_name),
            file_size: Some(file_size),
            ..DirectMessageDraft::text(self.user.id.clone(), self.friend_id.clone(), String::new())
        };
        let message = self
            .gateway
            .create::<DirectMessage>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Upload failed", e))?;

        let entry = self.entry_for(message);
        self.entries.push(entry);
        Ok(())
    }

    fn entry_for(&self, message: DirectMessage) -> DmEntry {
        let (sender_name, sender_avatar) = if message.sender_id == self.user.id {
            (self.my_name.clone(), self.my_avatar.clone())
        } else {
            (self.friend_name.clone(), None)
        };
        DmEntry {
            message,
            sender_name,
            sender_avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{signed_in, upload_file};
    use chrono::{DateTime, Utc};
    use voxen_shared::types::MessageId;

    fn seeded_dm(
        sender: &str,
        recipient: &str,
        content: &str,
        at: &str,
    ) -> DirectMessage {
        DirectMessage {
            id: MessageId::new(),
            sender_id: UserId::from(sender),
            recipient_id: UserId::from(recipient),
            content: content.to_string(),
            file_url: None,
            file_name: None,
            file_size: None,
            created_at: at.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[tokio::test]
    async fn fetch_matches_both_directions_oldest_first() {
        let (gateway, mut session) = signed_in();
        session.ensure_profile().await.unwrap();

        gateway.insert_record(&seeded_dm(
            "user_bob",
            "user_alice",
            "hey",
            "2024-03-01T10:00:00Z",
        ));
        gateway.insert_record(&seeded_dm(
            "user_alice",
            "user_bob",
            "hi bob",
            "2024-03-01T10:01:00Z",
        ));
        // Unrelated conversation stays invisible.
        gateway.insert_record(&seeded_dm(
            "user_bob",
            "user_carol",
            "psst",
            "2024-03-01T10:02:00Z",
        ));

        let pane = DmPane::open(&session, UserId::from("user_bob"), "Bob".to_string()).await;

        let entries = pane.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message.content, "hey");
        assert_eq!(entries[0].sender_name, "Bob");
        assert_eq!(entries[1].message.content, "hi bob");
        assert_eq!(entries[1].sender_name, "alice");
    }

    #[tokio::test]
    async fn sending_appends_with_local_display_fields() {
        let (gateway, mut session) = signed_in();
        session.ensure_profile().await.unwrap();

        let mut pane =
            DmPane::open(&session, UserId::from("user_bob"), "Bob".to_string()).await;
        pane.set_draft("  see you at 5  ");
        pane.send().await.unwrap();

        assert_eq!(pane.entries().len(), 1);
        let entry = &pane.entries()[0];
        assert_eq!(entry.message.content, "see you at 5");
        assert_eq!(entry.sender_name, "alice");
        assert_eq!(pane.draft(), "");
        assert_eq!(gateway.collection_len("direct_messages"), 1);
    }

    #[tokio::test]
    async fn sharing_a_file_uploads_then_appends() {
        let (gateway, mut session) = signed_in();
        session.ensure_profile().await.unwrap();

        let mut pane =
            DmPane::open(&session, UserId::from("user_bob"), "Bob".to_string()).await;
        pane.share_file(upload_file("notes.pdf", "application/pdf", 128), None)
            .await
            .unwrap();

        let entry = &pane.entries()[0];
        assert_eq!(entry.message.content, "Shared a file: notes.pdf");
        assert_eq!(entry.message.file_name.as_deref(), Some("notes.pdf"));
        assert_eq!(entry.message.file_size, Some(128));
        assert_eq!(gateway.uploads()[0].path, "dm-files/notes.pdf");
    }

    #[tokio::test]
    async fn failed_send_leaves_the_conversation_untouched() {
        let (gateway, mut session) = signed_in();
        session.ensure_profile().await.unwrap();

        let mut pane =
            DmPane::open(&session, UserId::from("user_bob"), "Bob".to_string()).await;
        pane.set_draft("lost");
        gateway.fail_next_create();

        assert!(pane.send().await.is_err());
        assert!(pane.entries().is_empty());
        assert_eq!(pane.draft(), "lost");
    }
}
