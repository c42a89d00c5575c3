//! Typed records for every gateway collection.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase wire
//! names. Ids are generated client-side; `createdAt` is assigned by the
//! gateway, so drafts never carry it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use voxen_shared::types::{
    ChannelId, ChannelKind, FriendId, MemberId, MemberRole, MessageId, PresenceStatus, ProfileId,
    ServerId, UserId,
};

use crate::record::{NoPatch, Record};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A server (guild) grouping channels and members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub background_url: Option<String>,
    pub owner_id: UserId,
    /// Theme color triple, stored serialized (see `voxen_shared::theme`).
    pub theme_colors: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDraft {
    pub id: ServerId,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub owner_id: UserId,
    pub theme_colors: Option<String>,
}

/// Partial server update. Unset fields are left untouched; `Some(None)`
/// writes an explicit null.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_url: Option<Option<String>>,
}

impl Record for Server {
    const COLLECTION: &'static str = "servers";
    type Draft = ServerDraft;
    type Patch = ServerPatch;

    fn record_id(&self) -> Uuid {
        self.id.0
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// A text or voice channel within a server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: ChannelId,
    pub server_id: ServerId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    /// Display ordinal within the server. Never renumbered.
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDraft {
    pub id: ChannelId,
    pub server_id: ServerId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub position: u32,
}

impl Record for Channel {
    const COLLECTION: &'static str = "channels";
    type Draft = ChannelDraft;
    type Patch = NoPatch;

    fn record_id(&self) -> Uuid {
        self.id.0
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Kind of file attached to a message, derived from the MIME prefix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    File,
}

impl FileKind {
    /// Classify a MIME content type the way the chat renderer groups it.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            Self::Image
        } else if content_type.starts_with("video/") {
            Self::Video
        } else {
            Self::File
        }
    }
}

/// A channel message. Append-only from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_kind: Option<FileKind>,
    pub file_size: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_kind: Option<FileKind>,
    pub file_size: Option<u64>,
}

impl MessageDraft {
    /// Draft for a plain text message.
    pub fn text(channel_id: ChannelId, author_id: UserId, content: String) -> Self {
        Self {
            id: MessageId::new(),
            channel_id,
            author_id,
            content: Some(content),
            file_url: None,
            file_kind: None,
            file_size: None,
        }
    }
}

impl Record for Message {
    const COLLECTION: &'static str = "messages";
    type Draft = MessageDraft;
    type Patch = NoPatch;

    fn record_id(&self) -> Uuid {
        self.id.0
    }
}

// ---------------------------------------------------------------------------
// DirectMessage
// ---------------------------------------------------------------------------

/// A message between a user pair, outside any server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub content: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageDraft {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub content: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

impl DirectMessageDraft {
    pub fn text(sender_id: UserId, recipient_id: UserId, content: String) -> Self {
        Self {
            id: MessageId::new(),
            sender_id,
            recipient_id,
            content,
            file_url: None,
            file_name: None,
            file_size: None,
        }
    }
}

impl Record for DirectMessage {
    const COLLECTION: &'static str = "direct_messages";
    type Draft = DirectMessageDraft;
    type Patch = NoPatch;

    fn record_id(&self) -> Uuid {
        self.id.0
    }
}

// ---------------------------------------------------------------------------
// Friend
// ---------------------------------------------------------------------------

/// Status of a friend relationship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
}

/// A directional friend relationship. A visible friendship requires an
/// accepted row from requester to target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: FriendId,
    pub requester_id: UserId,
    pub target_id: UserId,
    pub status: FriendStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendDraft {
    pub id: FriendId,
    pub requester_id: UserId,
    pub target_id: UserId,
    pub status: FriendStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendPatch {
    pub status: FriendStatus,
}

impl Record for Friend {
    const COLLECTION: &'static str = "friends";
    type Draft = FriendDraft;
    type Patch = FriendPatch;

    fn record_id(&self) -> Uuid {
        self.id.0
    }
}

// ---------------------------------------------------------------------------
// ServerMember
// ---------------------------------------------------------------------------

/// Membership of one user in one server. One row per (server, user).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerMember {
    pub id: MemberId,
    pub server_id: ServerId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMemberDraft {
    pub id: MemberId,
    pub server_id: ServerId,
    pub user_id: UserId,
    pub role: MemberRole,
}

impl Record for ServerMember {
    const COLLECTION: &'static str = "serverMembers";
    type Draft = ServerMemberDraft;
    type Patch = NoPatch;

    fn record_id(&self) -> Uuid {
        self.id.0
    }
}

// ---------------------------------------------------------------------------
// UserProfile
// ---------------------------------------------------------------------------

/// Per-user display profile. Exactly one per user, created lazily.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub display_name: String,
    pub bio: Option<String>,
    pub status: PresenceStatus,
    pub avatar_url: Option<String>,
    pub background_url: Option<String>,
    /// Theme color triple, stored serialized (see `voxen_shared::theme`).
    pub theme_colors: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDraft {
    pub id: ProfileId,
    pub user_id: UserId,
    pub display_name: String,
    pub bio: Option<String>,
    pub status: PresenceStatus,
    pub avatar_url: Option<String>,
    pub background_url: Option<String>,
    pub theme_colors: Option<String>,
}

impl UserProfileDraft {
    /// The profile created on first load: display name only, online.
    pub fn initial(user_id: UserId, display_name: String) -> Self {
        Self {
            id: ProfileId::new(),
            user_id,
            display_name,
            bio: None,
            status: PresenceStatus::Online,
            avatar_url: None,
            background_url: None,
            theme_colors: None,
        }
    }
}

/// Partial profile update. Unset fields are left untouched; `Some(None)`
/// writes an explicit null.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PresenceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_colors: Option<String>,
}

impl Record for UserProfile {
    const COLLECTION: &'static str = "userProfiles";
    type Draft = UserProfileDraft;
    type Patch = UserProfilePatch;

    fn record_id(&self) -> Uuid {
        self.id.0
    }
}
