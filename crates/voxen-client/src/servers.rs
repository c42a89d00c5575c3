//! Server directory operations: creating servers, editing their settings,
//! adding channels.

use std::sync::Arc;

use tracing::info;

use voxen_gateway::{
    AuthUser, Channel, ChannelDraft, Gateway, GatewayError, ProgressFn, Server, ServerDraft,
    ServerMember, ServerMemberDraft, ServerPatch, UploadFile, UploadOptions,
};
use voxen_shared::constants::{DEFAULT_TEXT_CHANNEL, DEFAULT_VOICE_CHANNEL};
use voxen_shared::theme::ThemeColors;
use voxen_shared::types::{ChannelId, ChannelKind, MemberId, MemberRole, ServerId};

use crate::error::ClientError;
use crate::notify::{reject, surface, Notifier};
use crate::session::Session;
use crate::upload::{report, ProgressRange, UploadSlot};

/// Server create/update operations for one session.
pub struct ServerDirectory<G> {
    gateway: Arc<G>,
    notices: Notifier,
    user: AuthUser,
}

impl<G: Gateway> ServerDirectory<G> {
    pub fn new(session: &Session<G>) -> Self {
        Self {
            gateway: session.gateway().clone(),
            notices: session.notices().clone(),
            user: session.user().clone(),
        }
    }

    /// Create a server owned by the current user, with the two default
    /// channels. An optional icon is uploaded first, its transfer mapped
    /// into the 25–75 window of the overall progress.
    pub async fn create_server(
        &self,
        name: &str,
        description: &str,
        icon: Option<UploadFile>,
        on_progress: Option<ProgressFn>,
    ) -> Result<Server, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(reject(
                &self.notices,
                "Server name required",
                "Please enter a name for your server",
            ));
        }
        if let Some(ref file) = icon {
            UploadSlot::ServerIcon
                .validate(file)
                .map_err(|v| reject(&self.notices, v.title, v.detail))?;
        }

        let server_id = ServerId::new();
        report(&on_progress, 0.0);

        let icon_url = match icon {
            Some(file) => {
                report(&on_progress, 25.0);
                let path = format!("server-icons/{}_{}", server_id, file.file_name);
                let opts = UploadOptions {
                    upsert: true,
                    on_progress: ProgressRange::new(25.0, 75.0).wrap(&on_progress),
                };
                let url = self
                    .gateway
                    .upload(file, &path, opts)
                    .await
                    .map_err(|e| surface(&self.notices, "Failed to create server", e))?;
                Some(url.public_url)
            }
            None => None,
        };

        report(&on_progress, 75.0);

        let description = description.trim();
        let draft = ServerDraft {
            id: server_id,
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            icon_url,
            owner_id: self.user.id.clone(),
            theme_colors: Some(ThemeColors::default().to_json()),
        };
        let server = self
            .gateway
            .create::<Server>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Failed to create server", e))?;

        let member = ServerMemberDraft {
            id: MemberId::new(),
            server_id,
            user_id: self.user.id.clone(),
            role: MemberRole::Owner,
        };
        self.gateway
            .create::<ServerMember>(member)
            .await
            .map_err(|e| surface(&self.notices, "Failed to create server", e))?;

        create_default_channels(self.gateway.as_ref(), server_id)
            .await
            .map_err(|e| surface(&self.notices, "Failed to create server", e))?;

        report(&on_progress, 100.0);
        info!(server = %server_id, name, "server created");
        self.notices.info(
            "Server created!",
            format!("{name} has been created successfully"),
        );
        Ok(server)
    }

    /// Update a server's settings. New icon and background files are
    /// uploaded sequentially, mapped into the 20–50 and 50–90 windows; the
    /// record update lands at 90.
    pub async fn update_server(
        &self,
        server: &Server,
        name: &str,
        description: &str,
        icon: Option<UploadFile>,
        background: Option<UploadFile>,
        on_progress: Option<ProgressFn>,
    ) -> Result<Server, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(reject(
                &self.notices,
                "Server name required",
                "Please enter a name for your server",
            ));
        }
        if let Some(ref file) = icon {
            UploadSlot::ServerIcon
                .validate(file)
                .map_err(|v| reject(&self.notices, v.title, v.detail))?;
        }
        if let Some(ref file) = background {
            UploadSlot::Background
                .validate(file)
                .map_err(|v| reject(&self.notices, v.title, v.detail))?;
        }

        report(&on_progress, 0.0);

        let mut icon_url = server.icon_url.clone();
        if let Some(file) = icon {
            report(&on_progress, 20.0);
            let path = format!("server-icons/{}_{}", server.id, file.file_name);
            let opts = UploadOptions {
                upsert: true,
                on_progress: ProgressRange::new(20.0, 50.0).wrap(&on_progress),
            };
            let url = self
                .gateway
                .upload(file, &path, opts)
                .await
                .map_err(|e| surface(&self.notices, "Failed to save settings", e))?;
            icon_url = Some(url.public_url);
        }

        let mut background_url = server.background_url.clone();
        if let Some(file) = background {
            report(&on_progress, 50.0);
            let path = format!("server-backgrounds/{}_{}", server.id, file.file_name);
            let opts = UploadOptions {
                upsert: true,
                on_progress: ProgressRange::new(50.0, 90.0).wrap(&on_progress),
            };
            let url = self
                .gateway
                .upload(file, &path, opts)
                .await
                .map_err(|e| surface(&self.notices, "Failed to save settings", e))?;
            background_url = Some(url.public_url);
        }

        report(&on_progress, 90.0);

        let description = description.trim();
        let description = (!description.is_empty()).then(|| description.to_string());
        let patch = ServerPatch {
            name: Some(name.to_string()),
            description: Some(description.clone()),
            icon_url: Some(icon_url.clone()),
            background_url: Some(background_url.clone()),
        };
        self.gateway
            .update::<Server>(server.id.0, patch)
            .await
            .map_err(|e| surface(&self.notices, "Failed to save settings", e))?;

        report(&on_progress, 100.0);
        info!(server = %server.id, "server settings updated");
        self.notices
            .info("Settings saved!", "Server settings have been updated");

        Ok(Server {
            name: name.to_string(),
            description,
            icon_url,
            background_url,
            ..server.clone()
        })
    }

    /// Create a channel at the end of the server's display order.
    pub async fn create_channel(
        &self,
        server_id: ServerId,
        name: &str,
        kind: ChannelKind,
        existing: &[Channel],
    ) -> Result<Channel, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(reject(
                &self.notices,
                "Channel name required",
                "Please enter a name for the channel",
            ));
        }

        let position = existing
            .iter()
            .map(|c| c.position + 1)
            .max()
            .unwrap_or(0);
        let draft = ChannelDraft {
            id: ChannelId::new(),
            server_id,
            name: name.to_string(),
            kind,
            position,
        };
        let channel = self
            .gateway
            .create::<Channel>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Failed to create channel", e))?;

        info!(channel = %channel.id, name, "channel created");
        Ok(channel)
    }
}

/// The two channels every new server starts with.
pub(crate) async fn create_default_channels<G: Gateway>(
    gateway: &G,
    server_id: ServerId,
) -> Result<(), GatewayError> {
    gateway
        .create::<Channel>(ChannelDraft {
            id: ChannelId::new(),
            server_id,
            name: DEFAULT_TEXT_CHANNEL.to_string(),
            kind: ChannelKind::Text,
            position: 0,
        })
        .await?;

    gateway
        .create::<Channel>(ChannelDraft {
            id: ChannelId::new(),
            server_id,
            name: DEFAULT_VOICE_CHANNEL.to_string(),
            kind: ChannelKind::Voice,
            position: 1,
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{signed_in, upload_file};
    use std::sync::Mutex;

    #[tokio::test]
    async fn create_server_writes_server_member_and_default_channels() {
        let (gateway, session) = signed_in();
        let directory = session.directory();

        let server = directory
            .create_server("Game Night", "weekly sessions", None, None)
            .await
            .unwrap();

        assert_eq!(server.name, "Game Night");
        assert_eq!(server.owner_id, session.user().id);
        assert_eq!(gateway.collection_len("servers"), 1);
        assert_eq!(gateway.collection_len("serverMembers"), 1);
        assert_eq!(gateway.collection_len("channels"), 2);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_before_any_call() {
        let (gateway, session) = signed_in();
        let directory = session.directory();

        let result = directory.create_server("   ", "", None, None).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert_eq!(gateway.collection_len("servers"), 0);
    }

    #[tokio::test]
    async fn icon_upload_progress_stays_in_its_window() {
        let (gateway, session) = signed_in();
        let directory = session.directory();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let on_progress: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));

        directory
            .create_server(
                "Art Club",
                "",
                Some(upload_file("icon.png", "image/png", 512)),
                Some(on_progress),
            )
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&0.0));
        assert_eq!(seen.last(), Some(&100.0));
        // The upload's own 100% lands at the top of the 25–75 window.
        assert!(seen.contains(&75.0));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));

        assert_eq!(gateway.uploads().len(), 1);
        assert!(gateway.uploads()[0].path.starts_with("server-icons/"));
    }

    #[tokio::test]
    async fn oversized_icon_is_rejected_with_no_side_effects() {
        let (gateway, session) = signed_in();
        let directory = session.directory();

        let icon = upload_file("huge.png", "image/png", UploadSlot::ServerIcon.max_bytes() + 1);
        let result = directory.create_server("Big", "", Some(icon), None).await;

        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(gateway.uploads().is_empty());
        assert_eq!(gateway.collection_len("servers"), 0);
    }

    #[tokio::test]
    async fn update_server_maps_progress_into_disjoint_windows() {
        let (gateway, session) = signed_in();
        let directory = session.directory();

        let server = directory
            .create_server("Study Hall", "", None, None)
            .await
            .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let on_progress: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));

        let updated = directory
            .update_server(
                &server,
                "Study Hall 2",
                "quiet please",
                Some(upload_file("icon.png", "image/png", 256)),
                Some(upload_file("bg.mp4", "video/mp4", 1024)),
                Some(on_progress),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Study Hall 2");
        assert!(updated.icon_url.is_some());
        assert!(updated.background_url.is_some());

        let seen = seen.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.contains(&50.0));
        assert!(seen.contains(&90.0));
        assert_eq!(gateway.uploads().len(), 2);
    }

    #[tokio::test]
    async fn new_channel_lands_after_the_existing_ones() {
        let (gateway, mut session) = signed_in();
        let mut state = crate::state::AppState::new();
        session.bootstrap(&mut state).await;

        let directory = session.directory();
        let server_id = state.selected_server().unwrap();
        let channel = directory
            .create_channel(server_id, "memes", ChannelKind::Text, &state.channels)
            .await
            .unwrap();

        assert_eq!(channel.position, 2);
        assert_eq!(gateway.collection_len("channels"), 3);
    }
}
