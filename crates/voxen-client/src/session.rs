//! Session bootstrap and the shared handles every pane clones.
//!
//! A [`Session`] exists only while the gateway reports a signed-in user. On
//! startup it loads the theme, lazily creates the user's profile, and loads
//! the servers the user belongs to — bootstrapping a default server with two
//! channels for a brand-new account.

use std::sync::Arc;

use tracing::info;

use voxen_gateway::{
    AuthUser, Channel, Direction, Filter, Gateway, GatewayError, ListQuery, Server, ServerDraft,
    ServerMember, ServerMemberDraft, UserProfile, UserProfileDraft,
};
use voxen_shared::constants::{DEFAULT_SERVER_DESCRIPTION, DEFAULT_SERVER_NAME};
use voxen_shared::theme::ThemeColors;
use voxen_shared::types::{MemberId, MemberRole, ServerId};

use crate::error::ClientError;
use crate::notify::{surface, Notifier};
use crate::servers::{self, ServerDirectory};
use crate::state::AppState;
use crate::theme::ThemeContext;

/// A signed-in user's session.
pub struct Session<G> {
    gateway: Arc<G>,
    user: AuthUser,
    notices: Notifier,
    theme: ThemeContext,
    profile: Option<UserProfile>,
}

impl<G: Gateway> Session<G> {
    /// Build a session for the currently signed-in user.
    pub fn new(gateway: Arc<G>) -> Result<Self, ClientError> {
        let user = gateway
            .auth()
            .user()
            .ok_or(GatewayError::NotAuthenticated)?;
        info!(user = %user.id, "session started");

        Ok(Self {
            gateway,
            user,
            notices: Notifier::new(),
            theme: ThemeContext::new(),
            profile: None,
        })
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    /// The cached profile, if [`Self::ensure_profile`] has run.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn notices(&self) -> &Notifier {
        &self.notices
    }

    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Server create/update operations bound to this session.
    pub fn directory(&self) -> ServerDirectory<G> {
        ServerDirectory::new(self)
    }

    /// Run the full first-load sequence. Each step carries its own failure
    /// boundary, so one failing step does not stop the rest.
    pub async fn bootstrap(&mut self, state: &mut AppState) {
        let _ = self.load_and_apply_theme().await;
        let _ = self.ensure_profile().await;
        let _ = self.load_servers(state).await;
        if let Some(server_id) = state.selected_server() {
            let _ = self.load_channels(state, server_id).await;
        }
    }

    /// Read the stored theme from the profile record and broadcast it.
    pub async fn load_and_apply_theme(&self) -> Result<(), ClientError> {
        let profile = self
            .fetch_profile()
            .await
            .map_err(|e| surface(&self.notices, "Failed to load theme", e))?;

        if let Some(raw) = profile.and_then(|p| p.theme_colors) {
            self.theme.apply(ThemeColors::from_json(&raw));
        }
        Ok(())
    }

    /// Load the user's profile, creating the default one on first sight.
    pub async fn ensure_profile(&mut self) -> Result<UserProfile, ClientError> {
        if let Some(ref profile) = self.profile {
            return Ok(profile.clone());
        }

        let existing = self
            .fetch_profile()
            .await
            .map_err(|e| surface(&self.notices, "Failed to load profile", e))?;

        let profile = match existing {
            Some(profile) => profile,
            None => {
                let draft =
                    UserProfileDraft::initial(self.user.id.clone(), self.user.display_handle());
                self.gateway
                    .create::<UserProfile>(draft)
                    .await
                    .map_err(|e| surface(&self.notices, "Failed to create profile", e))?
            }
        };

        self.profile = Some(profile.clone());
        Ok(profile)
    }

    pub(crate) fn cache_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    /// Load the servers the user is a member of. A user with no memberships
    /// gets the default server bootstrapped and selected.
    pub async fn load_servers(&mut self, state: &mut AppState) -> Result<(), ClientError> {
        let memberships: Vec<ServerMember> = self
            .gateway
            .list(ListQuery::new().filter(Filter::eq("userId", self.user.id.as_str())))
            .await
            .map_err(|e| surface(&self.notices, "Failed to load servers", e))?;

        if memberships.is_empty() {
            let server = self.bootstrap_default_server().await?;
            state.servers_loaded(vec![server]);
            return Ok(());
        }

        let server_ids: Vec<String> = memberships.iter().map(|m| m.server_id.to_string()).collect();
        let servers: Vec<Server> = self
            .gateway
            .list(ListQuery::new().filter(Filter::is_in("id", server_ids)))
            .await
            .map_err(|e| surface(&self.notices, "Failed to load servers", e))?;

        state.servers_loaded(servers);
        Ok(())
    }

    /// Fetch the channel list for one server, position ascending.
    pub async fn load_channels(
        &self,
        state: &mut AppState,
        server_id: ServerId,
    ) -> Result<(), ClientError> {
        let channels: Vec<Channel> = self
            .gateway
            .list(
                ListQuery::new()
                    .filter(Filter::eq("serverId", server_id.to_string()))
                    .order_by("position", Direction::Asc),
            )
            .await
            .map_err(|e| surface(&self.notices, "Failed to load channels", e))?;

        state.channels_loaded(channels);
        Ok(())
    }

    /// End the session at the provider.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.gateway
            .logout()
            .await
            .map_err(|e| surface(&self.notices, "Failed to sign out", e))
    }

    pub(crate) async fn fetch_profile(&self) -> Result<Option<UserProfile>, GatewayError> {
        let profiles: Vec<UserProfile> = self
            .gateway
            .list(
                ListQuery::new()
                    .filter(Filter::eq("userId", self.user.id.as_str()))
                    .limit(1),
            )
            .await?;
        Ok(profiles.into_iter().next())
    }

    async fn bootstrap_default_server(&self) -> Result<Server, ClientError> {
        let server_id = ServerId::new();
        let draft = ServerDraft {
            id: server_id,
            name: DEFAULT_SERVER_NAME.to_string(),
            description: Some(DEFAULT_SERVER_DESCRIPTION.to_string()),
            icon_url: None,
            owner_id: self.user.id.clone(),
            theme_colors: Some(ThemeColors::default().to_json()),
        };

        let server = self
            .gateway
            .create::<Server>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Failed to create default server", e))?;

        let member = ServerMemberDraft {
            id: MemberId::new(),
            server_id,
            user_id: self.user.id.clone(),
            role: MemberRole::Owner,
        };
        self.gateway
            .create::<ServerMember>(member)
            .await
            .map_err(|e| surface(&self.notices, "Failed to create default server", e))?;

        servers::create_default_channels(self.gateway.as_ref(), server_id)
            .await
            .map_err(|e| surface(&self.notices, "Failed to create default server", e))?;

        info!(server = %server_id, "bootstrapped default server");
        Ok(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::signed_in;
    use voxen_shared::constants::{DEFAULT_TEXT_CHANNEL, DEFAULT_VOICE_CHANNEL};
    use voxen_shared::types::ChannelKind;

    #[tokio::test]
    async fn new_requires_a_signed_in_user() {
        let gateway = Arc::new(voxen_gateway::MemoryGateway::new());
        assert!(Session::new(gateway).is_err());
    }

    #[tokio::test]
    async fn zero_servers_bootstraps_one_default_server() {
        let (gateway, mut session) = signed_in();
        let mut state = AppState::new();

        session.bootstrap(&mut state).await;

        assert_eq!(state.servers.len(), 1);
        let server = &state.servers[0];
        assert_eq!(server.name, DEFAULT_SERVER_NAME);
        assert_eq!(server.owner_id, session.user().id);
        assert_eq!(state.selected_server(), Some(server.id));

        // One owner membership row.
        assert_eq!(gateway.collection_len("serverMembers"), 1);

        // One text channel and one voice channel, text first by position.
        assert_eq!(state.channels.len(), 2);
        assert_eq!(state.channels[0].name, DEFAULT_TEXT_CHANNEL);
        assert_eq!(state.channels[0].kind, ChannelKind::Text);
        assert_eq!(state.channels[1].name, DEFAULT_VOICE_CHANNEL);
        assert_eq!(state.channels[1].kind, ChannelKind::Voice);

        // The text channel is auto-selected.
        assert_eq!(state.selected_channel(), Some(state.channels[0].id));
    }

    #[tokio::test]
    async fn second_bootstrap_reuses_the_existing_server() {
        let (gateway, mut session) = signed_in();

        let mut state = AppState::new();
        session.bootstrap(&mut state).await;

        let mut fresh = AppState::new();
        session.bootstrap(&mut fresh).await;

        assert_eq!(gateway.collection_len("servers"), 1);
        assert_eq!(fresh.servers.len(), 1);
    }

    #[tokio::test]
    async fn profile_is_created_lazily_exactly_once() {
        let (gateway, mut session) = signed_in();

        let profile = session.ensure_profile().await.unwrap();
        assert_eq!(profile.display_name, "alice");
        assert_eq!(gateway.collection_len("userProfiles"), 1);

        let again = session.ensure_profile().await.unwrap();
        assert_eq!(again.id, profile.id);
        assert_eq!(gateway.collection_len("userProfiles"), 1);
    }

    #[tokio::test]
    async fn stored_theme_is_applied_on_load() {
        let (_gateway, mut session) = signed_in();

        let colors = voxen_shared::theme::THEME_PRESETS[2].colors();
        session.save_theme(colors.clone()).await.unwrap();

        // A new session for the same user sees the persisted theme.
        let mut rx = session.theme().subscribe();
        session.load_and_apply_theme().await.unwrap();
        assert_eq!(rx.borrow_and_update().clone(), colors);
    }
}
