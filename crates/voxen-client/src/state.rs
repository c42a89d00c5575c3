//! View-composition state: what is selected and which cosmetic toggles are
//! set. Pure data plus transitions; the rendering shell reads it and the
//! event handlers drive it.

use voxen_gateway::{Channel, Server};
use voxen_shared::types::{ChannelId, ServerId, UserId};

/// What the main area is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Nothing chosen yet (first load).
    None,
    /// A server, and within it possibly a channel.
    Server {
        server_id: ServerId,
        channel_id: Option<ChannelId>,
    },
    /// The direct-message view, possibly with an open conversation.
    DirectMessages { friend_id: Option<UserId> },
}

/// UI state owned by the composition layer.
///
/// The mute/deafen/volume fields are cosmetic: no audio transport exists
/// anywhere in the application.
#[derive(Debug, Clone)]
pub struct AppState {
    pub selection: Selection,
    pub servers: Vec<Server>,
    pub channels: Vec<Channel>,
    pub is_muted: bool,
    pub is_deafened: bool,
    pub volume: u8,
    pub text_section_open: bool,
    pub voice_section_open: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            selection: Selection::None,
            servers: Vec::new(),
            channels: Vec::new(),
            is_muted: false,
            is_deafened: false,
            volume: 100,
            text_section_open: true,
            voice_section_open: true,
        }
    }

    pub fn selected_server(&self) -> Option<ServerId> {
        match self.selection {
            Selection::Server { server_id, .. } => Some(server_id),
            _ => None,
        }
    }

    pub fn selected_channel(&self) -> Option<ChannelId> {
        match self.selection {
            Selection::Server { channel_id, .. } => channel_id,
            _ => None,
        }
    }

    pub fn selected_dm(&self) -> Option<&UserId> {
        match self.selection {
            Selection::DirectMessages { ref friend_id } => friend_id.as_ref(),
            _ => None,
        }
    }

    /// Sidebar click on a server. Re-selecting the current server keeps its
    /// channel; switching servers drops it until the new channel list loads.
    pub fn select_server(&mut self, server_id: ServerId) {
        let channel_id = match self.selection {
            Selection::Server {
                server_id: current,
                channel_id,
            } if current == server_id => channel_id,
            _ => None,
        };
        self.selection = Selection::Server {
            server_id,
            channel_id,
        };
    }

    /// Sidebar click on a channel of the selected server.
    pub fn select_channel(&mut self, channel_id: ChannelId) {
        if let Selection::Server { server_id, .. } = self.selection {
            self.selection = Selection::Server {
                server_id,
                channel_id: Some(channel_id),
            };
        }
    }

    /// Sidebar click on the DM home button.
    pub fn select_dms(&mut self) {
        self.selection = Selection::DirectMessages { friend_id: None };
        self.channels.clear();
    }

    /// Open one DM conversation.
    pub fn select_dm(&mut self, friend_id: UserId) {
        self.selection = Selection::DirectMessages {
            friend_id: Some(friend_id),
        };
    }

    /// Adopt the fetched server list; with nothing selected yet, the first
    /// server becomes current.
    pub fn servers_loaded(&mut self, servers: Vec<Server>) {
        if self.selection == Selection::None {
            if let Some(first) = servers.first() {
                self.selection = Selection::Server {
                    server_id: first.id,
                    channel_id: None,
                };
            }
        }
        self.servers = servers;
    }

    /// Adopt the fetched channel list for the selected server; with no
    /// channel chosen yet, the first one becomes current.
    pub fn channels_loaded(&mut self, channels: Vec<Channel>) {
        if let Selection::Server {
            server_id,
            channel_id: None,
        } = self.selection
        {
            if let Some(first) = channels.first() {
                self.selection = Selection::Server {
                    server_id,
                    channel_id: Some(first.id),
                };
            }
        }
        self.channels = channels;
    }

    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
    }

    pub fn toggle_deafen(&mut self) {
        self.is_deafened = !self.is_deafened;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use voxen_shared::types::ChannelKind;

    fn server(name: &str) -> Server {
        Server {
            id: ServerId::new(),
            name: name.into(),
            description: None,
            icon_url: None,
            background_url: None,
            owner_id: UserId::from("user_1"),
            theme_colors: None,
            created_at: Utc::now(),
        }
    }

    fn channel(server_id: ServerId, name: &str, position: u32) -> Channel {
        Channel {
            id: ChannelId::new(),
            server_id,
            name: name.into(),
            kind: ChannelKind::Text,
            position,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn first_server_is_auto_selected() {
        let mut state = AppState::new();
        let servers = vec![server("one"), server("two")];
        let first = servers[0].id;

        state.servers_loaded(servers);
        assert_eq!(state.selected_server(), Some(first));
        assert_eq!(state.selected_channel(), None);
    }

    #[test]
    fn first_channel_is_auto_selected_once_loaded() {
        let mut state = AppState::new();
        let s = server("one");
        let server_id = s.id;
        state.servers_loaded(vec![s]);

        let channels = vec![
            channel(server_id, "general", 0),
            channel(server_id, "random", 1),
        ];
        let general = channels[0].id;
        state.channels_loaded(channels);
        assert_eq!(state.selected_channel(), Some(general));
    }

    #[test]
    fn explicit_channel_choice_survives_channel_reload() {
        let mut state = AppState::new();
        let s = server("one");
        let server_id = s.id;
        state.servers_loaded(vec![s]);

        let chosen = ChannelId::new();
        state.select_channel(chosen);
        state.channels_loaded(vec![channel(server_id, "general", 0)]);
        assert_eq!(state.selected_channel(), Some(chosen));
    }

    #[test]
    fn switching_to_dms_clears_server_selection() {
        let mut state = AppState::new();
        state.servers_loaded(vec![server("one")]);
        state.select_dms();

        assert_eq!(state.selected_server(), None);
        assert_eq!(state.selected_channel(), None);
        assert_eq!(state.selected_dm(), None);

        state.select_dm(UserId::from("user_2"));
        assert_eq!(state.selected_dm(), Some(&UserId::from("user_2")));
    }

    #[test]
    fn switching_servers_drops_the_stale_channel() {
        let mut state = AppState::new();
        let first = ServerId::new();
        let second = ServerId::new();

        state.select_server(first);
        state.select_channel(ChannelId::new());
        state.select_server(second);
        assert_eq!(state.selected_channel(), None);

        // Re-selecting the current server keeps the channel.
        state.select_channel(ChannelId::new());
        let kept = state.selected_channel();
        state.select_server(second);
        assert_eq!(state.selected_channel(), kept);
    }

    #[test]
    fn toggles_are_cosmetic_flags() {
        let mut state = AppState::new();
        state.toggle_mute();
        state.toggle_deafen();
        assert!(state.is_muted);
        assert!(state.is_deafened);
        state.toggle_mute();
        assert!(!state.is_muted);
    }
}
