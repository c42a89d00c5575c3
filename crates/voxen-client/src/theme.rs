//! Process-wide theme state.
//!
//! One [`ThemeContext`] lives at the composition root. Any view may read or
//! watch the current triple; writes go through [`Session::save_theme`], which
//! persists to the profile record and then broadcasts.

use tokio::sync::watch;

use voxen_gateway::{Gateway, UserProfile, UserProfileDraft, UserProfilePatch};
use voxen_shared::theme::ThemeColors;

use crate::error::ClientError;
use crate::notify::surface;
use crate::session::Session;

/// Shared handle to the current theme.
pub struct ThemeContext {
    tx: watch::Sender<ThemeColors>,
}

impl ThemeContext {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ThemeColors::default());
        Self { tx }
    }

    /// Snapshot of the current triple.
    pub fn current(&self) -> ThemeColors {
        self.tx.borrow().clone()
    }

    /// Watch theme changes. The receiver sees the current value immediately.
    pub fn subscribe(&self) -> watch::Receiver<ThemeColors> {
        self.tx.subscribe()
    }

    /// Broadcast a new triple without persisting (startup load).
    /// send_replace rather than send: the value must stick even while
    /// nobody is subscribed yet.
    pub(crate) fn apply(&self, colors: ThemeColors) {
        self.tx.send_replace(colors);
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Gateway> Session<G> {
    /// Persist a theme to the profile record, then broadcast it.
    ///
    /// A user without a profile yet gets one created carrying the theme.
    pub async fn save_theme(&mut self, colors: ThemeColors) -> Result<(), ClientError> {
        let serialized = colors.to_json();

        let existing = self
            .fetch_profile()
            .await
            .map_err(|e| surface(self.notices(), "Failed to save theme", e))?;

        match existing {
            Some(profile) => {
                let patch = UserProfilePatch {
                    theme_colors: Some(serialized.clone()),
                    ..Default::default()
                };
                self.gateway()
                    .update::<UserProfile>(profile.id.0, patch)
                    .await
                    .map_err(|e| surface(self.notices(), "Failed to save theme", e))?;
                self.cache_profile(UserProfile {
                    theme_colors: Some(serialized),
                    ..profile
                });
            }
            None => {
                let mut draft = UserProfileDraft::initial(
                    self.user().id.clone(),
                    self.user().display_handle(),
                );
                draft.theme_colors = Some(serialized);
                let profile = self
                    .gateway()
                    .create::<UserProfile>(draft)
                    .await
                    .map_err(|e| surface(self.notices(), "Failed to save theme", e))?;
                self.cache_profile(profile);
            }
        }

        self.theme().apply(colors);
        self.notices()
            .info("Theme saved!", "Your custom theme has been applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::signed_in;

    #[tokio::test]
    async fn saving_broadcasts_and_persists() {
        let (gateway, mut session) = signed_in();
        let mut rx = session.theme().subscribe();

        let colors = ThemeColors {
            primary: "#0EA5E9".into(),
            accent: "#06B6D4".into(),
            background: "#0C1426".into(),
        };
        session.save_theme(colors.clone()).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().clone(), colors);

        // No profile existed, so one was created carrying the theme.
        assert_eq!(gateway.collection_len("userProfiles"), 1);
        let stored = session.profile().unwrap();
        assert_eq!(
            ThemeColors::from_json(stored.theme_colors.as_deref().unwrap()),
            colors
        );
    }

    #[tokio::test]
    async fn saving_twice_updates_the_same_profile() {
        let (gateway, mut session) = signed_in();

        session
            .save_theme(ThemeColors::default())
            .await
            .unwrap();
        session
            .save_theme(voxen_shared::theme::THEME_PRESETS[3].colors())
            .await
            .unwrap();

        assert_eq!(gateway.collection_len("userProfiles"), 1);
        assert_eq!(
            session.theme().current(),
            voxen_shared::theme::THEME_PRESETS[3].colors()
        );
    }
}
