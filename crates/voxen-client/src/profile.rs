//! Profile editing: display name, bio, status, avatar and background.
//!
//! The two optional uploads run sequentially, mapped into the 20–50 and
//! 50–90 windows of the overall progress; the record write lands at 90.

use voxen_gateway::{
    Gateway, ProgressFn, UploadFile, UploadOptions, UserProfile, UserProfileDraft, UserProfilePatch,
};
use voxen_shared::types::PresenceStatus;

use crate::error::ClientError;
use crate::notify::{reject, surface};
use crate::session::Session;
use crate::upload::{report, ProgressRange, UploadSlot};

/// Everything the profile dialog can change.
pub struct ProfileInput {
    pub display_name: String,
    pub bio: String,
    pub status: PresenceStatus,
    pub avatar: Option<UploadFile>,
    pub background: Option<UploadFile>,
}

impl<G: Gateway> Session<G> {
    /// Save the profile, uploading new media first.
    pub async fn save_profile(
        &mut self,
        input: ProfileInput,
        on_progress: Option<ProgressFn>,
    ) -> Result<UserProfile, ClientError> {
        let display_name = input.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(reject(
                self.notices(),
                "Display name required",
                "Please enter a display name",
            ));
        }
        if let Some(ref file) = input.avatar {
            UploadSlot::Avatar
                .validate(file)
                .map_err(|v| reject(self.notices(), v.title, v.detail))?;
        }
        if let Some(ref file) = input.background {
            UploadSlot::Background
                .validate(file)
                .map_err(|v| reject(self.notices(), v.title, v.detail))?;
        }

        let existing = match self.profile() {
            Some(profile) => Some(profile.clone()),
            None => self
                .fetch_profile()
                .await
                .map_err(|e| surface(self.notices(), "Failed to save profile", e))?,
        };

        report(&on_progress, 0.0);

        let mut avatar_url = existing.as_ref().and_then(|p| p.avatar_url.clone());
        if let Some(file) = input.avatar {
            report(&on_progress, 20.0);
            let path = format!("avatars/{}_{}", self.user().id, file.file_name);
            let opts = UploadOptions {
                upsert: true,
                on_progress: ProgressRange::new(20.0, 50.0).wrap(&on_progress),
            };
            let url = self
                .gateway()
                .upload(file, &path, opts)
                .await
                .map_err(|e| surface(self.notices(), "Failed to save profile", e))?;
            avatar_url = Some(url.public_url);
        }

        let mut background_url = existing.as_ref().and_then(|p| p.background_url.clone());
        if let Some(file) = input.background {
            report(&on_progress, 50.0);
            let path = format!("profile-backgrounds/{}_{}", self.user().id, file.file_name);
            let opts = UploadOptions {
                upsert: true,
                on_progress: ProgressRange::new(50.0, 90.0).wrap(&on_progress),
            };
            let url = self
                .gateway()
                .upload(file, &path, opts)
                .await
                .map_err(|e| surface(self.notices(), "Failed to save profile", e))?;
            background_url = Some(url.public_url);
        }

        report(&on_progress, 90.0);

        let bio = input.bio.trim().to_string();
        let bio = (!bio.is_empty()).then_some(bio);

        let profile = match existing {
            Some(profile) => {
                let patch = UserProfilePatch {
                    display_name: Some(display_name.clone()),
                    bio: Some(bio.clone()),
                    status: Some(input.status),
                    avatar_url: Some(avatar_url.clone()),
                    background_url: Some(background_url.clone()),
                    theme_colors: None,
                };
                self.gateway()
                    .update::<UserProfile>(profile.id.0, patch)
                    .await
                    .map_err(|e| surface(self.notices(), "Failed to save profile", e))?;
                UserProfile {
                    display_name,
                    bio,
                    status: input.status,
                    avatar_url,
                    background_url,
                    ..profile
                }
            }
            None => {
                let draft = UserProfileDraft {
                    bio,
                    status: input.status,
                    avatar_url,
                    background_url,
                    ..UserProfileDraft::initial(self.user().id.clone(), display_name)
                };
                self.gateway()
                    .create::<UserProfile>(draft)
                    .await
                    .map_err(|e| surface(self.notices(), "Failed to save profile", e))?
            }
        };

        report(&on_progress, 100.0);
        self.notices().info(
            "Profile updated!",
            "Your profile has been saved successfully",
        );
        self.cache_profile(profile.clone());
        Ok(profile)
    }
}
