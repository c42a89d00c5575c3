//! Client-side upload validation and composite progress mapping.
//!
//! Every file passes through a slot check before any network call: a size
//! ceiling and an accepted MIME prefix, both depending on where the file is
//! going. When one save action performs several sequential uploads, each
//! upload's 0–100 progress is projected into a disjoint sub-range of the
//! overall percentage.

use std::sync::Arc;

use voxen_gateway::{ProgressFn, UploadFile};
use voxen_shared::constants::{MAX_ATTACHMENT_SIZE, MAX_AVATAR_SIZE, MAX_BACKGROUND_SIZE};

/// Where an upload is headed. Each slot carries its own ceiling and
/// accepted types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    /// Profile picture: 10 MB, images only.
    Avatar,
    /// Server icon: 10 MB, images only.
    ServerIcon,
    /// Profile or server background: 100 MB, images or videos.
    Background,
    /// Chat attachment: 600 MB, any type.
    Attachment,
}

/// A rejected upload: notice title plus the specific reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotViolation {
    pub title: &'static str,
    pub detail: String,
}

impl UploadSlot {
    pub fn max_bytes(self) -> usize {
        match self {
            Self::Avatar | Self::ServerIcon => MAX_AVATAR_SIZE,
            Self::Background => MAX_BACKGROUND_SIZE,
            Self::Attachment => MAX_ATTACHMENT_SIZE,
        }
    }

    fn accepts(self, content_type: &str) -> bool {
        match self {
            Self::Avatar | Self::ServerIcon => content_type.starts_with("image/"),
            Self::Background => {
                content_type.starts_with("image/") || content_type.starts_with("video/")
            }
            Self::Attachment => true,
        }
    }

    /// Validate a staged file against this slot.
    pub fn validate(self, file: &UploadFile) -> Result<(), SlotViolation> {
        self.check(file.size(), &file.content_type)
    }

    /// Validate by size and content type alone.
    pub fn check(self, size: usize, content_type: &str) -> Result<(), SlotViolation> {
        if size > self.max_bytes() {
            return Err(SlotViolation {
                title: "File too large",
                detail: self.size_message().to_string(),
            });
        }
        if !self.accepts(content_type) {
            return Err(SlotViolation {
                title: "Invalid file type",
                detail: self.type_message().to_string(),
            });
        }
        Ok(())
    }

    fn size_message(self) -> &'static str {
        match self {
            Self::Avatar => "Profile pictures must be under 10MB",
            Self::ServerIcon => "Server icons must be under 10MB",
            Self::Background => "Background images must be under 100MB",
            Self::Attachment => "Files must be under 600MB",
        }
    }

    fn type_message(self) -> &'static str {
        match self {
            Self::Avatar | Self::ServerIcon => "Please select an image file",
            Self::Background => "Please select an image or video file",
            Self::Attachment => "",
        }
    }
}

/// A sub-range of the overall 0–100 progress allocated to one upload step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRange {
    start: f32,
    end: f32,
}

impl ProgressRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Project an upload-local percentage into this sub-range.
    pub fn project(&self, percent: f32) -> f32 {
        self.start + percent.clamp(0.0, 100.0) * (self.end - self.start) / 100.0
    }

    /// Wrap an overall progress callback so an upload reporting 0–100 lands
    /// inside this sub-range.
    pub fn wrap(&self, overall: &Option<ProgressFn>) -> Option<ProgressFn> {
        overall.as_ref().map(|cb| {
            let cb = cb.clone();
            let range = *self;
            Arc::new(move |percent: f32| cb(range.project(percent))) as ProgressFn
        })
    }
}

/// Report a fixed milestone on the overall callback, if any.
pub(crate) fn report(overall: &Option<ProgressFn>, percent: f32) {
    if let Some(cb) = overall {
        cb(percent);
    }
}
