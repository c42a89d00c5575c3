/// Application name
pub const APP_NAME: &str = "Voxen";

/// Maximum avatar / server icon upload size in bytes (10 MB)
pub const MAX_AVATAR_SIZE: usize = 10 * 1024 * 1024;

/// Maximum profile / server background upload size in bytes (100 MB)
pub const MAX_BACKGROUND_SIZE: usize = 100 * 1024 * 1024;

/// Maximum chat attachment upload size in bytes (600 MB)
pub const MAX_ATTACHMENT_SIZE: usize = 600 * 1024 * 1024;

/// How many messages one channel fetch returns
pub const MESSAGE_PAGE_LIMIT: u32 = 100;

/// Name given to the server bootstrapped for a brand-new user
pub const DEFAULT_SERVER_NAME: &str = "My First Server";

/// Description of the bootstrapped server
pub const DEFAULT_SERVER_DESCRIPTION: &str = "Welcome to Voxen!";

/// Default text channel created with every server
pub const DEFAULT_TEXT_CHANNEL: &str = "general";

/// Default voice channel created with every server
pub const DEFAULT_VOICE_CHANNEL: &str = "General Voice";

/// Display name used when the auth provider gives us no email
pub const FALLBACK_DISPLAY_NAME: &str = "User";
