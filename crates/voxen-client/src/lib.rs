//! # voxen-client
//!
//! The client core of Voxen: session bootstrap, the per-screen panes that
//! bridge user intents to gateway calls while keeping visible lists
//! responsive, and the view-composition state a rendering shell reads.
//!
//! Every list a pane holds is a disposable cache: it is replaced wholesale
//! from an authoritative fetch whenever the pane is (re-)opened, and grows by
//! optimistic appends in between. There is no merge and no retry.

pub mod chat;
pub mod dm;
pub mod friends;
pub mod members;
pub mod notify;
pub mod profile;
pub mod servers;
pub mod session;
pub mod state;
pub mod sync;
pub mod theme;
pub mod upload;

mod error;

pub use error::ClientError;
pub use session::Session;
pub use state::{AppState, Selection};

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging for a Voxen client process.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("voxen_client=debug,voxen_gateway=debug,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!("Starting Voxen client");
}
