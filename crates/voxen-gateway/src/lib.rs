//! # voxen-gateway
//!
//! The Remote Data Gateway boundary: everything Voxen persists lives behind a
//! hosted backend-as-a-service exposing exactly four capability groups —
//! session observation, record collections with filter/sort/limit, blob
//! storage with upload progress, and nothing else.
//!
//! The crate defines the typed record model for every collection, the query
//! language the gateway accepts, and the [`Gateway`] trait the client layer
//! programs against. Two implementations are provided: [`HttpGateway`] for
//! the real remote service and [`MemoryGateway`], an in-process stand-in used
//! by tests and offline development.

pub mod config;
pub mod http;
pub mod memory;
pub mod models;
pub mod query;
pub mod record;
pub mod session;
pub mod storage;

mod error;
mod gateway;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::Gateway;
pub use http::HttpGateway;
pub use memory::MemoryGateway;
pub use models::*;
pub use query::{Direction, Filter, ListQuery, OrderBy};
pub use record::{NoPatch, Record};
pub use session::{AuthSession, AuthState, AuthUser};
pub use storage::{ProgressFn, PublicUrl, UploadFile, UploadOptions};
