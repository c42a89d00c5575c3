//! The [`Record`] trait ties a typed struct to its gateway collection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// A typed record persisted in one gateway collection.
///
/// `Draft` is the payload sent to `create` (client-generated id included; the
/// gateway adds server-assigned fields such as `createdAt`). `Patch` is the
/// partial payload sent to `update`; collections the client never patches use
/// [`NoPatch`].
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name as the gateway knows it.
    const COLLECTION: &'static str;

    /// Payload accepted by `create`.
    type Draft: Serialize + Send + Sync + 'static;

    /// Payload accepted by `update`.
    type Patch: Serialize + Send + Sync + 'static;

    /// The record's unique id.
    fn record_id(&self) -> Uuid;
}

/// Patch type for append-only collections.
#[derive(Debug, Clone, Serialize)]
pub struct NoPatch {}
