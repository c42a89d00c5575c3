//! The [`Gateway`] trait: the complete surface the client layer may use.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::query::ListQuery;
use crate::record::Record;
use crate::session::AuthSession;
use crate::storage::{PublicUrl, UploadFile, UploadOptions};

/// The remote service boundary: session observation, record CRUD with
/// filter/sort/limit, and blob upload with progress. Nothing else exists.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// List records matching a query, in the requested sort order.
    async fn list<R: Record>(&self, query: ListQuery) -> Result<Vec<R>>;

    /// Persist a new record; returns it including server-assigned fields.
    async fn create<R: Record>(&self, draft: R::Draft) -> Result<R>;

    /// Apply a partial update to the record with the given id.
    async fn update<R: Record>(&self, id: Uuid, patch: R::Patch) -> Result<()>;

    /// Delete the record with the given id.
    async fn delete<R: Record>(&self, id: Uuid) -> Result<()>;

    /// Upload a blob, reporting progress through the options' callback.
    async fn upload(&self, file: UploadFile, path: &str, opts: UploadOptions) -> Result<PublicUrl>;

    /// Start the provider-driven sign-in flow.
    async fn login(&self) -> Result<()>;

    /// End the session.
    async fn logout(&self) -> Result<()>;

    /// Handle to the observable authentication state.
    fn auth(&self) -> &AuthSession;
}
