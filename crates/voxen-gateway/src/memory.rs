//! In-process implementation of the [`Gateway`] trait.
//!
//! Collections are plain JSON documents evaluated through the same
//! [`ListQuery`] model the remote service uses, which keeps the two
//! implementations semantically aligned. Tests drive it directly; it also
//! backs offline development runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use voxen_shared::types::UserId;

use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;
use crate::query::ListQuery;
use crate::record::Record;
use crate::session::{AuthSession, AuthUser};
use crate::storage::{PublicUrl, UploadFile, UploadOptions};

/// One blob accepted by [`MemoryGateway::upload`].
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: String,
    pub content_type: String,
    pub size: usize,
    pub upsert: bool,
}

/// In-process gateway.
pub struct MemoryGateway {
    auth: AuthSession,
    collections: Mutex<HashMap<&'static str, Vec<Value>>>,
    uploads: Mutex<Vec<StoredUpload>>,
    fail_next_create: AtomicBool,
    /// User returned by [`Gateway::login`]. Set through [`Self::with_user`].
    login_user: Mutex<Option<AuthUser>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            auth: AuthSession::new(),
            collections: Mutex::new(HashMap::new()),
            uploads: Mutex::new(Vec::new()),
            fail_next_create: AtomicBool::new(false),
            login_user: Mutex::new(None),
        }
    }

    /// Configure the user `login()` signs in as.
    pub fn with_user(self, id: &str, email: &str) -> Self {
        *self.login_user.lock().unwrap() = Some(AuthUser {
            id: UserId::from(id),
            email: Some(email.to_string()),
        });
        self
    }

    /// Sign a user in directly, bypassing the login flow.
    pub fn sign_in(&self, id: &str, email: &str) -> AuthUser {
        let user = AuthUser {
            id: UserId::from(id),
            email: Some(email.to_string()),
        };
        self.auth.publish_signed_in(user.clone());
        user
    }

    /// Make the next `create` call fail with [`GatewayError::Unavailable`].
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Insert a record directly, bypassing the client (another user's write
    /// arriving at the authoritative store).
    pub fn insert_record<R: Record>(&self, record: &R) {
        let doc = serde_json::to_value(record).expect("record serializes");
        self.collections
            .lock()
            .unwrap()
            .entry(R::COLLECTION)
            .or_default()
            .push(doc);
    }

    /// Number of records in a collection.
    pub fn collection_len(&self, collection: &'static str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Blobs accepted so far, in upload order.
    pub fn uploads(&self) -> Vec<StoredUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list<R: Record>(&self, query: ListQuery) -> Result<Vec<R>> {
        let collections = self.collections.lock().unwrap();
        let docs = collections
            .get(R::COLLECTION)
            .map(Vec::as_slice)
            .unwrap_or_default();

        query
            .apply(docs)
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(GatewayError::from))
            .collect()
    }

    async fn create<R: Record>(&self, draft: R::Draft) -> Result<R> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("injected create failure".into()));
        }

        let mut doc = serde_json::to_value(&draft)?;
        if let Value::Object(ref mut fields) = doc {
            // Fixed-width timestamps keep lexicographic order chronological.
            fields.entry("createdAt").or_insert_with(|| {
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
            });
        }

        let record: R = serde_json::from_value(doc.clone())?;
        self.collections
            .lock()
            .unwrap()
            .entry(R::COLLECTION)
            .or_default()
            .push(doc);

        debug!(collection = R::COLLECTION, id = %record.record_id(), "created record");
        Ok(record)
    }

    async fn update<R: Record>(&self, id: Uuid, patch: R::Patch) -> Result<()> {
        let patch = serde_json::to_value(&patch)?;
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(R::COLLECTION).or_default();

        let id = Value::String(id.to_string());
        let doc = docs
            .iter_mut()
            .find(|d| d.get("id") == Some(&id))
            .ok_or(GatewayError::NotFound)?;

        if let (Value::Object(fields), Value::Object(changes)) = (doc, patch) {
            for (key, value) in changes {
                fields.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete<R: Record>(&self, id: Uuid) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(R::COLLECTION).or_default();

        let id = Value::String(id.to_string());
        let before = docs.len();
        docs.retain(|d| d.get("id") != Some(&id));

        if docs.len() == before {
            return Err(GatewayError::NotFound);
        }
        Ok(())
    }

    async fn upload(&self, file: UploadFile, path: &str, opts: UploadOptions) -> Result<PublicUrl> {
        if !opts.upsert {
            let taken = self
                .uploads
                .lock()
                .unwrap()
                .iter()
                .any(|u| u.path == path);
            if taken {
                return Err(GatewayError::Status {
                    status: 409,
                    detail: format!("blob already exists at {path}"),
                });
            }
        }

        opts.progress(100.0);

        self.uploads.lock().unwrap().push(StoredUpload {
            path: path.to_string(),
            content_type: file.content_type.clone(),
            size: file.size(),
            upsert: opts.upsert,
        });

        Ok(PublicUrl {
            public_url: format!("memory://voxen/storage/{path}"),
        })
    }

    async fn login(&self) -> Result<()> {
        let user = self
            .login_user
            .lock()
            .unwrap()
            .clone()
            .ok_or(GatewayError::NotAuthenticated)?;
        self.auth.publish_signed_in(user);
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        self.auth.publish_signed_out();
        Ok(())
    }

    fn auth(&self) -> &AuthSession {
        &self.auth
    }
}
