//! HTTP implementation of the [`Gateway`] trait.
//!
//! Records live under `{base}/records/{collection}`, blobs under
//! `{base}/storage/{path}`. Every request carries the configured bearer
//! token. Upload bodies are streamed in fixed-size chunks so the progress
//! callback can be driven from the client side as the transfer advances.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use voxen_shared::types::UserId;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;
use crate::query::ListQuery;
use crate::record::Record;
use crate::session::{AuthSession, AuthUser};
use crate::storage::{PublicUrl, UploadFile, UploadOptions};

/// Upload chunk size. Small enough that progress moves visibly for large
/// attachments, large enough not to dominate per-chunk overhead.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Client for the hosted gateway.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    auth: AuthSession,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = config.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GatewayError::Config("Invalid auth token".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            auth_token: config.auth_token,
            auth: AuthSession::new(),
        })
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/records/{}", self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: Uuid) -> String {
        format!("{}/records/{}/{}", self.base_url, collection, id)
    }

    fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Map non-success statuses into typed errors.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::NotAuthenticated);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list<R: Record>(&self, query: ListQuery) -> Result<Vec<R>> {
        let url = format!("{}/query", self.records_url(R::COLLECTION));
        let response = self.http.post(&url).json(&query.to_body()).send().await?;
        let records = Self::check(response).await?.json::<Vec<R>>().await?;
        debug!(collection = R::COLLECTION, count = records.len(), "listed records");
        Ok(records)
    }

    async fn create<R: Record>(&self, draft: R::Draft) -> Result<R> {
        let url = self.records_url(R::COLLECTION);
        let response = self.http.post(&url).json(&draft).send().await?;
        let record = Self::check(response).await?.json::<R>().await?;
        debug!(collection = R::COLLECTION, id = %record.record_id(), "created record");
        Ok(record)
    }

    async fn update<R: Record>(&self, id: Uuid, patch: R::Patch) -> Result<()> {
        let url = self.record_url(R::COLLECTION, id);
        let response = self.http.patch(&url).json(&patch).send().await?;
        Self::check(response).await?;
        debug!(collection = R::COLLECTION, %id, "updated record");
        Ok(())
    }

    async fn delete<R: Record>(&self, id: Uuid) -> Result<()> {
        let url = self.record_url(R::COLLECTION, id);
        let response = self.http.delete(&url).send().await?;
        Self::check(response).await?;
        debug!(collection = R::COLLECTION, %id, "deleted record");
        Ok(())
    }

    async fn upload(&self, file: UploadFile, path: &str, opts: UploadOptions) -> Result<PublicUrl> {
        let url = format!("{}?upsert={}", self.storage_url(path), opts.upsert);
        let total = file.size();

        let request = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, &file.content_type)
            .header(reqwest::header::CONTENT_LENGTH, total);

        let response = if total == 0 {
            opts.progress(100.0);
            request.send().await?
        } else {
            let on_progress = opts.on_progress.clone();
            let mut sent = 0usize;
            let chunks = chunk_bytes(&file.bytes, UPLOAD_CHUNK_SIZE);
            let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
                sent += chunk.len();
                if let Some(ref cb) = on_progress {
                    cb(sent as f32 * 100.0 / total as f32);
                }
                Ok::<Bytes, std::io::Error>(chunk)
            }));
            request
                .body(reqwest::Body::wrap_stream(stream))
                .send()
                .await?
        };

        let public_url = Self::check(response).await?.json::<PublicUrl>().await?;
        info!(path, size = total, "uploaded blob");
        Ok(public_url)
    }

    async fn login(&self) -> Result<()> {
        let token = self
            .auth_token
            .as_ref()
            .ok_or_else(|| GatewayError::Config("No auth token configured".to_string()))?;

        self.auth.publish_loading();

        let url = format!("{}/auth/session", self.base_url);
        let result = async {
            let response = self
                .http
                .post(&url)
                .json(&serde_json::json!({ "token": token }))
                .send()
                .await?;
            Self::check(response).await?.json::<SessionWire>().await.map_err(GatewayError::from)
        }
        .await;

        match result {
            Ok(wire) => {
                info!(user = %wire.id, "signed in");
                self.auth.publish_signed_in(AuthUser {
                    id: UserId(wire.id),
                    email: wire.email,
                });
                Ok(())
            }
            Err(e) => {
                self.auth.publish_signed_out();
                Err(e)
            }
        }
    }

    async fn logout(&self) -> Result<()> {
        let url = format!("{}/auth/session", self.base_url);
        let response = self.http.delete(&url).send().await?;
        Self::check(response).await?;
        self.auth.publish_signed_out();
        info!("signed out");
        Ok(())
    }

    fn auth(&self) -> &AuthSession {
        &self.auth
    }
}

#[derive(Debug, Deserialize)]
struct SessionWire {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Split a buffer into fixed-size chunks. `Bytes` clones are reference
/// counted, so this never copies the payload.
fn chunk_bytes(bytes: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let mut rest = bytes.clone();
    let mut chunks = Vec::with_capacity(rest.len() / chunk_size + 1);
    while rest.len() > chunk_size {
        chunks.push(rest.split_to(chunk_size));
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
