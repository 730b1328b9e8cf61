//! JSON:API registry client over HTTP.

use async_trait::async_trait;
use relpub_schema::{Release, ReleaseDescriptor, UploadTarget};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::io::ReaderStream;

use super::{Registry, RegistryError, UploadBody};

const JSON_API: &str = "application/vnd.api+json";

/// Size of each chunk pulled from the upload body.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Registry reachable over HTTP, authenticated with a product token.
///
/// Releases are upserted at `{api_url}/v1/accounts/{account}/releases`;
/// the artifact endpoint answers with a redirect whose `Location` is the
/// upload target.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: Client,
    api_url: String,
    account: String,
    token: String,
}

#[derive(Deserialize)]
struct Document {
    data: Resource,
}

#[derive(Deserialize)]
struct Resource {
    id: String,
}

#[derive(Deserialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
    #[serde(default)]
    code: Option<String>,
}

impl HttpRegistry {
    /// Create a client for `account` at `api_url`.
    pub fn new(
        api_url: &str,
        account: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        // Redirects carry the upload target, so they must not be followed.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            account: account.into(),
            token: token.into(),
        })
    }

    fn releases_url(&self) -> String {
        format!("{}/v1/accounts/{}/releases", self.api_url, self.account)
    }

    fn artifact_url(&self, release_id: &str) -> String {
        format!("{}/{release_id}/artifact", self.releases_url())
    }

    async fn request_upload_target(&self, release_id: &str) -> Result<UploadTarget, RegistryError> {
        let resp = self
            .client
            .put(self.artifact_url(release_id))
            .header(USER_AGENT, crate::USER_AGENT)
            .header(ACCEPT, JSON_API)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !resp.status().is_redirection() {
            return Err(api_error(resp).await);
        }

        resp.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(UploadTarget::new)
            .ok_or_else(|| RegistryError::MissingUploadTarget(release_id.to_string()))
    }
}

#[async_trait]
impl Registry for HttpRegistry {
    async fn upsert_release(
        &self,
        descriptor: &ReleaseDescriptor,
    ) -> Result<Release, RegistryError> {
        tracing::debug!(
            "Upserting release {} {} for product {}",
            descriptor.filename,
            descriptor.version,
            descriptor.product
        );

        let resp = self
            .client
            .put(self.releases_url())
            .header(USER_AGENT, crate::USER_AGENT)
            .header(ACCEPT, JSON_API)
            .header(CONTENT_TYPE, JSON_API)
            .bearer_auth(&self.token)
            .body(release_document(descriptor).to_string())
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        let doc: Document = resp.json().await?;
        let upload_target = self.request_upload_target(&doc.data.id).await?;

        Ok(Release {
            id: doc.data.id,
            upload_target,
        })
    }

    async fn upload(
        &self,
        target: &UploadTarget,
        body: UploadBody,
        content_length: u64,
    ) -> Result<(), RegistryError> {
        let stream = ReaderStream::with_capacity(body, UPLOAD_CHUNK_SIZE);

        // Storage targets are pre-signed; no registry credentials here.
        let resp = self
            .client
            .put(target.url())
            .header(USER_AGENT, crate::USER_AGENT)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, content_length)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RegistryError::Transfer {
                status: resp.status().as_u16(),
            });
        }

        Ok(())
    }
}

/// JSON:API document for a release upsert.
fn release_document(d: &ReleaseDescriptor) -> Value {
    let constraints: Vec<Value> = d
        .constraints
        .iter()
        .map(|id| {
            json!({
                "type": "constraints",
                "relationships": {
                    "entitlement": { "data": { "type": "entitlements", "id": id } }
                }
            })
        })
        .collect();

    json!({
        "data": {
            "type": "releases",
            "attributes": {
                "name": d.name,
                "description": d.description,
                "version": d.version,
                "filename": d.filename,
                "filesize": d.filesize,
                "filetype": d.filetype,
                "platform": d.platform,
                "channel": d.channel,
                "signature": d.signature,
                "checksum": d.checksum,
            },
            "relationships": {
                "product": { "data": { "type": "products", "id": d.product } },
                "constraints": { "data": constraints }
            }
        }
    })
}

/// Map a failed response to a structured error when the body allows it.
async fn api_error(resp: Response) -> RegistryError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();

    let first = serde_json::from_str::<ErrorDocument>(&body)
        .ok()
        .and_then(|doc| doc.errors.into_iter().next());

    match first {
        Some(e) => RegistryError::Api {
            code: e
                .code
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| RegistryError::DEFAULT_CODE.to_string()),
            title: e.title,
            detail: e.detail,
        },
        None => RegistryError::Status { status },
    }
}
