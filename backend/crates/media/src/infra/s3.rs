//! S3 Adapter
//!
//! Talks to S3 or any S3-compatible store through presigned URLs. Without a
//! custom endpoint, virtual-hosted addressing is used
//! (`{bucket}.s3.{region}.amazonaws.com/{key}`); with one, path-style
//! (`{endpoint}/{bucket}/{key}`).

use axum::body::Bytes;
use chrono::Utc;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

use crate::application::config::MediaConfig;
use crate::domain::object_key::ObjectKey;
use crate::domain::storage::ObjectStorage;
use crate::error::{MediaError, MediaResult};
use crate::infra::sigv4::{PresignRequest, SigningKey, presign};

/// Lifetime of the URLs used for our own PUT and DELETE calls
const WRITE_URL_TTL_SECS: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    scheme: String,
    authority: String,
    /// Prepended to every object path; empty for virtual-hosted addressing
    path_prefix: String,
}

impl Endpoint {
    fn resolve(bucket: &str, region: &str, custom: Option<&str>) -> MediaResult<Self> {
        let Some(raw) = custom else {
            return Ok(Self {
                scheme: "https".to_owned(),
                authority: format!("{bucket}.s3.{region}.amazonaws.com"),
                path_prefix: String::new(),
            });
        };

        let url = Url::parse(raw).map_err(|e| MediaError::Config(format!("S3_ENDPOINT: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| MediaError::Config("S3_ENDPOINT has no host".to_owned()))?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };

        Ok(Self {
            scheme: url.scheme().to_owned(),
            authority,
            path_prefix: format!("{}/{bucket}", url.path().trim_end_matches('/')),
        })
    }
}

pub struct S3Storage {
    client: reqwest::Client,
    endpoint: Endpoint,
    signing_key: SigningKey,
}

impl S3Storage {
    pub fn new(config: &MediaConfig) -> MediaResult<Self> {
        let endpoint = Endpoint::resolve(&config.bucket, &config.region, config.endpoint.as_deref())?;
        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            host = %endpoint.authority,
            "Object storage configured"
        );

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            signing_key: SigningKey {
                access_key_id: config.access_key_id.clone(),
                secret_access_key: config.secret_access_key.clone(),
                region: config.region.clone(),
            },
        })
    }

    fn signed_url(&self, method: &str, key: &ObjectKey, expires_in_secs: u32) -> String {
        let path = format!("{}/{}", self.endpoint.path_prefix, key.as_str());
        let request = PresignRequest {
            method,
            scheme: &self.endpoint.scheme,
            authority: &self.endpoint.authority,
            path: &path,
            expires_in_secs,
        };
        presign(&self.signing_key, &request, Utc::now())
    }
}

impl ObjectStorage for S3Storage {
    async fn put_object(&self, key: &ObjectKey, content_type: &str, body: Bytes) -> MediaResult<()> {
        let url = self.signed_url("PUT", key, WRITE_URL_TTL_SECS);
        let size = body.len();

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MediaError::Storage {
                operation: "upload",
                status: response.status().as_u16(),
            });
        }

        tracing::info!(key = %key, size, content_type, "Object stored");
        Ok(())
    }

    async fn delete_object(&self, key: &ObjectKey) -> MediaResult<()> {
        let url = self.signed_url("DELETE", key, WRITE_URL_TTL_SECS);
        let response = self.client.delete(url).send().await?;

        // S3 answers 204 for both deleted and missing keys
        if !response.status().is_success() {
            return Err(MediaError::Storage {
                operation: "delete",
                status: response.status().as_u16(),
            });
        }

        tracing::info!(key = %key, "Object deleted");
        Ok(())
    }

    fn presigned_get_url(&self, key: &ObjectKey, expires_in_secs: u32) -> String {
        self.signed_url("GET", key, expires_in_secs)
    }
}
