// ABOUTME: HTTP/1.1 JSON provider for a distribution control-plane gateway.
// ABOUTME: Uses a hyper client connection per request over a tokio TcpStream.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde_json::{Value, json};
use snafu::{ResultExt, Snafu};
use std::time::Duration;
use tokio::net::TcpStream;

use super::{DistributionOps, ProviderError};
use crate::distribution::{
    ConfigSnapshot, DeploymentStatus, InvalidationRequest, StatusSnapshot,
};
use crate::types::{DistributionId, VersionTag};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level failures talking to the gateway.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HttpError {
    #[snafu(display("invalid endpoint '{endpoint}': {reason}"))]
    InvalidEndpoint { endpoint: String, reason: String },

    #[snafu(display("failed to connect to {authority}: {source}"))]
    Connect {
        authority: String,
        source: std::io::Error,
    },

    #[snafu(display("HTTP handshake with {authority} failed: {source}"))]
    Handshake {
        authority: String,
        source: hyper::Error,
    },

    #[snafu(display("failed to build request: {message}"))]
    BuildRequest { message: String },

    #[snafu(display("{method} {path} failed: {source}"))]
    Send {
        method: Method,
        path: String,
        source: hyper::Error,
    },

    #[snafu(display("failed to read response body: {source}"))]
    ReadBody { source: hyper::Error },

    #[snafu(display("{method} {path} timed out after {}s", timeout.as_secs()))]
    Timeout {
        method: Method,
        path: String,
        timeout: Duration,
    },
}

struct HttpResponse {
    status: StatusCode,
    etag: Option<String>,
    body: Bytes,
}

impl HttpResponse {
    fn etag(&self) -> Result<VersionTag, ProviderError> {
        self.etag
            .clone()
            .map(VersionTag::new)
            .ok_or_else(|| ProviderError::InvalidResponse("missing ETag header".to_string()))
    }

    fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON body: {}", e)))
    }

    /// Map statuses shared by every endpoint.
    fn unexpected(&self, id: &DistributionId) -> ProviderError {
        match self.status {
            StatusCode::NOT_FOUND => ProviderError::NotFound(id.clone()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::AccessDenied(self.body_text())
            }
            status => ProviderError::Transport(format!("HTTP {}: {}", status, self.body_text())),
        }
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

#[derive(Deserialize)]
struct StatusBody {
    #[serde(rename = "Status")]
    status: String,
}

/// Provider speaking JSON over plain HTTP to a control-plane gateway.
///
/// Endpoints, relative to the base URL:
/// - `GET  distributions/{id}/config` returns the configuration and `ETag`
/// - `GET  distributions/{id}` returns `{"Status": ...}` and `ETag`
/// - `PUT  distributions/{id}/config` with `If-Match`
/// - `POST distributions/{id}/invalidations`
#[derive(Debug, Clone)]
pub struct HttpProvider {
    host: String,
    port: u16,
    base_path: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpProvider {
    /// Create a provider for an `http://host[:port][/prefix]` endpoint.
    pub fn new(endpoint: &str) -> Result<Self, HttpError> {
        let uri = endpoint
            .parse::<Uri>()
            .map_err(|e| HttpError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        match uri.scheme_str() {
            Some("http") => {}
            other => {
                return InvalidEndpointSnafu {
                    endpoint,
                    reason: format!("unsupported scheme {:?}, expected http", other),
                }
                .fail();
            }
        }

        // IPv6 literals arrive bracketed; sockets want the bare address
        let host = uri
            .host()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
            .filter(|h| !h.is_empty())
            .ok_or_else(|| HttpError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "missing host".to_string(),
            })?;

        Ok(Self {
            host: host.to_string(),
            port: uri.port_u16().unwrap_or(80),
            base_path: uri.path().trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    fn distribution_path(&self, id: &DistributionId, suffix: &str) -> String {
        format!(
            "{}/distributions/{}{}",
            self.base_path,
            urlencoding::encode(id.as_str()),
            suffix
        )
    }

    async fn send(
        &self,
        method: Method,
        path: String,
        if_match: Option<&VersionTag>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, HttpError> {
        let timeout = self.timeout;
        let result =
            tokio::time::timeout(timeout, self.send_inner(method.clone(), &path, if_match, body))
                .await;
        match result {
            Ok(result) => result,
            Err(_) => TimeoutSnafu {
                method,
                path,
                timeout,
            }
            .fail(),
        }
    }

    async fn send_inner(
        &self,
        method: Method,
        path: &str,
        if_match: Option<&VersionTag>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, HttpError> {
        let authority = self.authority();
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .context(ConnectSnafu {
                authority: authority.clone(),
            })?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .context(HandshakeSnafu {
                authority: authority.clone(),
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("provider connection error: {}", e);
            }
        });

        let mut builder = hyper::Request::builder()
            .method(method.clone())
            .uri(path)
            .header("Host", authority)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(tag) = if_match {
            builder = builder.header("If-Match", tag.as_str());
        }
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }

        let req = builder
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .map_err(|e| HttpError::BuildRequest {
                message: e.to_string(),
            })?;

        tracing::debug!(%method, path, "provider request");
        let resp = sender.send_request(req).await.context(SendSnafu {
            method,
            path: path.to_string(),
        })?;

        let status = resp.status();
        let etag = resp
            .headers()
            .get("ETag")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string());
        let body = resp.into_body().collect().await.context(ReadBodySnafu)?;

        Ok(HttpResponse {
            status,
            etag,
            body: body.to_bytes(),
        })
    }
}

#[async_trait]
impl DistributionOps for HttpProvider {
    async fn get_config(&self, id: &DistributionId) -> Result<ConfigSnapshot, ProviderError> {
        let path = self.distribution_path(id, "/config");
        let resp = self.send(Method::GET, path, None, None).await?;

        if resp.status != StatusCode::OK {
            return Err(resp.unexpected(id));
        }

        Ok(ConfigSnapshot {
            version: resp.etag()?,
            config: resp.json::<Value>()?,
        })
    }

    async fn get_status(&self, id: &DistributionId) -> Result<StatusSnapshot, ProviderError> {
        let path = self.distribution_path(id, "");
        let resp = self.send(Method::GET, path, None, None).await?;

        if resp.status != StatusCode::OK {
            return Err(resp.unexpected(id));
        }

        let body: StatusBody = resp.json()?;
        Ok(StatusSnapshot {
            version: resp.etag()?,
            status: DeploymentStatus::from_provider(&body.status),
        })
    }

    async fn update_config(
        &self,
        id: &DistributionId,
        if_match: &VersionTag,
        config: &Value,
    ) -> Result<VersionTag, ProviderError> {
        let body = serde_json::to_vec(config)
            .map_err(|e| ProviderError::InvalidResponse(format!("unserializable config: {}", e)))?;
        let path = self.distribution_path(id, "/config");
        let resp = self
            .send(Method::PUT, path, Some(if_match), Some(body))
            .await?;

        match resp.status {
            StatusCode::OK => resp.etag(),
            StatusCode::PRECONDITION_FAILED => {
                Err(ProviderError::PreconditionFailed(if_match.clone()))
            }
            _ => Err(resp.unexpected(id)),
        }
    }

    async fn create_invalidation(
        &self,
        id: &DistributionId,
        request: &InvalidationRequest,
    ) -> Result<(), ProviderError> {
        let body = json!({
            "CallerReference": request.caller_reference,
            "Paths": {
                "Quantity": request.paths.len(),
                "Items": request.paths,
            },
        });
        let body = serde_json::to_vec(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("unserializable request: {}", e)))?;
        let path = self.distribution_path(id, "/invalidations");
        let resp = self.send(Method::POST, path, None, Some(body)).await?;

        match resp.status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(()),
            StatusCode::CONFLICT => Err(ProviderError::ReferenceConflict(
                request.caller_reference.clone(),
            )),
            _ => Err(resp.unexpected(id)),
        }
    }
}
