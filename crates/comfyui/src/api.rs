//! REST client for the ComfyUI status endpoints.
//!
//! Wraps the read-only progress and queue routes using [`reqwest`],
//! either directly against a ComfyUI instance or through an Open WebUI
//! gateway that proxies them under `/api/v1/images/comfyui`.

use reqwest::StatusCode;

/// Route prefix under which the gateway proxies ComfyUI status routes.
pub const GATEWAY_PREFIX: &str = "/api/v1/images/comfyui";

/// A read-only status route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Step progress of the running job.
    Progress,
    /// Running and pending prompts.
    Queue,
}

impl Endpoint {
    /// Request order when probing an instance.
    pub const ALL: [Endpoint; 2] = [Endpoint::Progress, Endpoint::Queue];

    /// Final path segment of the route.
    pub fn name(self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Queue => "queue",
        }
    }
}

/// HTTP client for the status routes of a single ComfyUI instance.
pub struct ComfyUIApi {
    client: reqwest::Client,
    origin: String,
    prefix: &'static str,
}

/// Errors from the ComfyUI REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ComfyUIApiError {
    /// The HTTP request itself failed (network, DNS, TLS, body decode, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with anything other than `200 OK`.
    #[error("ComfyUI API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ComfyUIApi {
    /// Create a client that talks to ComfyUI directly.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8188`.
    pub fn new(api_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a direct client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: &str) -> Self {
        Self {
            client,
            origin: trim_base(api_url).to_string(),
            prefix: "",
        }
    }

    /// Create a client that reaches ComfyUI through the gateway proxy.
    ///
    /// * `gateway_url` - Base HTTP URL of the gateway, e.g. `http://localhost:8080`.
    pub fn via_gateway(gateway_url: &str) -> Self {
        Self::via_gateway_with_client(reqwest::Client::new(), gateway_url)
    }

    /// Gateway variant of [`with_client`](Self::with_client).
    pub fn via_gateway_with_client(client: reqwest::Client, gateway_url: &str) -> Self {
        Self {
            client,
            origin: trim_base(gateway_url).to_string(),
            prefix: GATEWAY_PREFIX,
        }
    }

    /// Configured server URL, without the route prefix.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Path of `endpoint` relative to [`origin`](Self::origin).
    pub fn path(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.prefix, endpoint.name())
    }

    /// Full URL of `endpoint`.
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.origin, self.path(endpoint))
    }

    pub fn progress_url(&self) -> String {
        self.url(Endpoint::Progress)
    }

    pub fn queue_url(&self) -> String {
        self.url(Endpoint::Queue)
    }

    /// Send `GET` to `endpoint` and return the JSON body unchanged.
    pub async fn get(&self, endpoint: Endpoint) -> Result<serde_json::Value, ComfyUIApiError> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "Requesting ComfyUI status");

        let response = self.client.get(&url).send().await?;
        let response = Self::ensure_ok(response).await?;
        let body = response.json::<serde_json::Value>().await?;

        tracing::debug!(%url, "ComfyUI status received");
        Ok(body)
    }

    /// Fetch the current job progress (`GET /progress`).
    pub async fn get_progress(&self) -> Result<serde_json::Value, ComfyUIApiError> {
        self.get(Endpoint::Progress).await
    }

    /// Fetch the execution queue (`GET /queue`). Use
    /// [`QueueSnapshot`](crate::status::QueueSnapshot) to read counts.
    pub async fn get_queue(&self) -> Result<serde_json::Value, ComfyUIApiError> {
        self.get(Endpoint::Queue).await
    }

    // ---- private helpers ----

    /// Only `200 OK` counts as an answer; every other status becomes a
    /// [`ComfyUIApiError::ApiError`] carrying the status and body text.
    async fn ensure_ok(response: reqwest::Response) -> Result<reqwest::Response, ComfyUIApiError> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ComfyUIApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
