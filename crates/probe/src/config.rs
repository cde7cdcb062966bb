use std::time::Duration;

/// Default ComfyUI address as seen from inside the Open WebUI container.
pub const DEFAULT_COMFYUI_URL: &str = "http://host.docker.internal:8188";

/// Default Open WebUI address.
pub const DEFAULT_OPEN_WEBUI_URL: &str = "http://localhost:8080";

/// Probe configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Base URL of the ComfyUI backend.
    pub comfyui_url: String,
    /// Base URL of the Open WebUI gateway.
    pub open_webui_url: String,
    /// Per-request timeout. `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            comfyui_url: DEFAULT_COMFYUI_URL.to_string(),
            open_webui_url: DEFAULT_OPEN_WEBUI_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                            |
    /// |------------------------------|------------------------------------|
    /// | `COMFYUI_URL`                | `http://host.docker.internal:8188` |
    /// | `OPEN_WEBUI_URL`             | `http://localhost:8080`            |
    /// | `PROBE_REQUEST_TIMEOUT_SECS` | unset (no timeout)                 |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset. An unparsable timeout is logged and
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let comfyui_url = get("COMFYUI_URL").unwrap_or_else(|| DEFAULT_COMFYUI_URL.into());
        let open_webui_url =
            get("OPEN_WEBUI_URL").unwrap_or_else(|| DEFAULT_OPEN_WEBUI_URL.into());

        let request_timeout = get("PROBE_REQUEST_TIMEOUT_SECS").and_then(|raw| {
            match raw.parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        "PROBE_REQUEST_TIMEOUT_SECS is not a whole number of seconds, ignoring",
                    );
                    None
                }
            }
        });

        Self {
            comfyui_url,
            open_webui_url,
            request_timeout,
        }
    }

    /// Build the HTTP client shared by every check.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
