//! Endpoint checks against the ComfyUI backend and the gateway.
//!
//! Each [`Target`] is probed by issuing its progress request and then its
//! queue request, one after the other. An answer other than `200 OK` is
//! recorded and the next request still goes out. A transport failure ends
//! the target's run early and marks it [`GroupOutcome::Unreachable`].
//!
//! A [`CheckObserver`] sees every request as it starts and finishes, so a
//! caller can report progress before the whole target is done.

use comfyprobe_comfyui::api::{ComfyUIApi, ComfyUIApiError, Endpoint};

use crate::config::ProbeConfig;

/// A service whose status routes are probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// ComfyUI itself.
    Backend,
    /// Open WebUI, proxying the ComfyUI routes.
    Gateway,
}

impl Target {
    /// Probe order.
    pub const ALL: [Target; 2] = [Target::Backend, Target::Gateway];

    /// Name used in report lines.
    pub fn service_name(self) -> &'static str {
        match self {
            Self::Backend => "ComfyUI",
            Self::Gateway => "Open WebUI",
        }
    }

    /// Configured base URL for this target.
    pub fn base_url(self, config: &ProbeConfig) -> &str {
        match self {
            Self::Backend => &config.comfyui_url,
            Self::Gateway => &config.open_webui_url,
        }
    }

    /// Status client for this target.
    pub fn api(self, client: reqwest::Client, config: &ProbeConfig) -> ComfyUIApi {
        let base_url = self.base_url(config);
        match self {
            Self::Backend => ComfyUIApi::with_client(client, base_url),
            Self::Gateway => ComfyUIApi::via_gateway_with_client(client, base_url),
        }
    }
}

/// Result of a single request that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// `200 OK` with a JSON body.
    Success(serde_json::Value),
    /// Any other status.
    Failed { status: u16 },
}

/// A request that was issued and answered.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointCheck {
    pub endpoint: Endpoint,
    /// Route path relative to the target's base URL.
    pub path: String,
    pub url: String,
    pub outcome: CheckOutcome,
}

/// How a target's run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    /// Every request got an answer (successful or not).
    Completed,
    /// The `endpoint` request failed in transport; later requests were skipped.
    Unreachable { endpoint: Endpoint, error: String },
}

/// Everything observed while probing one target.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub target: Target,
    pub base_url: String,
    pub checks: Vec<EndpointCheck>,
    pub outcome: GroupOutcome,
}

impl GroupReport {
    pub fn is_reachable(&self) -> bool {
        self.outcome == GroupOutcome::Completed
    }
}

/// Receives check progress as it happens. All methods default to no-ops.
pub trait CheckObserver {
    /// A request to `path` is about to be sent.
    fn request_started(&mut self, _target: Target, _endpoint: Endpoint, _path: &str) {}

    /// A request got an answer.
    fn check_finished(&mut self, _target: Target, _check: &EndpointCheck) {}

    /// A request failed in transport; the rest of the target is skipped.
    /// `base_url` is the server that could not be reached.
    fn target_unreachable(&mut self, _target: Target, _base_url: &str, _error: &str) {}
}

impl CheckObserver for () {}

/// Runs endpoint checks with a single shared HTTP client.
pub struct Probe {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl Probe {
    pub fn new(client: reqwest::Client, config: ProbeConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probe one target.
    pub async fn run(&self, target: Target) -> GroupReport {
        self.run_observed(target, &mut ()).await
    }

    /// Probe one target, reporting each request to `observer`.
    pub async fn run_observed(
        &self,
        target: Target,
        observer: &mut impl CheckObserver,
    ) -> GroupReport {
        let api = target.api(self.client.clone(), &self.config);
        run_group(&api, target, observer).await
    }

    /// Probe every target in [`Target::ALL`] order.
    pub async fn run_all(&self) -> Vec<GroupReport> {
        let mut reports = Vec::with_capacity(Target::ALL.len());
        for target in Target::ALL {
            reports.push(self.run(target).await);
        }
        reports
    }
}

/// Issue the progress and queue requests against `api` in order.
pub async fn run_group(
    api: &ComfyUIApi,
    target: Target,
    observer: &mut impl CheckObserver,
) -> GroupReport {
    let mut checks = Vec::with_capacity(Endpoint::ALL.len());
    let mut outcome = GroupOutcome::Completed;

    for endpoint in Endpoint::ALL {
        let path = api.path(endpoint);
        let url = api.url(endpoint);
        observer.request_started(target, endpoint, &path);

        let outcome_of_check = match api.get(endpoint).await {
            Ok(body) => {
                tracing::info!(service = target.service_name(), %url, "Endpoint responded");
                CheckOutcome::Success(body)
            }
            Err(ComfyUIApiError::ApiError { status, body }) => {
                tracing::warn!(
                    service = target.service_name(),
                    %url,
                    status,
                    body = %body,
                    "Endpoint returned an error status",
                );
                CheckOutcome::Failed { status }
            }
            Err(ComfyUIApiError::Request(e)) => {
                tracing::warn!(
                    service = target.service_name(),
                    %url,
                    error = %e,
                    "Endpoint unreachable",
                );
                let error = e.to_string();
                observer.target_unreachable(target, api.origin(), &error);
                outcome = GroupOutcome::Unreachable { endpoint, error };
                break;
            }
        };

        let check = EndpointCheck {
            endpoint,
            path,
            url,
            outcome: outcome_of_check,
        };
        observer.check_finished(target, &check);
        checks.push(check);
    }

    GroupReport {
        target,
        base_url: api.origin().to_string(),
        checks,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_is_probed_first() {
        assert_eq!(Target::ALL, [Target::Backend, Target::Gateway]);
    }

    #[test]
    fn base_url_comes_from_config() {
        let config = ProbeConfig::default();
        assert_eq!(Target::Backend.base_url(&config), config.comfyui_url);
        assert_eq!(Target::Gateway.base_url(&config), config.open_webui_url);
    }

    #[test]
    fn target_api_routes() {
        let config = ProbeConfig::default();
        let client = reqwest::Client::new();

        let backend = Target::Backend.api(client.clone(), &config);
        assert_eq!(backend.path(Endpoint::Progress), "/progress");
        assert_eq!(backend.origin(), "http://host.docker.internal:8188");

        let gateway = Target::Gateway.api(client, &config);
        assert_eq!(
            gateway.path(Endpoint::Queue),
            "/api/v1/images/comfyui/queue"
        );
        assert_eq!(gateway.origin(), "http://localhost:8080");
    }
}
