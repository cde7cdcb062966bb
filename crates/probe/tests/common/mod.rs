use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::sync::Notify;

use comfyprobe::config::ProbeConfig;

/// Canned response for one path: status code and raw JSON body.
pub type Canned = (StatusCode, &'static str);

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, Canned>>,
    hang: Option<(String, Arc<Notify>)>,
    hits: Arc<Mutex<Vec<String>>>,
}

/// An in-process HTTP server that answers from a fixed route table and
/// records every path it was asked for.
pub struct StubServer {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Start a stub server on an ephemeral localhost port. Unknown paths get 404.
pub async fn spawn_stub(routes: &[(&str, Canned)]) -> StubServer {
    start(routes, None).await
}

/// Like [`spawn_stub`], but requests to `hang_path` never get an answer.
/// The returned [`Notify`] fires when that request arrives.
pub async fn spawn_stub_with_hang(
    routes: &[(&str, Canned)],
    hang_path: &str,
) -> (StubServer, Arc<Notify>) {
    let arrived = Arc::new(Notify::new());
    let stub = start(routes, Some((hang_path.to_string(), arrived.clone()))).await;
    (stub, arrived)
}

async fn start(routes: &[(&str, Canned)], hang: Option<(String, Arc<Notify>)>) -> StubServer {
    let hits = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        routes: Arc::new(
            routes
                .iter()
                .map(|(path, canned)| (path.to_string(), *canned))
                .collect(),
        ),
        hang,
        hits: hits.clone(),
    };

    let app = Router::new().fallback(answer).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

async fn answer(State(state): State<StubState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    state.hits.lock().unwrap().push(path.clone());

    if let Some((hang_path, arrived)) = &state.hang {
        if *hang_path == path {
            arrived.notify_one();
            std::future::pending::<()>().await;
        }
    }

    match state.routes.get(&path) {
        Some((status, body)) => {
            (*status, [(CONTENT_TYPE, "application/json")], *body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Config pointing both targets at the given base URLs.
pub fn config_for(comfyui_url: &str, open_webui_url: &str) -> ProbeConfig {
    ProbeConfig {
        comfyui_url: comfyui_url.to_string(),
        open_webui_url: open_webui_url.to_string(),
        request_timeout: None,
    }
}
