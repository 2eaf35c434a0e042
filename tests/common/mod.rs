//! Test helpers for integration tests.
//!
//! Provides an in-process mock of the GitHub REST API and helpers to build
//! configurations pointing at it.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use sitedeploy::Config;

/// Token the mock accepts.
pub const GOOD_TOKEN: &str = "good";

/// Login of the mock user.
pub const LOGIN: &str = "octocat";

/// A recorded contents write.
#[derive(Debug, Clone)]
pub struct PutRecord {
    pub path: String,
    pub message: String,
    pub branch: String,
    pub sha: Option<String>,
}

/// Mutable state of the mock server.
#[derive(Debug, Default)]
pub struct MockState {
    pub repos: HashSet<String>,
    pub created_repos: Vec<String>,
    /// Stored files: path -> (sha, content).
    pub files: HashMap<String, (String, Vec<u8>)>,
    pub puts: Vec<PutRecord>,
    pub pages_enabled: bool,
    pub pages_requests: usize,
    /// Writes to this path fail with 422.
    pub fail_path: Option<String>,
    /// Delay before answering the user lookup.
    pub user_delay_ms: u64,
    next_sha: usize,
}

/// Mock GitHub API bound to a random local port.
pub struct MockGitHub {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<MockState>>,
}

impl MockGitHub {
    /// Start the mock with no repositories.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));

        let router = Router::new()
            .route("/user", get(get_user))
            .route("/user/repos", post(create_repo))
            .route("/repos/:owner/:repo", get(get_repo))
            .route("/repos/:owner/:repo/pages", post(enable_pages))
            .route(
                "/repos/:owner/:repo/contents/*path",
                get(get_contents).put(put_contents),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock GitHub");
        let addr = listener.local_addr().expect("Failed to get mock address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { addr, state }
    }

    /// Start the mock with `repo` already present.
    pub async fn with_repo(repo: &str) -> Self {
        let mock = Self::start().await;
        mock.state.lock().unwrap().repos.insert(repo.to_string());
        mock
    }

    /// Base URL of the mock API.
    pub fn api_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Configuration targeting this mock, with all waits disabled.
    pub fn config(&self) -> Config {
        self.config_with_token(GOOD_TOKEN)
    }

    /// Same as [`MockGitHub::config`] with a custom token.
    pub fn config_with_token(&self, token: &str) -> Config {
        let mut config = Config::default();
        config.github.api_base = self.api_base();
        config.github.token = token.to_string();
        config.github.repository = "sites".to_string();
        config.github.repo_create_wait_ms = 0;
        config.github.pages_settle_ms = 0;
        config.mirror.base = "mirror".to_string();
        config
    }

    /// Make writes to `path` fail.
    pub fn fail_on(&self, path: &str) {
        self.state.lock().unwrap().fail_path = Some(path.to_string());
    }

    /// Hold every user lookup for `ms` milliseconds.
    pub fn delay_user(&self, ms: u64) {
        self.state.lock().unwrap().user_delay_ms = ms;
    }

    /// Paths written, in order.
    pub fn put_paths(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .puts
            .iter()
            .map(|p| p.path.clone())
            .collect()
    }

    /// Content stored at `path`.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|(_, content)| content.clone())
    }
}

type Shared = State<Arc<Mutex<MockState>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("token {GOOD_TOKEN}"))
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn bad_credentials() -> Response {
    error(StatusCode::UNAUTHORIZED, "Bad credentials")
}

async fn get_user(State(state): Shared, headers: HeaderMap) -> Response {
    let delay = state.lock().unwrap().user_delay_ms;
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }
    if !authorized(&headers) {
        return bad_credentials();
    }
    Json(json!({ "login": LOGIN, "id": 1 })).into_response()
}

#[derive(Deserialize)]
struct CreateRepo {
    name: String,
    auto_init: bool,
}

async fn create_repo(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<CreateRepo>,
) -> Response {
    if !authorized(&headers) {
        return bad_credentials();
    }
    assert!(body.auto_init, "repository must be initialised");

    let mut state = state.lock().unwrap();
    if !state.repos.insert(body.name.clone()) {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "name already exists on this account",
        );
    }
    state.created_repos.push(body.name.clone());
    (
        StatusCode::CREATED,
        Json(json!({
            "name": body.name,
            "full_name": format!("{LOGIN}/{}", body.name),
            "default_branch": "main",
        })),
    )
        .into_response()
}

async fn get_repo(
    State(state): Shared,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    if !authorized(&headers) {
        return bad_credentials();
    }
    if owner != LOGIN || !state.lock().unwrap().repos.contains(&repo) {
        return error(StatusCode::NOT_FOUND, "Not Found");
    }
    Json(json!({
        "name": repo,
        "full_name": format!("{owner}/{repo}"),
        "default_branch": "main",
    }))
    .into_response()
}

async fn get_contents(
    State(state): Shared,
    headers: HeaderMap,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
) -> Response {
    if !authorized(&headers) {
        return bad_credentials();
    }
    let state = state.lock().unwrap();
    match state.files.get(&path) {
        Some((sha, content)) => Json(json!({
            "type": "file",
            "path": path,
            "sha": sha,
            "size": content.len(),
        }))
        .into_response(),
        None => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

#[derive(Deserialize)]
struct PutBody {
    message: String,
    content: String,
    branch: String,
    #[serde(default)]
    sha: Option<String>,
}

async fn put_contents(
    State(state): Shared,
    headers: HeaderMap,
    Path((_owner, repo, path)): Path<(String, String, String)>,
    Json(body): Json<PutBody>,
) -> Response {
    if !authorized(&headers) {
        return bad_credentials();
    }

    let mut state = state.lock().unwrap();
    if !state.repos.contains(&repo) {
        return error(StatusCode::NOT_FOUND, "Not Found");
    }
    state.puts.push(PutRecord {
        path: path.clone(),
        message: body.message,
        branch: body.branch,
        sha: body.sha.clone(),
    });

    if state.fail_path.as_deref() == Some(path.as_str()) {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid request");
    }

    let current = state.files.get(&path).map(|(sha, _)| sha.clone());
    if current != body.sha {
        return error(StatusCode::CONFLICT, &format!("{path} does not match"));
    }

    let Ok(content) = STANDARD.decode(body.content.as_bytes()) else {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "content is not valid Base64");
    };

    state.next_sha += 1;
    let sha = format!("sha-{}", state.next_sha);
    let status = if current.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    state.files.insert(path.clone(), (sha.clone(), content));

    (
        status,
        Json(json!({ "content": { "path": path, "sha": sha } })),
    )
        .into_response()
}

async fn enable_pages(
    State(state): Shared,
    headers: HeaderMap,
    Path((_owner, _repo)): Path<(String, String)>,
) -> Response {
    if !authorized(&headers) {
        return bad_credentials();
    }
    let mut state = state.lock().unwrap();
    state.pages_requests += 1;
    if state.pages_enabled {
        return error(
            StatusCode::CONFLICT,
            "GitHub Pages is already enabled.",
        );
    }
    state.pages_enabled = true;
    (StatusCode::CREATED, Json(json!({ "status": "queued" }))).into_response()
}
