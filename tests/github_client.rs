//! GitHub Client Tests
//!
//! Integration tests for the REST client against the mock GitHub API.

mod common;

use common::{MockGitHub, LOGIN};
use sitedeploy::github::{GitHubClient, PagesStatus};
use sitedeploy::DeployerError;

#[tokio::test]
async fn test_authenticated_user() {
    let mock = MockGitHub::start().await;
    let client = GitHubClient::new(&mock.config().github).unwrap();

    let user = client.authenticated_user().await.unwrap();
    assert_eq!(user.login, LOGIN);
}

#[tokio::test]
async fn test_authenticated_user_bad_token() {
    let mock = MockGitHub::start().await;
    let client = GitHubClient::new(&mock.config_with_token("bad").github).unwrap();

    let err = client.authenticated_user().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid GitHub token. Please check your configuration."
    );
}

#[tokio::test]
async fn test_get_and_create_repository() {
    let mock = MockGitHub::start().await;
    let client = GitHubClient::new(&mock.config().github).unwrap();

    assert!(client.get_repository(LOGIN, "sites").await.unwrap().is_none());

    let created = client.create_repository("sites").await.unwrap();
    assert_eq!(created.name, "sites");
    assert_eq!(created.full_name, "octocat/sites");

    let found = client.get_repository(LOGIN, "sites").await.unwrap();
    assert_eq!(found.unwrap().default_branch.as_deref(), Some("main"));
}

#[tokio::test]
async fn test_create_repository_conflict_surfaces_message() {
    let mock = MockGitHub::with_repo("sites").await;
    let client = GitHubClient::new(&mock.config().github).unwrap();

    let err = client.create_repository("sites").await.unwrap_err();
    assert!(matches!(err, DeployerError::GitHub(_)));
    assert_eq!(
        err.to_string(),
        "Failed to create repository: name already exists on this account"
    );
}

#[tokio::test]
async fn test_put_file_creates_then_overwrites() {
    let mock = MockGitHub::with_repo("sites").await;
    let client = GitHubClient::new(&mock.config().github).unwrap();

    client
        .put_file(LOGIN, "sites", "public/a/index.html", b"v1", "Deploy v1", "main")
        .await
        .unwrap();
    let sha = client
        .file_sha(LOGIN, "sites", "public/a/index.html", "main")
        .await
        .unwrap();
    assert_eq!(sha.as_deref(), Some("sha-1"));

    client
        .put_file(LOGIN, "sites", "public/a/index.html", b"v2", "Deploy v2", "main")
        .await
        .unwrap();

    assert_eq!(mock.file("public/a/index.html").unwrap(), b"v2");
    let state = mock.state.lock().unwrap();
    assert_eq!(state.puts.len(), 2);
    assert_eq!(state.puts[0].sha, None);
    assert_eq!(state.puts[1].sha.as_deref(), Some("sha-1"));
    assert_eq!(state.puts[1].message, "Deploy v2");
    assert_eq!(state.puts[1].branch, "main");
}

#[tokio::test]
async fn test_put_file_encodes_path_segments() {
    let mock = MockGitHub::with_repo("sites").await;
    let client = GitHubClient::new(&mock.config().github).unwrap();

    client
        .put_file(
            LOGIN,
            "sites",
            "public/my site/img/logo #1.png",
            &[0, 1, 2, 255],
            "Deploy logo",
            "main",
        )
        .await
        .unwrap();

    assert_eq!(
        mock.file("public/my site/img/logo #1.png").unwrap(),
        vec![0, 1, 2, 255]
    );
}

#[tokio::test]
async fn test_put_file_failure_is_verbatim() {
    let mock = MockGitHub::with_repo("sites").await;
    mock.fail_on("public/a/app.js");
    let client = GitHubClient::new(&mock.config().github).unwrap();

    let err = client
        .put_file(LOGIN, "sites", "public/a/app.js", b"x", "Deploy", "main")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to upload public/a/app.js: Invalid request"
    );
}

#[tokio::test]
async fn test_file_sha_missing() {
    let mock = MockGitHub::with_repo("sites").await;
    let client = GitHubClient::new(&mock.config().github).unwrap();

    let sha = client
        .file_sha(LOGIN, "sites", "public/none.css", "main")
        .await
        .unwrap();
    assert!(sha.is_none());
}

#[tokio::test]
async fn test_enable_pages_twice() {
    let mock = MockGitHub::with_repo("sites").await;
    let client = GitHubClient::new(&mock.config().github).unwrap();

    let first = client.enable_pages(LOGIN, "sites", "main").await.unwrap();
    let second = client.enable_pages(LOGIN, "sites", "main").await.unwrap();

    assert_eq!(first, PagesStatus::Enabled);
    assert_eq!(second, PagesStatus::AlreadyEnabled);
}

#[tokio::test]
async fn test_unreachable_api_is_github_error() {
    let mut config = sitedeploy::Config::default();
    config.github.api_base = "http://127.0.0.1:1".to_string();
    config.github.token = "good".to_string();
    config.github.connect_timeout_secs = 1;
    let client = GitHubClient::new(&config.github).unwrap();

    let err = client.get_repository(LOGIN, "sites").await.unwrap_err();
    assert!(matches!(err, DeployerError::GitHub(_)));
}
