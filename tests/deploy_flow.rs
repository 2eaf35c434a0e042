//! Deployment Flow Tests
//!
//! End-to-end tests of the deployer against the mock GitHub API.

mod common;

use common::MockGitHub;
use sitedeploy::staging::{Entry, StagingTree, PLACEHOLDER_CONTENT};
use sitedeploy::{DeployEvent, DeployOutcome, Deployer, DeployerError, Config};
use tokio::sync::mpsc;

/// A site with nested folders, one nested asset and one root asset.
fn sample_tree() -> StagingTree {
    let mut tree = StagingTree::new();
    tree.set_primary(Entry::from_bytes("home.html", b"<h1>Hello</h1>".to_vec()))
        .unwrap();
    tree.create_folder("img").unwrap();
    tree.create_subfolder("img", "icons").unwrap();
    tree.add_entries(vec![
        Entry::from_bytes("logo.png", vec![1u8; 16]),
        Entry::from_bytes("app.js", b"console.log(1)".to_vec()),
    ]);
    tree.assign_entry("logo.png", "img/icons").unwrap();
    tree
}

/// Run a deployment and collect every event it emitted.
async fn run_deploy(
    config: &Config,
    tree: &StagingTree,
    site: &str,
) -> (Result<DeployOutcome, DeployerError>, Vec<DeployEvent>) {
    let deployer = Deployer::new(config).unwrap();
    let plan = deployer.plan(tree, site).unwrap();

    let (tx, mut rx) = mpsc::channel(128);
    let result = deployer.execute(plan, &tx).await;
    drop(tx);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (result, events)
}

#[tokio::test]
async fn test_deploy_creates_repository_and_uploads_in_order() {
    let mock = MockGitHub::start().await;
    let (result, _) = run_deploy(&mock.config(), &sample_tree(), "blog").await;
    let outcome = result.unwrap();

    assert_eq!(mock.state.lock().unwrap().created_repos, vec!["sites"]);
    assert_eq!(
        mock.put_paths(),
        vec![
            "public/blog/index.html",
            "public/blog/img/.gitkeep",
            "public/blog/img/icons/.gitkeep",
            "public/blog/img/icons/logo.png",
            "public/blog/app.js",
        ]
    );
    assert_eq!(mock.file("public/blog/index.html").unwrap(), b"<h1>Hello</h1>");
    assert_eq!(
        mock.file("public/blog/img/.gitkeep").unwrap(),
        PLACEHOLDER_CONTENT
    );
    assert!(mock.state.lock().unwrap().pages_enabled);

    assert_eq!(outcome.site_name, "blog");
    assert_eq!(outcome.site_path, "public/blog/");
    assert_eq!(outcome.pages_url, "https://octocat.github.io/sites/public/blog/");
    assert_eq!(outcome.mirror_url, "https://mirror.netlify.app/public/blog");
    assert_eq!(outcome.primary_source, "home.html");
    assert_eq!(outcome.uploaded, 5);
    assert_eq!(outcome.asset_count, 2);
}

#[tokio::test]
async fn test_deploy_commit_messages() {
    let mock = MockGitHub::start().await;
    let (result, _) = run_deploy(&mock.config(), &sample_tree(), "blog").await;
    result.unwrap();

    let state = mock.state.lock().unwrap();
    let messages: Vec<&str> = state.puts.iter().map(|p| p.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Deploy public/blog/index.html",
            "Create folder img",
            "Create folder img/icons",
            "Deploy public/blog/img/icons/logo.png",
            "Deploy public/blog/app.js",
        ]
    );
}

#[tokio::test]
async fn test_deploy_progress_events() {
    let mock = MockGitHub::start().await;
    let (result, events) = run_deploy(&mock.config(), &sample_tree(), "blog").await;
    let outcome = result.unwrap();

    assert!(matches!(
        &events[0],
        DeployEvent::Started { site_name, total: 5, .. } if site_name == "blog"
    ));
    assert!(matches!(
        events.last(),
        Some(DeployEvent::Completed { outcome: o }) if o == &outcome
    ));

    let percents: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            DeployEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents.first(), Some(&10));
    assert_eq!(percents.last(), Some(&100));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert!(percents.contains(&70));
    assert!(percents.contains(&90));

    let uploads = events
        .iter()
        .filter(|e| matches!(e, DeployEvent::Progress { message, .. } if message.starts_with("Uploading files... (")))
        .count();
    assert_eq!(uploads, 5);
}

#[tokio::test]
async fn test_deploy_stops_at_first_failure() {
    let mock = MockGitHub::start().await;
    mock.fail_on("public/blog/img/.gitkeep");

    let (result, events) = run_deploy(&mock.config(), &sample_tree(), "blog").await;
    let err = result.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to upload public/blog/img/.gitkeep: Invalid request"
    );
    assert_eq!(
        mock.put_paths(),
        vec!["public/blog/index.html", "public/blog/img/.gitkeep"]
    );
    // Already written files stay.
    assert!(mock.file("public/blog/index.html").is_some());
    assert!(!mock.state.lock().unwrap().pages_enabled);
    assert!(matches!(
        events.last(),
        Some(DeployEvent::Failed { error }) if error == "Failed to upload public/blog/img/.gitkeep: Invalid request"
    ));
}

#[tokio::test]
async fn test_redeploy_overwrites_existing_files() {
    let mock = MockGitHub::with_repo("sites").await;
    let config = mock.config();

    let (first, _) = run_deploy(&config, &sample_tree(), "blog").await;
    first.unwrap();

    let mut tree = sample_tree();
    tree.set_primary(Entry::from_bytes("home.html", b"<h1>v2</h1>".to_vec()))
        .unwrap();
    let (second, _) = run_deploy(&config, &tree, "blog").await;
    second.unwrap();

    assert_eq!(mock.file("public/blog/index.html").unwrap(), b"<h1>v2</h1>");
    let state = mock.state.lock().unwrap();
    assert!(state.created_repos.is_empty());
    assert_eq!(state.pages_requests, 2);
    assert!(state.puts[5..].iter().all(|p| p.sha.is_some()));
}

#[tokio::test]
async fn test_deploy_with_bad_token() {
    let mock = MockGitHub::start().await;
    let (result, _) = run_deploy(&mock.config_with_token("bad"), &sample_tree(), "blog").await;

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid GitHub token. Please check your configuration."
    );
    assert!(mock.put_paths().is_empty());
}

#[tokio::test]
async fn test_deploy_reads_file_payloads_at_upload() {
    let dir = tempfile::tempdir().unwrap();
    let css = dir.path().join("site.css");
    std::fs::write(&css, "body { color: red; }").unwrap();

    let mut tree = StagingTree::new();
    tree.set_primary(Entry::from_bytes("index.html", b"<html>".to_vec()))
        .unwrap();
    tree.add_entries(vec![Entry::from_file(&css).await.unwrap()]);

    let mock = MockGitHub::start().await;
    let (result, _) = run_deploy(&mock.config(), &tree, "styled").await;
    result.unwrap();

    assert_eq!(
        mock.file("public/styled/site.css").unwrap(),
        b"body { color: red; }"
    );
}

#[tokio::test]
async fn test_deploy_with_concurrent_uploads() {
    let mock = MockGitHub::start().await;
    let mut config = mock.config();
    config.deploy.upload_concurrency = 4;

    let (result, _) = run_deploy(&config, &sample_tree(), "blog").await;
    assert_eq!(result.unwrap().uploaded, 5);

    let mut paths = mock.put_paths();
    assert_eq!(paths[0], "public/blog/index.html");
    paths.sort();
    assert_eq!(paths.len(), 5);
    assert!(paths.contains(&"public/blog/app.js".to_string()));
}

#[tokio::test]
async fn test_plan_without_primary_makes_no_calls() {
    let mock = MockGitHub::start().await;
    let deployer = Deployer::new(&mock.config()).unwrap();

    let mut tree = StagingTree::new();
    tree.add_entries(vec![Entry::from_bytes("a.css", b"a".to_vec())]);

    let err = deployer.plan(&tree, "blog").unwrap_err();
    assert_eq!(err.to_string(), "no main HTML file to deploy");
    assert!(mock.put_paths().is_empty());
}
