//! Deployment driver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, TryStreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::site::{mirror_url, pages_url, site_root, validate_site_name};
use super::types::{DeployEvent, DeployOutcome, DeployPlan};
use crate::config::{Config, GitHubConfig, MirrorConfig};
use crate::error::{DeployerError, Result};
use crate::github::{GitHubClient, PagesStatus};
use crate::staging::{StagingTree, UploadItem};

/// Pushes a staged site to GitHub and publishes it with Pages.
#[derive(Debug, Clone)]
pub struct Deployer {
    client: GitHubClient,
    github: GitHubConfig,
    mirror: MirrorConfig,
    upload_concurrency: usize,
}

impl Deployer {
    /// Create a deployer from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: GitHubClient::new(&config.github)?,
            github: config.github.clone(),
            mirror: config.mirror.clone(),
            upload_concurrency: config.deploy.upload_concurrency.max(1),
        })
    }

    /// Validate the site name and resolve the staged tree into writes.
    ///
    /// Fails with `NothingToDeploy` before any network call when no main
    /// document is staged.
    pub fn plan(&self, tree: &StagingTree, site_name: &str) -> Result<DeployPlan> {
        let site_name = validate_site_name(site_name)?;
        let site_root = site_root(&self.github.repo_path, &site_name);
        let items = tree.resolve_upload_paths(&site_root)?;
        let primary_source = tree
            .primary()
            .map(|p| p.name().to_string())
            .unwrap_or_default();

        Ok(DeployPlan {
            site_name,
            site_root,
            primary_source,
            items,
        })
    }

    /// Run a planned deployment.
    ///
    /// Writes stop at the first failure; files already written stay in the
    /// repository.
    pub async fn execute(
        &self,
        plan: DeployPlan,
        events: &mpsc::Sender<DeployEvent>,
    ) -> Result<DeployOutcome> {
        let deployment_id = Uuid::new_v4();
        emit(
            events,
            DeployEvent::Started {
                deployment_id,
                site_name: plan.site_name.clone(),
                total: plan.items.len(),
            },
        )
        .await;
        info!(
            deployment_id = %deployment_id,
            site = %plan.site_name,
            files = plan.items.len(),
            "deployment started"
        );

        match self.run(&plan, deployment_id, events).await {
            Ok(outcome) => {
                info!(
                    deployment_id = %deployment_id,
                    pages_url = %outcome.pages_url,
                    uploaded = outcome.uploaded,
                    "deployment completed"
                );
                emit(
                    events,
                    DeployEvent::Completed {
                        outcome: outcome.clone(),
                    },
                )
                .await;
                Ok(outcome)
            }
            Err(e) => {
                error!(deployment_id = %deployment_id, error = %e, "deployment failed");
                emit(
                    events,
                    DeployEvent::Failed {
                        error: e.to_string(),
                    },
                )
                .await;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        plan: &DeployPlan,
        deployment_id: Uuid,
        events: &mpsc::Sender<DeployEvent>,
    ) -> Result<DeployOutcome> {
        progress(events, 10, "Checking repository...").await;
        let user = self.client.authenticated_user().await?;
        self.ensure_repository(&user.login).await?;

        progress(events, 30, "Uploading files...").await;
        let uploaded = self.upload_all(&user.login, &plan.items, events).await?;

        progress(events, 70, "Enabling GitHub Pages...").await;
        let status = self
            .client
            .enable_pages(&user.login, &self.github.repository, &self.github.branch)
            .await?;
        debug!(status = ?status, "pages configured");

        progress(events, 90, "Generating URL...").await;
        if status == PagesStatus::Enabled {
            pause(self.github.pages_settle_ms).await;
        }

        let outcome = DeployOutcome {
            deployment_id,
            site_name: plan.site_name.clone(),
            site_path: format!("{}/", plan.site_root),
            pages_url: pages_url(
                &user.login,
                &self.github.repository,
                &self.github.repo_path,
                &plan.site_name,
            ),
            mirror_url: mirror_url(&self.mirror.base, &self.github.repo_path, &plan.site_name),
            primary_source: plan.primary_source.clone(),
            uploaded,
            asset_count: plan.asset_count(),
            deployed_at: Utc::now(),
        };
        progress(events, 100, "Deployment complete!").await;

        Ok(outcome)
    }

    async fn ensure_repository(&self, owner: &str) -> Result<()> {
        let repository = &self.github.repository;
        if self.client.get_repository(owner, repository).await?.is_some() {
            debug!(owner = %owner, repository = %repository, "repository exists");
            return Ok(());
        }

        let created = self.client.create_repository(repository).await?;
        info!(repository = %created.full_name, "repository created");
        pause(self.github.repo_create_wait_ms).await;
        Ok(())
    }

    async fn upload_all(
        &self,
        owner: &str,
        items: &[UploadItem],
        events: &mpsc::Sender<DeployEvent>,
    ) -> Result<usize> {
        let total = items.len();
        let Some((first, rest)) = items.split_first() else {
            return Ok(0);
        };

        // The main document goes first; Pages only needs it to serve the site.
        self.upload_item(owner, first).await?;
        report_upload(events, 1, total).await;

        let done = AtomicUsize::new(1);
        let done_ref = &done;
        stream::iter(rest.iter().map(Ok::<_, DeployerError>))
            .try_for_each_concurrent(self.upload_concurrency, move |item| async move {
                self.upload_item(owner, item).await?;
                let count = done_ref.fetch_add(1, Ordering::SeqCst) + 1;
                report_upload(events, count, total).await;
                Ok(())
            })
            .await?;

        Ok(done.into_inner())
    }

    async fn upload_item(&self, owner: &str, item: &UploadItem) -> Result<()> {
        let content = item.payload.read().await.map_err(|e| {
            DeployerError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {e}", item.path),
            ))
        })?;

        self.client
            .put_file(
                owner,
                &self.github.repository,
                &item.path,
                &content,
                &item.commit_message(),
                &self.github.branch,
            )
            .await
    }
}

/// Upload progress maps onto the 30..70 band of the overall bar.
fn upload_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 70;
    }
    (30 + done.min(total) * 40 / total) as u8
}

async fn report_upload(events: &mpsc::Sender<DeployEvent>, done: usize, total: usize) {
    progress(
        events,
        upload_percent(done, total),
        &format!("Uploading files... ({done}/{total})"),
    )
    .await;
}

async fn progress(events: &mpsc::Sender<DeployEvent>, percent: u8, message: &str) {
    emit(
        events,
        DeployEvent::Progress {
            percent,
            message: message.to_string(),
        },
    )
    .await;
}

async fn emit(events: &mpsc::Sender<DeployEvent>, event: DeployEvent) {
    // A dropped receiver only means nobody is watching progress.
    let _ = events.send(event).await;
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
