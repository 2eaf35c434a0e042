//! Deployment types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::staging::UploadItem;

/// A validated, resolved deployment ready to execute.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    /// Trimmed site folder name.
    pub site_name: String,
    /// Repository directory of the site.
    pub site_root: String,
    /// Name of the staged main document.
    pub primary_source: String,
    /// Writes in order; the main document is always first.
    pub items: Vec<UploadItem>,
}

impl DeployPlan {
    /// Number of staged assets (excluding the main document and placeholders).
    pub fn asset_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.kind, crate::staging::UploadKind::Asset { .. }))
            .count()
    }
}

/// Result of a successful deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployOutcome {
    pub deployment_id: Uuid,
    pub site_name: String,
    /// Repository directory, with a trailing slash.
    pub site_path: String,
    pub pages_url: String,
    pub mirror_url: String,
    pub primary_source: String,
    /// Number of files written, placeholders included.
    pub uploaded: usize,
    pub asset_count: usize,
    pub deployed_at: DateTime<Utc>,
}

/// Progress reported while a deployment runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeployEvent {
    /// Deployment accepted.
    Started {
        deployment_id: Uuid,
        site_name: String,
        total: usize,
    },
    /// Step or upload progress.
    Progress { percent: u8, message: String },
    /// Deployment finished.
    Completed { outcome: DeployOutcome },
    /// Deployment aborted; remaining writes were skipped.
    Failed { error: String },
}

/// Lifecycle state of the latest deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Snapshot of the latest deployment, built from its events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeployStatus {
    pub state: DeployState,
    pub percent: u8,
    pub message: String,
    pub deployment_id: Option<Uuid>,
    pub outcome: Option<DeployOutcome>,
    pub error: Option<String>,
}

impl DeployStatus {
    /// Fold an event into the status.
    pub fn apply(&mut self, event: &DeployEvent) {
        match event {
            DeployEvent::Started { deployment_id, .. } => {
                *self = DeployStatus {
                    state: DeployState::Running,
                    deployment_id: Some(*deployment_id),
                    ..DeployStatus::default()
                };
            }
            DeployEvent::Progress { percent, message } => {
                self.percent = *percent;
                self.message = message.clone();
            }
            DeployEvent::Completed { outcome } => {
                self.state = DeployState::Succeeded;
                self.percent = 100;
                self.message = "Deployment complete!".to_string();
                self.outcome = Some(outcome.clone());
            }
            DeployEvent::Failed { error } => {
                self.state = DeployState::Failed;
                self.message = "Deployment failed".to_string();
                self.error = Some(error.clone());
            }
        }
    }

    /// Whether a deployment is in flight.
    pub fn is_running(&self) -> bool {
        self.state == DeployState::Running
    }
}
