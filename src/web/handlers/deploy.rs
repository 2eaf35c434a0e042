//! Deployment handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use tokio::sync::mpsc;

use super::AppState;
use crate::deploy::{DeployEvent, DeployOutcome, DeployStatus};
use crate::web::dto::{ApiResponse, DeployRequest, ValidatedJson};
use crate::web::error::ApiError;

/// Buffered progress events between the driver and the status tracker.
const EVENT_BUFFER: usize = 32;

/// POST /api/deploy - Deploy the staged site.
///
/// The staging tree is locked only while the plan is resolved; the upload
/// itself runs on the snapshot in a detached task that owns the deploy
/// guard, so a client that disconnects does not cut the deployment short.
/// Only one deployment may run at a time.
pub async fn deploy(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<DeployRequest>,
) -> Result<Json<ApiResponse<DeployOutcome>>, ApiError> {
    let running = state
        .deploy_lock
        .clone()
        .try_lock_owned()
        .map_err(|_| ApiError::conflict("A deployment is already in progress"))?;

    let plan = {
        let tree = state.staging.lock().await;
        state.deployer.plan(&tree, &req.site_name)?
    };

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let _running = running;
        let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
        let tracker = task_state.clone();
        let forward = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracker.status.write().await.apply(&event);
            }
        });

        let result = task_state.deployer.execute(plan, &tx).await;
        drop(tx);
        if let Err(e) = forward.await {
            tracing::warn!("Deploy status tracker stopped: {}", e);
        }
        result
    });

    match task.await {
        Ok(result) => Ok(Json(ApiResponse::new(result?))),
        Err(e) => {
            tracing::error!("Deploy task aborted: {}", e);
            let mut status = state.status.write().await;
            if status.is_running() {
                status.apply(&DeployEvent::Failed {
                    error: "Deployment aborted".to_string(),
                });
            }
            Err(ApiError::internal("Deployment aborted"))
        }
    }
}

/// GET /api/deploy/status - Progress of the latest deployment.
pub async fn deploy_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DeployStatus>>, ApiError> {
    let status = state.status.read().await.clone();
    Ok(Json(ApiResponse::new(status)))
}
