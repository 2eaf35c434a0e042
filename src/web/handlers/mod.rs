//! API handlers and shared application state.

pub mod deploy;
pub mod staging;

pub use deploy::*;
pub use staging::*;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::deploy::{DeployStatus, Deployer};
use crate::staging::StagingTree;

/// Shared application state.
pub struct AppState {
    /// The one staging tree every request works on.
    pub staging: Mutex<StagingTree>,
    /// Deployment driver.
    pub deployer: Deployer,
    /// Progress of the latest deployment.
    pub status: RwLock<DeployStatus>,
    /// Held by the deploy task for the whole of a deployment.
    pub deploy_lock: Arc<Mutex<()>>,
    /// Maximum size of a single uploaded file, in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state with an empty staging tree.
    pub fn new(deployer: Deployer, max_upload_size_mb: u64) -> Self {
        Self {
            staging: Mutex::new(StagingTree::new()),
            deployer,
            status: RwLock::new(DeployStatus::default()),
            deploy_lock: Arc::new(Mutex::new(())),
            max_upload_size: max_upload_size_mb * 1024 * 1024,
        }
    }
}
