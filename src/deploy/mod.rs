//! Deployment flow: staged site -> GitHub repository -> Pages.
//!
//! A deploy is split in two steps. [`Deployer::plan`] validates the site
//! name and snapshots the staging tree without any I/O, so it can run
//! while the tree is locked. [`Deployer::execute`] then performs the
//! network writes and reports progress over an mpsc channel.

mod driver;
mod site;
mod types;

pub use driver::Deployer;
pub use site::{mirror_url, pages_url, site_root, validate_site_name, MAX_SITE_NAME_LENGTH};
pub use types::{DeployEvent, DeployOutcome, DeployPlan, DeployState, DeployStatus};
