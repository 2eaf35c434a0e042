//! sitedeploy - Static site deployer
//!
//! Stage a main HTML page, asset files and a virtual folder layout, then
//! push them into a GitHub repository and publish them with GitHub Pages.

pub mod config;
pub mod deploy;
pub mod error;
pub mod github;
pub mod logging;
pub mod staging;
pub mod web;

pub use config::Config;
pub use deploy::{DeployEvent, DeployOutcome, Deployer};
pub use error::{DeployerError, Result};
pub use staging::{Entry, StagingError, StagingTree};
