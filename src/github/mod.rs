//! GitHub REST API client.
//!
//! Only the calls needed to publish a site are covered: authenticated user,
//! repository lookup/creation, contents writes and enabling Pages.

mod client;
mod types;

pub use client::{encode_content_path, GitHubClient};
pub use types::{PagesStatus, Repository, User};
