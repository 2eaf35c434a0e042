//! Site names and the URLs derived from them.

use crate::error::{DeployerError, Result};

/// Maximum length of a site name.
pub const MAX_SITE_NAME_LENGTH: usize = 100;

/// Validate a site folder name and return it trimmed.
///
/// The name becomes one path segment under the repository's site directory.
pub fn validate_site_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DeployerError::Validation(
            "Please enter a website folder name.".to_string(),
        ));
    }
    if name.chars().count() > MAX_SITE_NAME_LENGTH {
        return Err(DeployerError::Validation(format!(
            "website folder name must be at most {MAX_SITE_NAME_LENGTH} characters"
        )));
    }
    let invalid = name.chars().any(|c| {
        c.is_control() || matches!(c, '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*')
    });
    if invalid || name == "." || name == ".." {
        return Err(DeployerError::Validation(format!(
            "website folder name contains invalid characters: {name}"
        )));
    }
    Ok(name.to_string())
}

/// Repository directory of a site, e.g. `public/my-site`.
pub fn site_root(repo_path: &str, site_name: &str) -> String {
    join(&[repo_path, site_name])
}

/// GitHub Pages URL of a deployed site.
pub fn pages_url(login: &str, repository: &str, repo_path: &str, site_name: &str) -> String {
    format!(
        "https://{login}.github.io/{}/",
        join(&[repository, repo_path, site_name])
    )
}

/// Netlify mirror URL of a deployed site.
pub fn mirror_url(mirror_base: &str, repo_path: &str, site_name: &str) -> String {
    format!(
        "https://{mirror_base}.netlify.app/{}",
        join(&[repo_path, site_name])
    )
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
