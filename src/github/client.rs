use octocrab::Octocrab;
use tracing::debug;

use super::errors::{is_not_found, GitHubError};
use super::pulls::PullRequestComposer;
use super::types::{ContentLookup, Repo};

/// Client for GitHub operations scoped to a single repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(octocrab: Octocrab, owner: String, repo: String) -> Self {
        Self {
            octocrab,
            owner,
            repo,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Handler for pull request composition against this repository.
    pub fn pulls(&self) -> PullRequestComposer {
        PullRequestComposer::new(self.octocrab.clone(), self.owner.clone(), self.repo.clone())
    }

    /// Fetch the repository descriptor.
    pub async fn get_repository(&self) -> Result<Repo, GitHubError> {
        let repo: Repo = self
            .octocrab
            .get(format!("/repos/{}/{}", self.owner, self.repo), None::<&()>)
            .await?;

        Ok(repo)
    }

    /// Look up a path through the contents API.
    ///
    /// A 404 and a directory listing at the path are expected shapes, not
    /// failures; both are reported through `ContentLookup`. Every other
    /// API failure propagates.
    pub async fn get_workflow_file(&self, path: &str) -> Result<ContentLookup, GitHubError> {
        let route = format!("/repos/{}/{}/contents/{}", self.owner, self.repo, path);

        debug!(route = %route, "fetching workflow file");

        let value: serde_json::Value = match self.octocrab.get(&route, None::<&()>).await {
            Ok(value) => value,
            Err(err) if is_not_found(&err) => return Ok(ContentLookup::Missing),
            Err(err) => return Err(err.into()),
        };

        // The contents API returns an array when the path is a directory.
        if value.is_array() {
            return Ok(ContentLookup::Directory);
        }

        Ok(ContentLookup::File(serde_json::from_value(value)?))
    }
}
