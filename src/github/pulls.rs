use octocrab::params::repos::Reference;
use octocrab::Octocrab;
use serde_json::json;
use tracing::{debug, info};

use super::errors::{is_unprocessable, GitHubError};
use super::types::NewPullRequest;

/// Handler that composes a pull request out of file changes using the
/// git-data endpoints: base ref -> base tree -> new tree -> new commit ->
/// branch ref -> pull request.
#[derive(Debug, Clone)]
pub struct PullRequestComposer {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl PullRequestComposer {
    pub fn new(octocrab: Octocrab, owner: String, repo: String) -> Self {
        Self {
            octocrab,
            owner,
            repo,
        }
    }

    /// Create a branch and a pull request carrying `request.changes`.
    ///
    /// Returns `None` without creating a commit, branch, or pull request
    /// when the changes produce a tree identical to the base branch's tree
    /// (nothing to submit). The head branch is force-updated if it already
    /// exists from an earlier run.
    pub async fn compose_create_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<Option<octocrab::models::pulls::PullRequest>, GitHubError> {
        let base_sha = self.resolve_branch_sha(&request.base).await?;
        let base_tree_sha = self.commit_tree_sha(&base_sha).await?;

        let entries: Vec<serde_json::Value> = request
            .changes
            .iter()
            .map(|change| {
                json!({
                    "path": change.path,
                    "mode": "100644",
                    "type": "blob",
                    "content": change.content,
                })
            })
            .collect();

        let tree: serde_json::Value = self
            .octocrab
            .post(
                format!("/repos/{}/{}/git/trees", self.owner, self.repo),
                Some(&json!({ "base_tree": base_tree_sha, "tree": entries })),
            )
            .await?;
        let tree_sha = required_str(&tree, "sha")?;

        if tree_sha == base_tree_sha {
            debug!(
                base = %request.base,
                "changes match the base tree, nothing to commit"
            );
            return Ok(None);
        }

        let commit: serde_json::Value = self
            .octocrab
            .post(
                format!("/repos/{}/{}/git/commits", self.owner, self.repo),
                Some(&json!({
                    "message": request.commit_message,
                    "tree": tree_sha,
                    "parents": [base_sha],
                })),
            )
            .await?;
        let commit_sha = required_str(&commit, "sha")?;

        self.upsert_branch(&request.head, &commit_sha).await?;

        let pr = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .create(request.title.as_str(), request.head.as_str(), request.base.as_str())
            .body(request.body.as_str())
            .send()
            .await?;

        info!(
            pull_request = pr.number,
            head = %request.head,
            base = %request.base,
            "created pull request"
        );

        Ok(Some(pr))
    }

    async fn resolve_branch_sha(&self, branch: &str) -> Result<String, GitHubError> {
        let reference = self
            .octocrab
            .repos(&self.owner, &self.repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await?;

        match reference.object {
            octocrab::models::repos::Object::Commit { sha, .. } => Ok(sha),
            other => Err(GitHubError::UnexpectedResponse(format!(
                "ref heads/{branch} does not point at a commit: {other:?}"
            ))),
        }
    }

    async fn commit_tree_sha(&self, commit_sha: &str) -> Result<String, GitHubError> {
        let commit: serde_json::Value = self
            .octocrab
            .get(
                format!(
                    "/repos/{}/{}/git/commits/{}",
                    self.owner, self.repo, commit_sha
                ),
                None::<&()>,
            )
            .await?;

        match commit.pointer("/tree/sha").and_then(|sha| sha.as_str()) {
            Some(sha) => Ok(sha.to_string()),
            None => Err(GitHubError::UnexpectedResponse(format!(
                "commit {commit_sha} has no tree sha"
            ))),
        }
    }

    /// Point `refs/heads/{branch}` at `sha`, creating the ref or force-moving
    /// it when a previous run already created the branch.
    async fn upsert_branch(&self, branch: &str, sha: &str) -> Result<(), GitHubError> {
        let created = self
            .octocrab
            .repos(&self.owner, &self.repo)
            .create_ref(&Reference::Branch(branch.to_string()), sha)
            .await;

        match created {
            Ok(_) => Ok(()),
            Err(err) if is_unprocessable(&err) => {
                debug!(branch = %branch, "branch already exists, force-updating");
                let _updated: serde_json::Value = self
                    .octocrab
                    .patch(
                        format!(
                            "/repos/{}/{}/git/refs/heads/{}",
                            self.owner, self.repo, branch
                        ),
                        Some(&json!({ "sha": sha, "force": true })),
                    )
                    .await?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn required_str(value: &serde_json::Value, field: &str) -> Result<String, GitHubError> {
    match value.get(field).and_then(|v| v.as_str()) {
        Some(s) => Ok(s.to_string()),
        None => Err(GitHubError::UnexpectedResponse(format!(
            "response is missing `{field}`: {value}"
        ))),
    }
}
