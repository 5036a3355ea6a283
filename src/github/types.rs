use serde::Deserialize;

/// Repository descriptor, the subset of `GET /repos/{owner}/{repo}` the
/// driver needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    pub owner: RepoOwner,
    #[serde(default = "fallback_default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub archived: bool,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

fn fallback_default_branch() -> String {
    "main".to_string()
}

/// A single file as returned by the contents API: still encoded, with the
/// encoding GitHub used (in practice always base64).
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowFile {
    pub content: String,
    pub encoding: String,
}

/// Result of looking up a path through the contents API. The two "expected
/// absence" shapes are modeled explicitly so the driver can log and move on
/// instead of treating them as failures.
#[derive(Debug)]
pub enum ContentLookup {
    File(WorkflowFile),
    Directory,
    Missing,
}

/// One file to create or overwrite in the pull request's commit.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

/// Everything needed to compose a pull request from a set of file changes.
#[derive(Debug, Clone)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub base: String,
    pub head: String,
    pub commit_message: String,
    pub changes: Vec<FileChange>,
}
