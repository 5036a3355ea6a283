pub mod client;
pub mod errors;
pub mod pulls;
pub mod types;

pub use client::GitHubClient;
pub use errors::GitHubError;
pub use pulls::PullRequestComposer;
pub use types::{ContentLookup, FileChange, NewPullRequest, Repo, RepoOwner, WorkflowFile};
