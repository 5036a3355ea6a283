use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("unexpected GitHub payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unexpected GitHub response: {0}")]
    UnexpectedResponse(String),
}

/// True when the underlying API error is an HTTP 404 from GitHub.
pub fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(
        err,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}

/// True when GitHub rejected the request as unprocessable (HTTP 422),
/// e.g. creating a ref that already exists.
pub fn is_unprocessable(err: &octocrab::Error) -> bool {
    matches!(
        err,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 422
    )
}
