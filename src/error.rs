#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The caller sent something we can't turn into a repository.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// Anything that went wrong talking to the upstream api.
    #[error("upstream request failed: {0:#}")]
    UpstreamFailure(anyhow::Error),
}

impl RelayError {
    pub const MISSING_URL: &'static str = "Repo URL required";
    pub const INVALID_URL: &'static str = "Invalid GitHub URL";

    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(..))
    }
}
