use thiserror::Error;

/// Failure to put markup into the mount point.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("mount point is closed")]
    Closed,
    #[error("render failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("unknown rover: {0}")]
    UnknownRover(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("bad action payload: {0}")]
    BadPayload(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
