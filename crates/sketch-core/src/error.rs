use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// The surface exists but the host refused to hand out a 2D paint context.
    /// The session cannot draw; nothing is retried.
    #[error("unable to get 2d context from surface")]
    ContextUnavailable,

    #[error("unable to create surface: {0}")]
    Surface(String),

    #[error("frame request rejected: {0}")]
    Scheduler(String),
}
