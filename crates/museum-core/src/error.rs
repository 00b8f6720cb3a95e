use thiserror::Error;

/// Why the embedded frame's document could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameAccessError {
    /// The frame's document belongs to another origin.
    #[error("embedded document is not same-origin accessible")]
    CrossOrigin,
    /// The frame has no document yet (still loading or never navigated).
    #[error("embedded document is not loaded")]
    NotLoaded,
    /// The page has no embedded content frame at all.
    #[error("page has no content frame")]
    NoFrame,
}

/// Start-up failures of the museum host.
#[derive(Debug, Error)]
pub enum MuseumError {
    #[error("config: {0}")]
    Config(#[from] config::ConfigError),
    #[error("content root {0} is missing or not a directory")]
    ContentRootMissing(String),
    #[error("index document {0} not found")]
    IndexMissing(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
