use thiserror::Error;

/// Errors that can abort an import.
///
/// Per-day-file parse failures and per-asset fetch failures are recovered
/// locally (logged and skipped) and never surface through this type.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The archive is not a readable zip, is missing a required top-level
    /// file, or users.json / channels.json contain invalid JSON.
    #[error("invalid Slack export: {0}")]
    MalformedArchive(String),

    /// A bulk insert or transactional delete against the store failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] diesel::result::Error),

    /// The store itself could not be opened or connected to.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
