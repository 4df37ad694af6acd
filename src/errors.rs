use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the accounting core.
///
/// Read-side aggregation never fails: an empty book or a future report date
/// yields a zeroed report. These variants cover write-side and configuration
/// failures only.
#[derive(Debug, Error)]
pub enum AccountingError {
    /// A posting operation referenced a project or account that does not
    /// exist. The operation performs no partial write.
    #[error("invalid reference for {kind} #{id}: {detail}")]
    ReferentialIntegrity {
        kind: &'static str,
        id: Uuid,
        detail: String,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    /// An orphaned single leg was detected for a correlation prefix. Should
    /// be structurally impossible; the compensating path removes the orphan.
    #[error("partial write detected for `{prefix}`")]
    PartialWrite { prefix: String },
    #[error("category `{0}` is not mapped to any chart account")]
    UnmappedCategory(String),
    #[error("duplicate account code `{0}` in chart")]
    DuplicateAccountCode(String),
    #[error("account `{0}` not found in chart")]
    AccountNotFound(String),
    #[error("entry {0} not found")]
    EntryNotFound(Uuid),
    #[error("project {0} not found")]
    ProjectNotFound(Uuid),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AccountingError {
    fn from(err: std::io::Error) -> Self {
        AccountingError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AccountingError {
    fn from(err: serde_json::Error) -> Self {
        AccountingError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AccountingError>;
