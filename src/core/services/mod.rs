pub mod journal_service;
pub mod report_service;

pub use journal_service::{DeleteOutcome, JournalService};
pub use report_service::{ReportEnvelope, ReportService};

use crate::errors::AccountingError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Accounting(#[from] AccountingError),
    #[error("{0}")]
    Invalid(String),
}
