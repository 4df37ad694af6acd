pub mod account;
pub mod common;
pub mod posting;
pub mod project;
pub mod record;

pub use account::{Account, AccountClass, AccountCode};
pub use common::{Displayable, Identifiable};
pub use posting::{correlation_prefix, Direction, Posting};
pub use project::{FixedAsset, Project, ProjectStatus};
pub use record::{
    BillingCategory, CostCategory, EntryCategory, EntryKind, EntryRecord, EntryStatus,
    StatusHistory,
};
