use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Account, AccountCode, EntryRecord, FixedAsset, Posting, Project, StatusHistory,
};
use crate::ledger::chart;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory aggregate mirroring the relational store: chart of accounts,
/// journal postings, business records, projects, fixed assets, and the
/// append-only status history.
///
/// The book itself enforces nothing about double entry; that is the journal
/// engine's job. It only offers lookups and mutators that keep `updated_at`
/// honest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub postings: Vec<Posting>,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub fixed_assets: Vec<FixedAsset>,
    #[serde(default)]
    pub status_history: Vec<StatusHistory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Book::schema_version_default")]
    pub schema_version: u8,
}

impl Book {
    /// Creates a book seeded with the default chart of accounts.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts: chart::default_chart(),
            postings: Vec::new(),
            entries: Vec::new(),
            projects: Vec::new(),
            fixed_assets: Vec::new(),
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_project(&mut self, project: Project) -> Uuid {
        let id = project.id;
        self.projects.push(project);
        self.touch();
        id
    }

    pub fn add_fixed_asset(&mut self, asset: FixedAsset) -> Uuid {
        let id = asset.id;
        self.fixed_assets.push(asset);
        self.touch();
        id
    }

    pub fn add_entry(&mut self, entry: EntryRecord) -> Uuid {
        let id = entry.id;
        self.entries.push(entry);
        self.touch();
        id
    }

    pub fn account(&self, code: &AccountCode) -> Option<&Account> {
        self.accounts.iter().find(|account| &account.code == code)
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn entry(&self, id: Uuid) -> Option<&EntryRecord> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: Uuid) -> Option<&mut EntryRecord> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Appends a history row. History is append-only; no mutator edits or
    /// removes rows once written.
    pub fn record_history(&mut self, row: StatusHistory) {
        self.status_history.push(row);
        self.touch();
    }

    /// Rows recorded for one entry, oldest first.
    pub fn history_for(&self, entry_id: Uuid) -> Vec<&StatusHistory> {
        self.status_history
            .iter()
            .filter(|row| row.entry_id == entry_id)
            .collect()
    }

    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_book_carries_the_default_chart() {
        let book = Book::new("PT Wahana");
        assert!(!book.accounts.is_empty());
        assert!(book.account(&AccountCode::new("1101")).is_some());
        assert!(book.account(&AccountCode::new("9999")).is_none());
    }
}
