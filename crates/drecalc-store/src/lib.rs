//! Ledger snapshot loading.
//!
//! Reads the accounts + entries export produced by the backing service and
//! hands the engine a typed, in-memory snapshot. Accounts whose category
//! cannot be resolved are dropped with a warning; entries pointing at them
//! are then skipped by the engine exactly like any other dangling reference.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use drecalc_core::{Account, AccountKind, Category, EntryType, LedgerEntry};

pub mod error;

pub use error::StoreError;

// ==================== Raw Records ====================

/// Chart-of-accounts record as exported (camelCase JSON, string category).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    id: String,
    #[serde(default)]
    code: String,
    name: String,
    category: String,
    #[serde(rename = "type", default)]
    kind: AccountKind,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// Ledger entry record as exported.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    id: String,
    company_id: String,
    account_id: String,
    date: NaiveDate,
    #[serde(default)]
    description: String,
    amount: f64,
    entry_type: EntryType,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    accounts: Vec<RawAccount>,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

// ==================== Snapshot ====================

/// In-memory snapshot handed to the engine.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub entries: Vec<LedgerEntry>,
}

// ==================== Source Trait ====================

/// Trait for snapshot sources
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Load a snapshot from a path
    async fn load(&self, path: PathBuf) -> Result<Snapshot, StoreError>;
}

/// Default JSON file source
#[derive(Debug, Default)]
pub struct JsonSnapshotStore;

#[async_trait]
impl SnapshotSource for JsonSnapshotStore {
    async fn load(&self, path: PathBuf) -> Result<Snapshot, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound {
                path: path.to_string_lossy().to_string(),
            });
        }
        let content = tokio::fs::read_to_string(&path).await?;
        Self::parse(&content)
    }
}

impl JsonSnapshotStore {
    /// Parse snapshot JSON content
    pub fn parse(content: &str) -> Result<Snapshot, StoreError> {
        let raw: RawSnapshot = serde_json::from_str(content)?;

        let mut accounts = Vec::with_capacity(raw.accounts.len());
        for record in raw.accounts {
            match Category::from_label(&record.category) {
                Some(category) => accounts.push(Account {
                    id: record.id,
                    code: record.code,
                    name: record.name,
                    category,
                    kind: record.kind,
                    active: record.active,
                }),
                None => {
                    log::warn!(
                        "dropping account {} ({:?}): unknown category {:?}",
                        record.id,
                        record.name,
                        record.category
                    );
                }
            }
        }

        let entries = raw
            .entries
            .into_iter()
            .map(|record| LedgerEntry {
                id: record.id,
                company_id: record.company_id,
                account_id: record.account_id,
                date: record.date,
                description: record.description,
                amount: record.amount,
                entry_type: record.entry_type,
            })
            .collect();

        log::debug!("snapshot parsed: {} accounts", accounts.len());
        Ok(Snapshot { accounts, entries })
    }
}

// ==================== Tests ====================
