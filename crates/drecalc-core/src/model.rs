//! Core data model for the ledger snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Category, EntryType};

/// One chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque unique identifier.
    pub id: String,
    /// Hierarchical display code (e.g. "3.1.1.01"); never interpreted here.
    pub code: String,
    /// Free-text label; the classifier reads this.
    pub name: String,
    /// Statement line this account rolls into.
    pub category: Category,
    pub kind: AccountKind,
    /// Inactive accounts remain visible to historical reports.
    pub active: bool,
}

/// Postable vs grouping accounts.
///
/// Aggregation sums both alike; only entry pickers care about the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Analytic,
    Synthetic,
}

impl Default for AccountKind {
    fn default() -> Self {
        AccountKind::Analytic
    }
}

/// A single posted debit or credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub company_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub description: String,
    /// Monetary magnitude. Negative values are accepted and flip the
    /// effective entry type through the sign convention.
    pub amount: f64,
    pub entry_type: EntryType,
}

/// Read-only id lookup over a chart of accounts.
///
/// Built per call from the caller's snapshot; the engine keeps no state
/// between invocations.
#[derive(Debug)]
pub struct AccountRegistry<'a> {
    by_id: HashMap<&'a str, &'a Account>,
}

impl<'a> AccountRegistry<'a> {
    pub fn new(accounts: &'a [Account]) -> Self {
        let by_id = accounts
            .iter()
            .map(|account| (account.id.as_str(), account))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Account> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// ==================== Tests ====================
