//! Revenue ledger: cumulative attributed revenue per (search domain, keyword).

use std::collections::HashMap;

use searchrev_core::AttributionKey;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub key: AttributionKey,
    pub revenue: f64,
}

/// Entries are kept in order of first credit; they are only ever added to.
#[derive(Debug, Default)]
pub struct RevenueLedger {
    entries: Vec<LedgerEntry>,
    index: HashMap<AttributionKey, usize>,
}

impl RevenueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `revenue` to `key`, creating the entry on first credit.
    /// Returns the key's new total.
    pub fn credit(&mut self, key: AttributionKey, revenue: f64) -> f64 {
        match self.index.get(&key) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                entry.revenue += revenue;
                entry.revenue
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(LedgerEntry { key, revenue });
                revenue
            }
        }
    }

    pub fn get(&self, key: &AttributionKey) -> Option<f64> {
        self.index.get(key).map(|&pos| self.entries[pos].revenue)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in order of first credit.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// Entries by descending revenue; equal revenues keep first-credit order.
    pub fn ranked(&self) -> Vec<LedgerEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        ranked
    }

    pub fn into_ranked(self) -> Vec<LedgerEntry> {
        let mut ranked = self.entries;
        ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        ranked
    }
}
