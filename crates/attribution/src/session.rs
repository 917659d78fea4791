//! Pending search referrals per visitor.
//!
//! A visitor only has a [`Session`] while at least one of its referrals is
//! still waiting for a purchase; taking the last one removes the session.

use std::collections::{BTreeMap, HashMap};

use searchrev_core::AttributionKey;

/// Referrals of one visitor not yet credited with a purchase, keyed by hit
/// timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    referrals: BTreeMap<String, AttributionKey>,
}

impl Session {
    pub fn len(&self) -> usize {
        self.referrals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.referrals.is_empty()
    }

    /// The most recent pending referral.
    pub fn latest(&self) -> Option<(&str, &AttributionKey)> {
        self.referrals
            .last_key_value()
            .map(|(ts, key)| (ts.as_str(), key))
    }

    pub fn get(&self, timestamp: &str) -> Option<&AttributionKey> {
        self.referrals.get(timestamp)
    }

    /// Pending referrals in timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributionKey)> {
        self.referrals.iter().map(|(ts, key)| (ts.as_str(), key))
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, visitor_id: &str) -> bool {
        self.sessions.contains_key(visitor_id)
    }

    pub fn get(&self, visitor_id: &str) -> Option<&Session> {
        self.sessions.get(visitor_id)
    }

    /// Record a referral for `visitor_id`, creating its session if needed.
    /// A referral at an already-recorded timestamp replaces the earlier one.
    pub fn record(&mut self, visitor_id: &str, timestamp: &str, key: AttributionKey) {
        self.sessions
            .entry(visitor_id.to_string())
            .or_default()
            .referrals
            .insert(timestamp.to_string(), key);
    }

    /// Remove and return the most recent pending referral of `visitor_id`.
    /// The session itself is dropped once nothing is pending.
    pub fn take_latest(&mut self, visitor_id: &str) -> Option<(String, AttributionKey)> {
        let session = self.sessions.get_mut(visitor_id)?;
        let taken = session.referrals.pop_last();
        if session.referrals.is_empty() {
            self.sessions.remove(visitor_id);
        }
        taken
    }

    /// Number of visitors with at least one pending referral.
    pub fn visitor_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn pending_count(&self) -> usize {
        self.sessions.values().map(Session::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_by_timestamp_not_insertion() {
        let mut store = SessionStore::new();
        store.record("v1", "1254033974", AttributionKey::new("bing.com", "zune discounted"));
        store.record("v1", "1254033379", AttributionKey::new("bing.com", "zune"));

        let session = store.get("v1").unwrap();
        assert_eq!(session.len(), 2);
        let (ts, key) = session.latest().unwrap();
        assert_eq!(ts, "1254033974");
        assert_eq!(key.keyword, "zune discounted");
    }

    #[test]
    fn test_take_latest_drops_empty_session() {
        let mut store = SessionStore::new();
        store.record("v1", "100", AttributionKey::new("google.com", "ipod"));
        store.record("v1", "200", AttributionKey::new("google.com", "ipod nano"));

        let (ts, key) = store.take_latest("v1").unwrap();
        assert_eq!(ts, "200");
        assert_eq!(key.keyword, "ipod nano");
        assert!(store.contains("v1"));

        store.take_latest("v1").unwrap();
        assert!(!store.contains("v1"));
        assert!(store.get("v1").is_none());
        assert!(store.is_empty());
        assert!(store.take_latest("v1").is_none());
    }

    #[test]
    fn test_same_timestamp_is_replaced() {
        let mut store = SessionStore::new();
        store.record("v1", "100", AttributionKey::new("bing.com", "zune"));
        store.record("v1", "100", AttributionKey::new("yahoo.com", "cd player"));

        assert_eq!(store.pending_count(), 1);
        assert_eq!(
            store.get("v1").unwrap().get("100").unwrap().search_domain,
            "yahoo.com"
        );
    }

    #[test]
    fn test_visitors_are_independent() {
        let mut store = SessionStore::new();
        store.record("v1", "100", AttributionKey::new("bing.com", "zune"));
        store.record("v2", "100", AttributionKey::new("google.com", "ipod"));

        store.take_latest("v1");
        assert_eq!(store.visitor_count(), 1);
        assert_eq!(store.get("v2").unwrap().iter().count(), 1);
    }
}
