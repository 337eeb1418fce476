//! Append-only action history attached to every material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of action recorded in an audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The material was lent to a user.
    CheckedOut,
    /// The material came back.
    Returned,
    /// A user placed a reservation.
    Reserved,
    /// A reservation was withdrawn.
    ReservationCancelled,
}

/// A single recorded action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// What happened.
    pub action: AuditAction,
    /// Free-form details, usually the user involved.
    pub details: String,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

/// Ordered, unbounded action history. Entries are never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry stamped with the current time.
    pub fn record(&mut self, action: AuditAction, details: impl Into<String>) {
        self.record_at(action, details, Utc::now());
    }

    /// Appends an entry with an explicit timestamp.
    pub fn record_at(
        &mut self,
        action: AuditAction,
        details: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        self.entries.push(AuditEntry {
            action,
            details: details.into(),
            timestamp,
        });
    }

    /// Returns all entries, oldest first.
    pub fn history(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Returns the most recent entry.
    pub fn last_action(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    /// Empties the log. Only meant for diagnostics.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut log = AuditLog::new();
        log.record(AuditAction::Reserved, "alice");
        log.record(AuditAction::ReservationCancelled, "alice");
        log.record(AuditAction::CheckedOut, "bob");

        let actions: Vec<_> = log.history().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                AuditAction::Reserved,
                AuditAction::ReservationCancelled,
                AuditAction::CheckedOut
            ]
        );
        assert_eq!(log.last_action().unwrap().details, "bob");
    }

    #[test]
    fn test_clear_empties_log() {
        let mut log = AuditLog::new();
        assert!(log.last_action().is_none());

        log.record(AuditAction::Returned, "none");
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
        assert!(log.last_action().is_none());
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(
            serde_json::to_string(&AuditAction::ReservationCancelled).unwrap(),
            "\"reservation_cancelled\""
        );
        let action: AuditAction = serde_json::from_str("\"checked_out\"").unwrap();
        assert_eq!(action, AuditAction::CheckedOut);
        assert!(serde_json::from_str::<AuditAction>("\"lost\"").is_err());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut log = AuditLog::new();
        log.record(AuditAction::CheckedOut, "alice");

        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["action"], "checked_out");
    }
}
