//! Bounded in-memory audit trail of mutating API calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub user_id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AuditLog {
    max_entries: usize,
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl AuditLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Append an entry, evicting the oldest once the log is full.
    pub fn log(&self, user_id: i64, action: &str, target_type: &str, target_id: i64, details: Value) {
        log::info!("audit: user={user_id} action={action} target={target_type}:{target_id}");
        if self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        while entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(AuditEntry {
            user_id,
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id,
            details,
            created_at: Utc::now(),
        });
    }

    /// Most recent entries first.
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
