use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ClientType, Provider};

/// A completed analysis, kept for the lifetime of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub url: String,
    pub provider: Provider,
    pub model: String,
    pub client_type: ClientType,
    pub result: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        url: impl Into<String>,
        provider: Provider,
        model: impl Into<String>,
        client_type: ClientType,
        result: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            provider,
            model: model.into(),
            client_type,
            result: result.into(),
            created_at: Utc::now(),
        }
    }
}

/// In-memory list of analyses, oldest evicted first once a limit is set. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: VecDeque<HistoryEntry>,
    limit: Option<usize>,
    /// Entries dropped by the limit since the last `clear`.
    evicted: usize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` entries (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
                self.evicted += 1;
            }
        }
    }

    /// Entries newest first, each paired with its 1-based position in insertion order.
    pub fn newest_first(&self) -> impl Iterator<Item = (usize, &HistoryEntry)> {
        let offset = self.evicted;
        self.entries
            .iter()
            .enumerate()
            .rev()
            .map(move |(i, entry)| (offset + i + 1, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.evicted = 0;
        removed
    }
}
