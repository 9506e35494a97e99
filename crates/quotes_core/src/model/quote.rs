//! Quote domain model.
//!
//! # Responsibility
//! - Define the record held by the quote store.
//! - Keep wire field names stable for gateway compatibility.
//!
//! # Invariants
//! - `id` is a non-nil v4 UUID assigned by the store, never by callers.
//! - `created_at` is set once on insertion and never rewritten by edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one stored quote.
pub type QuoteId = Uuid;

/// One stored quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub author: String,
    /// Quote text. Serialized as `quote` to match the external schema.
    pub quote: String,
    pub category: String,
    /// RFC 3339 on the wire.
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Builds a stored quote from a draft under a fresh v4 id.
    ///
    /// Uses the draft's creation time when one was set in-process,
    /// otherwise the current time.
    pub fn from_draft(draft: QuoteDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: draft.author,
            quote: draft.quote,
            category: draft.category,
            created_at: draft.created_at.unwrap_or_else(Utc::now),
        }
    }

    /// Returns whether both values refer to the same stored quote.
    pub fn same_identity(&self, other: &Quote) -> bool {
        self.id == other.id
    }

    /// Overwrites the caller-editable fields, keeping `id` and `created_at`.
    pub fn replace_fields(&mut self, draft: QuoteDraft) {
        self.author = draft.author;
        self.quote = draft.quote;
        self.category = draft.category;
    }

    /// Returns whether this quote was created strictly before `cutoff`.
    pub fn is_created_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }
}

/// Caller-supplied fields for create and edit paths.
///
/// `created_at` is never decoded from request bodies; only in-process callers
/// (seeding, tests) can backdate a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub category: String,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuoteDraft {
    pub fn new(
        author: impl Into<String>,
        quote: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            quote: quote.into(),
            category: category.into(),
            created_at: None,
        }
    }

    /// Pins the creation time instead of letting the store stamp it.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}
