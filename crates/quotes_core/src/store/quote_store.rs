//! Quote repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide CRUD, category filter, random sampling and age-based eviction
//!   over the process-wide quote collection.
//! - Serialize every access through one mutex so no caller observes a
//!   partially applied operation.
//!
//! # Invariants
//! - Map keys equal the `id` of the stored quote.
//! - Reads and writes take the same lock; there is no reader/writer split.
//! - Contents are volatile and unbounded.

use crate::model::quote::{Quote, QuoteDraft, QuoteId};
use chrono::{Duration as TimeDelta, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Spacing between consecutive seeded quotes.
const SEED_SPACING_MINUTES: i64 = 20;

/// Repository interface for quote storage.
///
/// Operations are total: given valid input they always complete, and report
/// missing ids through `bool`/`Option` rather than errors.
pub trait QuoteRepository {
    fn add(&self, draft: QuoteDraft) -> Quote;
    fn all(&self) -> Vec<Quote>;
    fn by_category(&self, category: &str) -> Vec<Quote>;
    fn random(&self) -> Option<Quote>;
    fn get(&self, id: QuoteId) -> Option<Quote>;
    fn edit(&self, id: QuoteId, draft: QuoteDraft) -> bool;
    fn delete(&self, id: QuoteId) -> bool;
    fn delete_older_than(&self, max_age: Duration) -> usize;
}

impl<R: QuoteRepository + ?Sized> QuoteRepository for Arc<R> {
    fn add(&self, draft: QuoteDraft) -> Quote {
        (**self).add(draft)
    }

    fn all(&self) -> Vec<Quote> {
        (**self).all()
    }

    fn by_category(&self, category: &str) -> Vec<Quote> {
        (**self).by_category(category)
    }

    fn random(&self) -> Option<Quote> {
        (**self).random()
    }

    fn get(&self, id: QuoteId) -> Option<Quote> {
        (**self).get(id)
    }

    fn edit(&self, id: QuoteId, draft: QuoteDraft) -> bool {
        (**self).edit(id, draft)
    }

    fn delete(&self, id: QuoteId) -> bool {
        (**self).delete(id)
    }

    fn delete_older_than(&self, max_age: Duration) -> usize {
        (**self).delete_older_than(max_age)
    }
}

/// Concurrency-safe in-memory quote store.
///
/// Constructed once at startup and shared by reference (`Arc`) with the
/// gateway and the evictor.
#[derive(Debug, Default)]
pub struct QuoteStore {
    quotes: Mutex<HashMap<QuoteId, Quote>>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `count` synthetic quotes, newest first, 20 minutes apart.
    ///
    /// The i-th quote (1-based) is stamped `now - 20min * i`. Seeding stops
    /// early once that timestamp is no longer representable.
    /// Returns the number of quotes inserted.
    pub fn seed(&self, count: usize) -> usize {
        let now = Utc::now();
        let mut quotes = self.quotes.lock();
        let mut inserted = 0;

        for i in 1..=count {
            let Some(created_at) = seed_offset(i).and_then(|offset| now.checked_sub_signed(offset))
            else {
                break;
            };
            let draft = QuoteDraft::new(
                format!("Author {i}"),
                format!("Quote {i}"),
                format!("Category {i}"),
            )
            .created_at(created_at);
            let quote = Quote::from_draft(draft);
            quotes.insert(quote.id, quote);
            inserted += 1;
        }

        info!(
            "event=store_seed module=store status=ok inserted={} total={}",
            inserted,
            quotes.len()
        );
        inserted
    }

    pub fn len(&self) -> usize {
        self.quotes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.lock().is_empty()
    }
}

impl QuoteRepository for QuoteStore {
    /// Stores a draft under a freshly generated id.
    fn add(&self, draft: QuoteDraft) -> Quote {
        let mut quotes = self.quotes.lock();
        let mut quote = Quote::from_draft(draft);
        // A v4 collision is not expected, but an existing key must never be
        // overwritten by an insert.
        while quotes.contains_key(&quote.id) {
            quote.id = QuoteId::new_v4();
        }
        quotes.insert(quote.id, quote.clone());

        debug!(
            "event=quote_add module=store status=ok id={} total={}",
            quote.id,
            quotes.len()
        );
        quote
    }

    /// Returns a snapshot of every stored quote in unspecified order.
    fn all(&self) -> Vec<Quote> {
        self.quotes.lock().values().cloned().collect()
    }

    /// Exact, case-sensitive match on `category`.
    fn by_category(&self, category: &str) -> Vec<Quote> {
        self.quotes
            .lock()
            .values()
            .filter(|quote| quote.category == category)
            .cloned()
            .collect()
    }

    /// Picks one quote uniformly from the current contents.
    ///
    /// Returns `None` only when the store is empty.
    fn random(&self) -> Option<Quote> {
        let quotes = self.quotes.lock();
        if quotes.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..quotes.len());
        quotes.values().nth(index).cloned()
    }

    fn get(&self, id: QuoteId) -> Option<Quote> {
        self.quotes.lock().get(&id).cloned()
    }

    /// Replaces author, quote and category of an existing quote.
    fn edit(&self, id: QuoteId, draft: QuoteDraft) -> bool {
        let mut quotes = self.quotes.lock();
        match quotes.get_mut(&id) {
            Some(quote) => {
                quote.replace_fields(draft);
                debug!("event=quote_edit module=store status=ok id={id}");
                true
            }
            None => {
                debug!("event=quote_edit module=store status=not_found id={id}");
                false
            }
        }
    }

    fn delete(&self, id: QuoteId) -> bool {
        let removed = self.quotes.lock().remove(&id).is_some();
        debug!(
            "event=quote_delete module=store status={} id={id}",
            if removed { "ok" } else { "not_found" }
        );
        removed
    }

    /// Removes every quote created more than `max_age` before now.
    ///
    /// Returns the number of quotes removed.
    fn delete_older_than(&self, max_age: Duration) -> usize {
        let now = Utc::now();
        let Some(cutoff) = TimeDelta::from_std(max_age)
            .ok()
            .and_then(|age| now.checked_sub_signed(age))
        else {
            return 0;
        };

        let mut quotes = self.quotes.lock();
        let before = quotes.len();
        quotes.retain(|_, quote| !quote.is_created_before(cutoff));
        let removed = before - quotes.len();

        info!(
            "event=store_evict module=store status=ok max_age_secs={} removed={} remaining={}",
            max_age.as_secs(),
            removed,
            quotes.len()
        );
        removed
    }
}

/// Age of the i-th seeded quote, or `None` when it overflows.
fn seed_offset(i: usize) -> Option<TimeDelta> {
    i64::try_from(i)
        .ok()
        .and_then(|i| SEED_SPACING_MINUTES.checked_mul(i))
        .and_then(TimeDelta::try_minutes)
}

#[cfg(test)]
mod tests {
    use super::{seed_offset, QuoteRepository, QuoteStore};
    use crate::model::quote::QuoteDraft;
    use chrono::{Duration as TimeDelta, Utc};
    use std::time::Duration;

    #[test]
    fn seed_spaces_quotes_twenty_minutes_apart() {
        let store = QuoteStore::new();
        assert_eq!(store.seed(3), 3);

        let mut quotes = store.all();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        assert_eq!(quotes[0].author, "Author 1");
        assert_eq!(quotes[2].category, "Category 3");
        assert_eq!(
            quotes[0].created_at - quotes[1].created_at,
            TimeDelta::minutes(20)
        );
        assert!(quotes[0].created_at <= Utc::now() - TimeDelta::minutes(20));
    }

    #[test]
    fn seed_offset_overflow_is_none() {
        assert_eq!(seed_offset(3), Some(TimeDelta::minutes(60)));
        assert_eq!(seed_offset(usize::MAX), None);
        assert_eq!(seed_offset(i64::MAX as usize / 20), None);
    }

    #[test]
    fn add_keeps_pinned_created_at() {
        let store = QuoteStore::new();
        let at = Utc::now() - TimeDelta::minutes(5);
        let quote = store.add(QuoteDraft::new("a", "b", "c").created_at(at));
        assert_eq!(quote.created_at, at);
        assert!(!quote.id.is_nil());
    }

    #[test]
    fn delete_older_than_with_huge_age_removes_nothing() {
        let store = QuoteStore::new();
        store.seed(2);
        assert_eq!(store.delete_older_than(Duration::MAX), 0);
        assert_eq!(store.len(), 2);
    }
}
