//! Domain model for stored quotes.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and gateway.
//!
//! # Invariants
//! - Every stored quote is identified by a unique `QuoteId`.
//! - Deletion is a hard delete; nothing is retained after removal.

pub mod quote;
