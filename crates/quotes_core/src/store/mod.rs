//! Storage layer for quotes.
//!
//! # Responsibility
//! - Define the repository contract consumed by services and the evictor.
//! - Own the only shared mutable state in the process: the id-to-quote map.
//!
//! # Invariants
//! - Repository operations report missing ids through `bool`/`Option`;
//!   semantic errors are raised one layer up, in the service.

pub mod quote_store;
