//! Core use-case services.
//!
//! # Responsibility
//! - Validate boundary input (ids, category keys) before it reaches storage.
//! - Keep gateway layers decoupled from storage details.

pub mod quote_service;
