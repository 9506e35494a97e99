//! Quote use-case service.
//!
//! # Responsibility
//! - Parse and validate raw identifiers and category keys from callers.
//! - Map store `bool`/`Option` outcomes into semantic errors.
//!
//! # Invariants
//! - Malformed ids never reach the repository.
//! - Category keys are whitespace-normalized before lookup.
//! - Successful edit/delete return the full collection after the mutation.

use crate::model::quote::{Quote, QuoteDraft, QuoteId};
use crate::store::quote_store::QuoteRepository;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shortest category key accepted for lookup, in characters.
pub const MIN_CATEGORY_CHARS: usize = 2;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for quote use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteServiceError {
    /// Identifier is not a well-formed UUID.
    InvalidId(String),
    /// Category key is empty or too short after normalization.
    InvalidCategory(String),
    /// Target quote does not exist.
    NotFound(QuoteId),
}

impl Display for QuoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => write!(f, "wrong quote id: `{value}`"),
            Self::InvalidCategory(value) => write!(
                f,
                "invalid category `{value}`: must be at least {MIN_CATEGORY_CHARS} characters"
            ),
            Self::NotFound(id) => write!(f, "quote with id[{id}] not exists"),
        }
    }
}

impl Error for QuoteServiceError {}

pub type ServiceResult<T> = Result<T, QuoteServiceError>;

/// Parses an externally supplied id in standard textual UUID form.
pub fn parse_quote_id(raw: &str) -> ServiceResult<QuoteId> {
    QuoteId::parse_str(raw).map_err(|_| QuoteServiceError::InvalidId(raw.to_string()))
}

/// Trims a category key and collapses inner whitespace runs to one space.
pub fn normalize_category(raw: &str) -> ServiceResult<String> {
    let normalized = WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned();
    if normalized.chars().count() < MIN_CATEGORY_CHARS {
        return Err(QuoteServiceError::InvalidCategory(normalized));
    }
    Ok(normalized)
}

/// Quote service facade over repository implementations.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
}

impl<R: QuoteRepository> QuoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn create(&self, draft: QuoteDraft) -> Quote {
        self.repo.add(draft)
    }

    pub fn list(&self) -> Vec<Quote> {
        self.repo.all()
    }

    /// Lists quotes whose category equals the normalized key.
    pub fn list_by_category(&self, raw_category: &str) -> ServiceResult<Vec<Quote>> {
        let category = normalize_category(raw_category)?;
        Ok(self.repo.by_category(&category))
    }

    /// Returns one random quote; `None` means the store is empty.
    pub fn random(&self) -> Option<Quote> {
        self.repo.random()
    }

    /// Replaces the editable fields of quote `raw_id`.
    ///
    /// # Contract
    /// - Full replace of author, quote and category; no merge.
    /// - Returns every stored quote after the edit.
    pub fn edit(&self, raw_id: &str, draft: QuoteDraft) -> ServiceResult<Vec<Quote>> {
        let id = parse_quote_id(raw_id)?;
        if !self.repo.edit(id, draft) {
            return Err(QuoteServiceError::NotFound(id));
        }
        Ok(self.repo.all())
    }

    /// Deletes quote `raw_id` and returns every quote left.
    pub fn delete(&self, raw_id: &str) -> ServiceResult<Vec<Quote>> {
        let id = parse_quote_id(raw_id)?;
        if !self.repo.delete(id) {
            return Err(QuoteServiceError::NotFound(id));
        }
        Ok(self.repo.all())
    }
}
