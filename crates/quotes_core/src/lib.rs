//! Core domain logic for the quotes service.
//! This crate owns the in-memory quote store and its eviction task.

pub mod evictor;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use evictor::{Evictor, EvictorConfig, Sweep, TickOutcome, MIN_SWEEP_INTERVAL};
pub use logging::{
    default_log_level, init_logging, logging_status, normalize_level, LoggingError,
};
pub use model::quote::{Quote, QuoteDraft, QuoteId};
pub use service::quote_service::{
    normalize_category, parse_quote_id, QuoteService, QuoteServiceError, ServiceResult,
};
pub use store::quote_store::{QuoteRepository, QuoteStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
