//! HTTP gateway for the quote store.
//!
//! # Responsibility
//! - Decode requests into quote drafts and raw identifiers.
//! - Call the quote service and wrap results into the response envelope.
//!
//! # Invariants
//! - Malformed ids and bodies are rejected before any store mutation.
//! - Every response body is a `{"payload": ...}` envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use log::{info, warn};
use quotes_core::{parse_quote_id, QuoteDraft, QuoteService, QuoteStore};
use std::sync::Arc;

pub mod config;
pub mod envelope;

pub use config::{ConfigError, ServerConfig};
pub use envelope::{ApiResponse, Payload};

/// Service shared by every request handler.
pub type SharedService = Arc<QuoteService<Arc<QuoteStore>>>;

/// Builds the gateway router over a shared quote store.
pub fn router(store: Arc<QuoteStore>) -> Router {
    let service: SharedService = Arc::new(QuoteService::new(store));
    Router::new()
        .route("/quotes", get(list_quotes).post(add_quote))
        // One segment serves both lookups: GET filters by category,
        // PUT/DELETE address a quote id.
        .route(
            "/quotes/:key",
            get(list_by_category).put(edit_quote).delete(delete_quote),
        )
        .route("/randomquotes", get(random_quote))
        .with_state(service)
}

async fn add_quote(
    State(service): State<SharedService>,
    body: Result<Json<QuoteDraft>, JsonRejection>,
) -> ApiResponse {
    let Json(draft) = match body {
        Ok(body) => body,
        Err(rejection) => return malformed_body("add_quote", rejection),
    };
    let quote = service.create(draft);
    info!("event=quote_add module=http status=ok id={}", quote.id);
    ApiResponse::ok(Payload::Quote(quote))
}

async fn list_quotes(State(service): State<SharedService>) -> ApiResponse {
    ApiResponse::ok(Payload::Quotes(service.list()))
}

async fn list_by_category(
    State(service): State<SharedService>,
    Path(category): Path<String>,
) -> ApiResponse {
    match service.list_by_category(&category) {
        Ok(quotes) => ApiResponse::ok(Payload::Quotes(quotes)),
        Err(err) => err.into(),
    }
}

async fn random_quote(State(service): State<SharedService>) -> ApiResponse {
    match service.random() {
        Some(quote) => ApiResponse::ok(Payload::Quote(quote)),
        None => ApiResponse::ok(Payload::Empty),
    }
}

async fn edit_quote(
    State(service): State<SharedService>,
    Path(raw_id): Path<String>,
    body: Result<Json<QuoteDraft>, JsonRejection>,
) -> ApiResponse {
    // The id is checked before the body so a bad id wins over a bad body.
    if let Err(err) = parse_quote_id(&raw_id) {
        return err.into();
    }
    let Json(draft) = match body {
        Ok(body) => body,
        Err(rejection) => return malformed_body("edit_quote", rejection),
    };
    match service.edit(&raw_id, draft) {
        Ok(quotes) => ApiResponse::ok(Payload::Quotes(quotes)),
        Err(err) => err.into(),
    }
}

async fn delete_quote(
    State(service): State<SharedService>,
    Path(raw_id): Path<String>,
) -> ApiResponse {
    match service.delete(&raw_id) {
        Ok(quotes) => ApiResponse::ok(Payload::Quotes(quotes)),
        Err(err) => err.into(),
    }
}

fn malformed_body(handler: &str, rejection: JsonRejection) -> ApiResponse {
    warn!(
        "event=request_rejected module=http status=error handler={handler} error_code=malformed_body error={}",
        rejection.body_text()
    );
    ApiResponse::bad_request(format!("malformed request body: {}", rejection.body_text()))
}
