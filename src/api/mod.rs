//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;

pub use request::Form;
pub use request::QueryParameters;
pub use response::Error;
pub use response::not_found;

use crate::storage::Storage;

mod emails;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let emails = Router::new()
        .route("/notifyAdvanced", post(emails::notify::<S>))
        .route("/status", get(emails::status::<S>))
        .route("/", delete(emails::clear::<S>));

    Router::new().nest("/emails", emails)
}
