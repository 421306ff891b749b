pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult};
pub use handlers::*;

use crate::service::SuggestionService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 构建路由
pub fn router(service: Arc<SuggestionService>, max_upload_bytes: usize) -> Router {
    let suggestion_routes = Router::new()
        .route("/api/suggestions", post(create_suggestions))
        .route("/api/suggestions/export", post(export_suggestions))
        .route("/api/suggestions/export/xlsx", post(export_suggestions_xlsx))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(suggestion_routes)
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_upload_bytes)))
}
