//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{
    AppState, endpoints, home_page::get_home_page,
    internal_server_error::get_internal_server_error_page, not_found::get_404_not_found,
    summary::get_monthly_summary, upload::upload_files,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(
            endpoints::UPLOAD,
            post(upload_files).layer(DefaultBodyLimit::disable()),
        )
        .route(endpoints::MONTHLY_SUMMARY, get(get_monthly_summary))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}
