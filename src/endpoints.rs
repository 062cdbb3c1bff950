//! The URIs for the app's pages and API endpoints.

/// The home page with the upload form and the monthly summary button.
pub const ROOT: &str = "/";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to upload CSV files of transactions.
pub const UPLOAD: &str = "/api/upload";
/// The route for the monthly summary chart.
pub const MONTHLY_SUMMARY: &str = "/api/summary";
