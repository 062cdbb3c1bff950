//! The monthly summary: totals the `amount` column of the transactions table
//! by calendar month and renders them as a bar chart.

mod aggregation;
mod chart;
mod handler;

pub use handler::get_monthly_summary;
