//! Uploading CSV files of credit card transactions.
//!
//! Each uploaded file is parsed, trimmed down to the transaction columns and
//! appended to the `transactions` table. Files are handled independently, so
//! a bad file does not stop the others from being saved.

mod batch;
mod handler;
mod projection;
mod view;
mod writer;

pub use handler::upload_files;
#[cfg(test)]
pub(crate) use writer::count_transactions;
