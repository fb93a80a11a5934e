//! REST API implementation for the Financials & Payouts service

pub mod collaborators;
pub mod error;
pub mod health;
pub mod payouts;
pub mod releases;
pub mod settings;
pub mod splits;
pub mod summaries;

pub use error::ApiError;
