//! Database layer: schema initialization, models, and queries

pub mod init;
pub mod models;
pub mod queries;

pub use init::{init_database, init_memory};
