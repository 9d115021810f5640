//! Database models and queries

pub mod init;
pub mod responses;
pub mod surveys;

pub use init::{create_tables, init_database};
