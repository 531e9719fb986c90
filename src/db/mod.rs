//! Database module: the record model, table DDL, and statements.
//!
//! Layout:
//! - `models.rs`: the `Record` row type
//! - `schema.rs`: DDL and identifier quoting for the backing table
//! - `mysql.rs`: one parameterized statement per store operation

pub mod models;
pub mod mysql;
pub mod schema;

pub use models::Record;
pub use mysql::RecordStorage;
pub use schema::{create_table_sql, quote_ident};
