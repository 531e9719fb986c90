pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use config::{StoreOptions, connected_message};
pub use db::Record;
pub use error::EcoError;
pub use service::Manager;
