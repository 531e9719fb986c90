pub mod manager;

pub use manager::{DebugListener, Manager};
