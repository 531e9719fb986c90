use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum EcoError {
    #[error("Failed to connect to MySQL database: {0}")]
    Connection(#[source] SqlxError),

    #[error("Not connected to MySQL database")]
    NotConnected,

    #[error("Invalid ID")]
    InvalidId,

    #[error("Query error: {0}")]
    Query(#[from] SqlxError),

    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl EcoError {
    /// True for errors raised locally, before any statement reaches the server.
    pub fn is_local(&self) -> bool {
        matches!(self, EcoError::NotConnected | EcoError::InvalidId)
    }
}

impl From<figment::Error> for EcoError {
    fn from(e: figment::Error) -> Self {
        EcoError::Config(Box::new(e))
    }
}
