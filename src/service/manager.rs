use crate::config::{StoreOptions, connected_message};
use crate::db::models::Record;
use crate::db::mysql::{MySqlResult, RecordStorage};
use crate::error::EcoError;

use sqlx::{Connection, MySqlConnection};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Receives connection lifecycle messages ("connecting...", the banner) and
/// table-creation failures.
pub type DebugListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Owns a single MySQL connection and the record table it serves.
///
/// Every CRUD call first checks that a connection is held, then validates the
/// ID, then makes sure the table exists before running its own statement.
/// Statements are serialized through the connection lock.
pub struct Manager {
    options: StoreOptions,
    storage: RecordStorage,
    conn: Mutex<Option<MySqlConnection>>,
    listener: Option<DebugListener>,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("table", &self.storage.table())
            .field("host", &self.options.host)
            .field("database", &self.options.database)
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Build an unconnected manager. Call [`Manager::init_database`] before use.
    pub fn new(options: StoreOptions) -> Self {
        let storage = RecordStorage::new(options.table_name());
        Self {
            options,
            storage,
            conn: Mutex::new(None),
            listener: None,
        }
    }

    /// Build a manager and connect it straight away.
    pub async fn connect(options: StoreOptions) -> Result<Self, EcoError> {
        let manager = Self::new(options);
        manager.init_database().await?;
        Ok(manager)
    }

    pub fn with_listener(mut self, listener: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn table(&self) -> &str {
        self.storage.table()
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Open the connection if none is held. A second call is a no-op.
    pub async fn init_database(&self) -> Result<(), EcoError> {
        let mut slot = self.conn.lock().await;
        if slot.is_some() {
            debug!(table = %self.storage.table(), "already connected; reusing handle");
            return Ok(());
        }

        self.emit("connecting...");

        let connected = match self.options.connect_options() {
            Ok(opts) => MySqlConnection::connect_with(&opts)
                .await
                .map_err(EcoError::Connection),
            Err(e) => Err(e),
        };

        let mut conn = match connected {
            Ok(conn) => conn,
            Err(e) => {
                self.emit("Failed to connect");
                warn!(host = %self.options.host, port = self.options.port, error = %e, "connect failed");
                return Err(e);
            }
        };

        let StoreOptions {
            user,
            database,
            host,
            port,
            ..
        } = &self.options;
        self.emit(&connected_message(user, database, host, port));
        info!(table = %self.storage.table(), "connected");

        self.ensure_table(&mut conn).await;
        *slot = Some(conn);
        Ok(())
    }

    /// Insert the record; if the insert fails (e.g. the ID exists), update it instead.
    pub async fn write(&self, record: &Record) -> Result<MySqlResult, EcoError> {
        let mut conn = self.connection().await?;
        validate_id(&record.id)?;
        self.ensure_table(&mut conn).await;

        match self.storage.insert(&mut conn, record).await {
            Ok(res) => Ok(res),
            Err(e) => {
                debug!(id = %record.id, error = %e, "insert failed; falling back to update");
                Ok(self.storage.update(&mut conn, record).await?)
            }
        }
    }

    pub async fn read(&self, id: &str) -> Result<Option<Record>, EcoError> {
        let mut conn = self.connection().await?;
        validate_id(id)?;
        self.ensure_table(&mut conn).await;
        Ok(self.storage.select_one(&mut conn, id).await?)
    }

    /// Zero affected rows (unknown ID) is reported through the result, not as an error.
    pub async fn update(&self, record: &Record) -> Result<MySqlResult, EcoError> {
        let mut conn = self.connection().await?;
        validate_id(&record.id)?;
        self.ensure_table(&mut conn).await;
        Ok(self.storage.update(&mut conn, record).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, EcoError> {
        let mut conn = self.connection().await?;
        validate_id(id)?;
        self.ensure_table(&mut conn).await;
        self.storage.delete(&mut conn, id).await?;
        Ok(true)
    }

    pub async fn read_all(&self) -> Result<Vec<Record>, EcoError> {
        let mut conn = self.connection().await?;
        self.ensure_table(&mut conn).await;
        Ok(self.storage.select_all(&mut conn).await?)
    }

    /// Drops the whole table. The next operation recreates it.
    pub async fn delete_all(&self) -> Result<MySqlResult, EcoError> {
        let mut conn = self.connection().await?;
        Ok(self.storage.drop_table(&mut conn).await?)
    }

    async fn connection(&self) -> Result<MappedMutexGuard<'_, MySqlConnection>, EcoError> {
        let guard = self.conn.lock().await;
        MutexGuard::try_map(guard, |slot| slot.as_mut()).map_err(|_| EcoError::NotConnected)
    }

    // Failures are reported, never returned; the calling operation carries on.
    async fn ensure_table(&self, conn: &mut MySqlConnection) {
        if let Err(e) = self.storage.create_table(conn).await {
            warn!(table = %self.storage.table(), error = %e, "ensure table failed");
            self.emit(&format!(
                "Failed to create table {}: {e}",
                self.storage.table()
            ));
        }
    }

    fn emit(&self, message: &str) {
        debug!(event = "debug", "{message}");
        if let Some(listener) = &self.listener {
            listener(message);
        }
    }
}

fn validate_id(id: &str) -> Result<(), EcoError> {
    if id.is_empty() {
        return Err(EcoError::InvalidId);
    }
    Ok(())
}
