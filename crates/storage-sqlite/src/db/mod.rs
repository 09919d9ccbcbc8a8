//! Connection pool, migrations and transaction executors.

use log::{error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2::{self, ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use walletbook_core::errors::{DatabaseError, Error, Result};
use walletbook_core::wallets::{WalletRepositoryTrait, WalletTransactionExecutor};

use crate::errors::{IntoCore, StorageError};
use crate::wallets::WalletRepository;

pub mod write_actor;
pub use write_actor::WriteHandle;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Prepares the database file at `db_path` and returns the path in use.
///
/// Creates the parent directory when needed and switches the file to WAL mode.
pub fn init(db_path: &str) -> Result<String> {
    if let Some(db_dir) = Path::new(db_path).parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            fs::create_dir_all(db_dir)?;
        }
    }

    let mut conn = SqliteConnection::establish(db_path).into_core()?;
    conn.batch_execute(
        "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous  = NORMAL;
        ",
    )
    .into_core()?;

    Ok(db_path.to_string())
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = r2d2::Pool::builder()
        .max_size(8)
        .min_idle(Some(1))
        .connection_timeout(std::time::Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer))
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    info!("Created database pool for {}", db_path);
    Ok(Arc::new(pool))
}

/// Applies pending embedded migrations.
///
/// Already-applied migrations are skipped, so calling this on every startup
/// only creates the schema when it is absent.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Running database migrations");
    let mut connection = get_connection(pool)?;

    let applied = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        error!("Database migration failed: {}", e);
        Error::from(StorageError::MigrationFailed(e.to_string()))
    })?;

    if applied.is_empty() {
        info!("No pending migrations to apply.");
    } else {
        info!("Applied the following migrations:");
        for migration_version in &applied {
            info!("  - {}", migration_version);
        }
    }

    Ok(())
}

/// Gets a connection from the pool
pub fn get_connection(pool: &Pool<ConnectionManager<SqliteConnection>>) -> Result<DbConnection> {
    pool.get().into_core()
}

#[derive(Debug)]
struct ConnectionCustomizer;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionCustomizer {
    // Cascade deletes only fire when foreign keys are on, and SQLite
    // enables them per connection.
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(
            "
                PRAGMA foreign_keys = ON;
                PRAGMA busy_timeout = 30000;
                PRAGMA synchronous = NORMAL;
            ",
        )
        .map_err(r2d2::Error::QueryError)
    }
}

/// Runs wallet jobs serially through the writer actor.
#[async_trait]
impl WalletTransactionExecutor for WriteHandle {
    async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn WalletRepositoryTrait) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.exec(move |conn| {
            let mut repository = WalletRepository::new(conn);
            job(&mut repository)
        })
        .await
    }
}

/// Runs each wallet job on its own pooled connection and transaction.
#[derive(Clone)]
pub struct PooledTransactionExecutor {
    pool: Arc<DbPool>,
}

impl PooledTransactionExecutor {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletTransactionExecutor for PooledTransactionExecutor {
    async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn WalletRepositoryTrait) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = get_connection(&pool)?;
            let conn: &mut SqliteConnection = &mut pooled;
            conn.transaction::<T, StorageError, _>(|tx_conn| {
                let mut repository = WalletRepository::new(tx_conn);
                job(&mut repository).map_err(StorageError::from)
            })
            .map_err(Error::from)
        })
        .await
        .map_err(|e| Error::Unexpected(format!("transaction task failed: {}", e)))?
    }
}
