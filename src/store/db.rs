use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

// SQLite gets synchronous connections, one per operation; the pool just
// holds the database URL. Concurrent writers are serialized by SQLite itself
// (WAL mode), which is all the pipeline needs: bulk inserts land in disjoint
// batches and only the cascade delete requires transactional exclusivity.
pub type StorePool = Arc<Mutex<String>>;
pub type StoreConnection = SqliteConnection;

/// Platform data directory holding the local store.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().context("Failed to determine data directory for this platform")?;

    let slarc_dir = data_dir.join("slarc");
    std::fs::create_dir_all(&slarc_dir).context("Failed to create slarc data directory")?;

    Ok(slarc_dir)
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("store.db"))
}

/// Initialize the store database at a path and run pending migrations.
pub fn init_store_db_at_path(db_path: &Path, verbose: bool) -> Result<()> {
    let db_url = format!("sqlite://{}", db_path.display());

    if verbose {
        eprintln!("[STORE] Initializing database at: {}", db_path.display());
    }

    let mut conn = SqliteConnection::establish(&db_url)
        .context("Failed to connect to the store database")?;

    // WAL must be enabled outside of a transaction
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(&mut conn)
        .context("Failed to enable WAL mode")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .context("Failed to enable foreign keys")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    if verbose {
        eprintln!("[STORE] Database ready");
    }

    Ok(())
}

/// Create the store pool, initializing the database first.
///
/// `db_path` overrides the platform default (used by tests and `--db-path`).
pub async fn create_store_pool(db_path: Option<PathBuf>, verbose: bool) -> Result<StorePool> {
    let db_path = match db_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create store parent directory")?;
            }
            path
        }
        None => default_db_path()?,
    };

    init_store_db_at_path(&db_path, verbose)?;

    let db_url = format!("sqlite://{}", db_path.display());
    Ok(Arc::new(Mutex::new(db_url)))
}

/// Open a fresh synchronous connection from the pool.
pub async fn get_connection(pool: &StorePool) -> Result<StoreConnection> {
    let db_url = pool.lock().await.clone();

    let conn = SqliteConnection::establish(&db_url)
        .context("Failed to establish SQLite connection")?;

    Ok(conn)
}
