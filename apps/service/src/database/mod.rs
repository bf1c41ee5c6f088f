/// Status store abstraction
///
/// One record per monitored site. The store offers independent
/// create/update/delete calls and a full listing; there is no
/// compare-and-swap, so concurrent writers follow last-write-wins.
pub mod error;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repository;

pub use error::StoreError;
pub use memory::MemoryStatusStore;
pub use models::{NewSite, Site, SiteId, SiteUpdate, WriteOutcome};
pub use repository::LibsqlStatusStore;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::pool::{LibsqlManager, LibsqlPool};

/// Storage contract the monitor and the registry rely on.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Every site, in creation order. A point-in-time snapshot per record.
    async fn list_all(&self) -> Result<Vec<Site>, StoreError>;

    /// Insert a site with `status = true` and `last_changed = created_at`.
    async fn create(&self, site: NewSite) -> Result<Site, StoreError>;

    /// Write status and timestamp together. Returns `Missing` when the id is gone.
    async fn update(&self, id: SiteId, update: SiteUpdate) -> Result<WriteOutcome, StoreError>;

    /// Remove a site. Deleting an unknown id returns `Missing`.
    async fn delete(&self, id: SiteId) -> Result<WriteOutcome, StoreError>;
}

/// Initialize database with schema
///
/// Also switches the file to WAL so listings never block the monitor's writes.
pub async fn initialize_database(conn: &libsql::Connection) -> Result<()> {
    let mut rows = conn.query("PRAGMA journal_mode = WAL", ()).await?;
    rows.next().await?;
    migrations::run_migrations(conn).await
}

/// Build the store selected by configuration, running migrations when needed.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn StatusStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory status store; sites are lost on exit");
            Ok(Arc::new(MemoryStatusStore::new()))
        }
        StoreBackend::Libsql => {
            let path = config.path.to_string_lossy().to_string();
            info!("Opening libsql status store at {}", path);

            let database = libsql::Builder::new_local(&path)
                .build()
                .await
                .with_context(|| format!("failed to open database {path}"))?;
            let pool = LibsqlPool::builder(LibsqlManager::new(database))
                .max_size(config.pool_size)
                .build()
                .context("failed to build connection pool")?;

            let conn = pool.get().await.map_err(StoreError::from)?;
            initialize_database(&conn).await?;
            drop(conn);

            Ok(Arc::new(LibsqlStatusStore::new(pool)))
        }
    }
}
