use async_trait::async_trait;
use libsql::params;

use super::error::StoreError;
use super::models::{
    NewSite, Site, SiteId, SiteUpdate, WriteOutcome, millis_to_timestamp, timestamp_to_millis,
};
use super::StatusStore;
use crate::pool::{LibsqlManager, LibsqlPool};

/// libsql-backed status store.
///
/// Every write is a single statement, so a record's status and timestamp
/// always change together.
pub struct LibsqlStatusStore {
    pool: LibsqlPool,
}

impl LibsqlStatusStore {
    /// Create a new store from an initialized pool
    pub fn new(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> Result<deadpool::managed::Object<LibsqlManager>, StoreError> {
        Ok(self.pool.get().await?)
    }
}

fn decode_row(row: &libsql::Row) -> Result<Site, StoreError> {
    let id: String = row.get(0)?;
    let last_changed: i64 = row.get(3)?;

    Ok(Site {
        id: id.parse().map_err(|e| StoreError::Corrupt(format!("bad id {id:?}: {e}")))?,
        url: row.get(1)?,
        status: row.get::<i64>(2)? != 0,
        last_changed: millis_to_timestamp(last_changed).ok_or_else(|| {
            StoreError::Corrupt(format!("timestamp {last_changed} out of range for site {id}"))
        })?,
    })
}

#[async_trait]
impl StatusStore for LibsqlStatusStore {
    async fn list_all(&self) -> Result<Vec<Site>, StoreError> {
        let conn = self.get_conn().await?;
        let mut rows =
            conn.query("SELECT id, url, status, last_changed FROM sites ORDER BY seq", ()).await?;

        let mut sites = Vec::new();
        while let Some(row) = rows.next().await? {
            sites.push(decode_row(&row)?);
        }

        Ok(sites)
    }

    async fn create(&self, site: NewSite) -> Result<Site, StoreError> {
        let conn = self.get_conn().await?;
        let id = SiteId::generate();

        conn.execute(
            "INSERT INTO sites (id, url, status, last_changed) VALUES (?, ?, 1, ?)",
            params![id.to_string(), site.url.clone(), timestamp_to_millis(site.created_at)],
        )
        .await?;

        // Round-trip through the stored precision so callers see what readers will see.
        let last_changed = millis_to_timestamp(timestamp_to_millis(site.created_at))
            .unwrap_or(site.created_at);

        Ok(Site { id, url: site.url, status: true, last_changed })
    }

    async fn update(&self, id: SiteId, update: SiteUpdate) -> Result<WriteOutcome, StoreError> {
        let conn = self.get_conn().await?;
        let changed = conn
            .execute(
                "UPDATE sites SET status = ?, last_changed = ? WHERE id = ?",
                params![
                    if update.status { 1 } else { 0 },
                    timestamp_to_millis(update.last_changed),
                    id.to_string()
                ],
            )
            .await?;

        Ok(if changed == 0 { WriteOutcome::Missing } else { WriteOutcome::Applied })
    }

    async fn delete(&self, id: SiteId) -> Result<WriteOutcome, StoreError> {
        let conn = self.get_conn().await?;
        let removed = conn.execute("DELETE FROM sites WHERE id = ?", params![id.to_string()]).await?;

        Ok(if removed == 0 { WriteOutcome::Missing } else { WriteOutcome::Applied })
    }
}
