use deadpool::managed::{self, Pool, RecycleError, RecycleResult};
use libsql::{Connection, Database, Error as LibsqlError};

/// Hands out connections to one libsql database.
pub struct LibsqlManager {
    database: Database,
}

impl LibsqlManager {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl managed::Manager for LibsqlManager {
    type Type = Connection;
    type Error = LibsqlError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let conn = self.database.connect()?;
        // Wait for competing writers instead of failing with SQLITE_BUSY.
        let mut rows = conn.query("PRAGMA busy_timeout = 5000", ()).await?;
        rows.next().await?;
        Ok(conn)
    }

    /// Cheap liveness probe before a pooled connection is handed out again.
    async fn recycle(
        &self,
        conn: &mut Self::Type,
        _: &managed::Metrics,
    ) -> RecycleResult<Self::Error> {
        let mut rows = conn.query("SELECT 1", ()).await?;
        match rows.next().await? {
            Some(_) => Ok(()),
            None => Err(RecycleError::Message("liveness query returned no rows".into())),
        }
    }
}

pub type LibsqlPool = Pool<LibsqlManager>;
