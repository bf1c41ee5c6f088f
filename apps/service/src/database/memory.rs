use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::models::{NewSite, Site, SiteId, SiteUpdate, WriteOutcome};
use super::StatusStore;

/// Process-local store. Records are cloned out whole, so a reader sees
/// either the state before an update or after it.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    sites: RwLock<Vec<Site>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn list_all(&self) -> Result<Vec<Site>, StoreError> {
        Ok(self.sites.read().await.clone())
    }

    async fn create(&self, site: NewSite) -> Result<Site, StoreError> {
        let site =
            Site { id: SiteId::generate(), url: site.url, status: true, last_changed: site.created_at };
        self.sites.write().await.push(site.clone());
        Ok(site)
    }

    async fn update(&self, id: SiteId, update: SiteUpdate) -> Result<WriteOutcome, StoreError> {
        let mut sites = self.sites.write().await;
        match sites.iter_mut().find(|site| site.id == id) {
            Some(site) => {
                site.status = update.status;
                site.last_changed = update.last_changed;
                Ok(WriteOutcome::Applied)
            }
            None => Ok(WriteOutcome::Missing),
        }
    }

    async fn delete(&self, id: SiteId) -> Result<WriteOutcome, StoreError> {
        let mut sites = self.sites.write().await;
        let before = sites.len();
        sites.retain(|site| site.id != id);

        Ok(if sites.len() < before { WriteOutcome::Applied } else { WriteOutcome::Missing })
    }
}
