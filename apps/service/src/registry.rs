//! Site registry: the operations the HTTP API exposes on top of the store.
//!
//! These calls race freely with the monitor. Creation is optimistic
//! (`status = true`, no synchronous probe); deletion is guarded by a shared
//! plain-text secret, which is a weak guard rather than authorisation.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::database::{NewSite, Site, SiteId, StatusStore, StoreError, WriteOutcome};
use crate::monitoring::Clock;
use crate::validation::validate_site_url;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Invalid secret password.")]
    Forbidden,
    #[error("Website not found.")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Row of the site listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    pub id: SiteId,
    pub url: String,
    pub status: bool,
}

impl From<Site> for SiteSummary {
    fn from(site: Site) -> Self {
        Self { id: site.id, url: site.url, status: site.status }
    }
}

/// Parallel columns for charting: `timestamps[i]` pairs with `statuses[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSeries {
    /// RFC 3339 `last_changed` of each site.
    pub timestamps: Vec<String>,
    /// 1 = up, 0 = down.
    pub statuses: Vec<u8>,
}

pub struct SiteRegistry {
    store: Arc<dyn StatusStore>,
    clock: Arc<dyn Clock>,
    delete_secret: String,
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, RegistryError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RegistryError::InvalidRequest(message.to_string()))
}

impl SiteRegistry {
    pub fn new(
        store: Arc<dyn StatusStore>,
        clock: Arc<dyn Clock>,
        delete_secret: impl Into<String>,
    ) -> Self {
        Self { store, clock, delete_secret: delete_secret.into() }
    }

    /// Register a URL. The site starts out as up until a probe says otherwise.
    pub async fn add_site(&self, url: Option<&str>) -> Result<Site, RegistryError> {
        let url = required(url, "URL is required.")?;
        let validation = validate_site_url(url);
        if let Some(error) = validation.error {
            return Err(RegistryError::InvalidRequest(error));
        }

        let site = self.store.create(NewSite::new(url, self.clock.now())).await?;
        info!("Added website: {} ({})", site.url, site.id);
        Ok(site)
    }

    /// Remove the first site registered under `url`.
    ///
    /// The secret is checked before the store is touched.
    pub async fn delete_site(
        &self,
        url: Option<&str>,
        secret: Option<&str>,
    ) -> Result<Site, RegistryError> {
        let url = required(url, "URL is required.")?;
        let secret = secret.ok_or_else(|| {
            RegistryError::InvalidRequest("Secret password is required.".to_string())
        })?;
        if secret != self.delete_secret {
            return Err(RegistryError::Forbidden);
        }

        let site = self
            .store
            .list_all()
            .await?
            .into_iter()
            .find(|site| site.url == url)
            .ok_or(RegistryError::NotFound)?;

        match self.store.delete(site.id).await? {
            WriteOutcome::Applied => {
                info!("Website deleted: {} ({})", site.url, site.id);
                Ok(site)
            }
            // Someone else removed it between the lookup and the delete.
            WriteOutcome::Missing => Err(RegistryError::NotFound),
        }
    }

    pub async fn list_sites(&self) -> Result<Vec<SiteSummary>, RegistryError> {
        Ok(self.store.list_all().await?.into_iter().map(SiteSummary::from).collect())
    }

    pub async fn status_series(&self) -> Result<StatusSeries, RegistryError> {
        let sites = self.store.list_all().await?;
        let (timestamps, statuses) = sites
            .into_iter()
            .map(|site| (site.last_changed.to_rfc3339(), u8::from(site.status)))
            .unzip();

        Ok(StatusSeries { timestamps, statuses })
    }
}
