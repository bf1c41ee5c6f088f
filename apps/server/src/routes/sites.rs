//! Site registry endpoints.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use sitewatch_service::SiteRegistry;
use sitewatch_service::database::SiteId;

use crate::error::ApiError;

/// Body of `POST /sites`.
#[derive(Debug, Deserialize)]
pub struct AddSiteRequest {
    pub url: Option<String>,
}

/// Body of `POST /sites/delete`. `password` is accepted for older clients.
#[derive(Debug, Deserialize)]
pub struct DeleteSiteRequest {
    pub url: Option<String>,
    #[serde(alias = "password")]
    pub secret: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SiteId>,
}

impl ApiMessage {
    pub fn success(message: impl Into<String>, id: SiteId) -> Self {
        Self { status: "success", message: message.into(), id: Some(id) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: "error", message: message.into(), id: None }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Payload(err.to_string()).into());

    cfg.app_data(json_config)
        .service(add_site)
        .service(delete_site)
        .service(list_sites)
        .service(status_series);
}

#[post("/sites")]
pub async fn add_site(
    registry: web::Data<SiteRegistry>,
    body: web::Json<AddSiteRequest>,
) -> Result<HttpResponse, ApiError> {
    let site = registry.add_site(body.url.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiMessage::success("Website added successfully.", site.id)))
}

#[post("/sites/delete")]
pub async fn delete_site(
    registry: web::Data<SiteRegistry>,
    body: web::Json<DeleteSiteRequest>,
) -> Result<HttpResponse, ApiError> {
    let site = registry.delete_site(body.url.as_deref(), body.secret.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiMessage::success("Website deleted successfully.", site.id)))
}

#[get("/sites")]
pub async fn list_sites(registry: web::Data<SiteRegistry>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(registry.list_sites().await?))
}

#[get("/sites/status-series")]
pub async fn status_series(registry: web::Data<SiteRegistry>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(registry.status_series().await?))
}
