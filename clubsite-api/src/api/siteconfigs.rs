//! Site configuration endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use clubsite_common::api::DataResponse;
use clubsite_common::models::{SiteConfigDetail, SiteConfigDraft};
use clubsite_common::time::now;
use clubsite_common::validation::{validate_new_site_config, validate_site_config_update};
use clubsite_common::{ConfigType, Error, SiteConfig, SiteConfigMap};
use tracing::info;

use super::{AdminUser, ApiError, ConfigApiError};
use crate::{db, AppState};

fn config_type(raw: &str) -> Result<ConfigType, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid configuration type".to_string()))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Configuration not found".to_string())
}

/// GET /api/siteconfigs
///
/// Active configurations keyed by type.
pub async fn list_configs(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<SiteConfigMap>>, ConfigApiError> {
    let configs = db::site_configs::list_active(&state.db)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch site configurations", e))?;

    Ok(Json(DataResponse::new(SiteConfigMap::from_configs(&configs))))
}

/// GET /api/siteconfigs/:type
pub async fn get_config(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
) -> Result<Json<DataResponse<SiteConfigDetail>>, ConfigApiError> {
    let config_type = config_type(&raw_type)?;
    let config = db::site_configs::get_by_type(&state.db, config_type)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch configuration", e))?
        .ok_or_else(not_found)?;

    Ok(Json(DataResponse::new(SiteConfigDetail::from(&config))))
}

/// POST /api/siteconfigs
pub async fn create_config(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    payload: Result<Json<SiteConfigDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<SiteConfig>>), ConfigApiError> {
    let Json(draft) = payload?;
    let new_config = validate_new_site_config(&draft).map_err(ApiError::Validation)?;

    let config = match db::site_configs::insert(&state.db, &new_config, now()).await {
        Ok(config) => config,
        Err(Error::Conflict(_)) => {
            return Err(ApiError::BadRequest(
                "Configuration for this type already exists".to_string(),
            )
            .into())
        }
        Err(e) => return Err(ApiError::internal("Failed to create site configuration", e).into()),
    };

    info!(config_type = %config.config_type, by = %admin.username, "Site configuration created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(config))))
}

/// PUT /api/siteconfigs/:type
///
/// Only the payload matching the path type is applied.
pub async fn update_config(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(raw_type): Path<String>,
    payload: Result<Json<SiteConfigDraft>, JsonRejection>,
) -> Result<Json<DataResponse<SiteConfig>>, ConfigApiError> {
    let Json(draft) = payload?;
    let config_type = config_type(&raw_type)?;
    let update = validate_site_config_update(config_type, &draft).map_err(ApiError::Validation)?;

    let config = db::site_configs::update(&state.db, config_type, &update, now())
        .await
        .map_err(|e| ApiError::internal("Failed to update site configuration", e))?
        .ok_or_else(not_found)?;

    info!(config_type = %config_type, by = %admin.username, "Site configuration updated");
    Ok(Json(DataResponse::new(config)))
}

/// Build site configuration routes
pub fn site_config_routes() -> Router<AppState> {
    Router::new()
        .route("/api/siteconfigs", get(list_configs).post(create_config))
        .route("/api/siteconfigs/:type", get(get_config).put(update_config))
}
