//! Event endpoints
//!
//! Listing and single reads are public and only ever expose active events.
//! Writes require an admin token.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use clubsite_common::api::{DataResponse, ListResponse, SuccessResponse};
use clubsite_common::models::{EventDraft, EventFilters};
use clubsite_common::time::now;
use clubsite_common::uuid_utils::parse_id;
use clubsite_common::validation::{validate_event_filters, validate_event_patch, validate_new_event};
use clubsite_common::Event;
use tracing::info;
use uuid::Uuid;

use super::{AdminUser, ApiError};
use crate::{db, AppState};

fn event_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::BadRequest("Invalid event ID format".to_string()))
}

fn not_found() -> ApiError {
    ApiError::NotFound("Event not found".to_string())
}

/// GET /api/events?upcoming=&tag=&limit=
pub async fn list_events(
    State(state): State<AppState>,
    filters: Result<Query<EventFilters>, QueryRejection>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let Query(filters) = filters?;
    let query = validate_event_filters(&filters).map_err(ApiError::Validation)?;

    let events = db::events::list_events(&state.db, &query, now())
        .await
        .map_err(|e| ApiError::internal("Error fetching events", e))?;

    Ok(Json(ListResponse::new(events)))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Event>>, ApiError> {
    let id = event_id(&id)?;
    let event = db::events::get_event(&state.db, id)
        .await
        .map_err(|e| ApiError::internal("Error fetching event", e))?
        .filter(|event| event.is_active)
        .ok_or_else(not_found)?;

    Ok(Json(DataResponse::new(event)))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    payload: Result<Json<EventDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Event>>), ApiError> {
    let Json(draft) = payload?;
    let now = now();
    let new_event = validate_new_event(&draft, now).map_err(ApiError::Validation)?;

    let event = db::events::insert_event(&state.db, &new_event, now)
        .await
        .map_err(|e| ApiError::internal("Error creating event", e))?;

    info!(id = %event.id, title = %event.title, by = %admin.username, "Event created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(event, "Event created successfully")),
    ))
}

/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    payload: Result<Json<EventDraft>, JsonRejection>,
) -> Result<Json<DataResponse<Event>>, ApiError> {
    let Json(draft) = payload?;
    let now = now();
    let patch = validate_event_patch(&draft, now).map_err(ApiError::Validation)?;
    let id = event_id(&id)?;

    let event = db::events::update_event(&state.db, id, &patch, now)
        .await
        .map_err(|e| ApiError::internal("Error updating event", e))?
        .ok_or_else(not_found)?;

    info!(id = %event.id, by = %admin.username, "Event updated");
    Ok(Json(DataResponse::with_message(event, "Event updated successfully")))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = event_id(&id)?;
    let deleted = db::events::delete_event(&state.db, id)
        .await
        .map_err(|e| ApiError::internal("Error deleting event", e))?;

    if !deleted {
        return Err(not_found());
    }

    info!(id = %id, by = %admin.username, "Event deleted");
    Ok(Json(SuccessResponse::new("Event deleted successfully")))
}

/// Build event routes
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}
