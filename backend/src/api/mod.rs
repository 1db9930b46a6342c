use axum::Json;
use axum::extract::{Path, Query};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::*;
use crate::schedule::WEEK_DAYS;
use crate::services::{LoadReport, RecordView, StatusReport};
use crate::state::AppState;

#[derive(Deserialize)]
struct RecordQueryParams {
    #[serde(default)]
    especialidad: String,
    #[serde(default)]
    edificio: String,
    #[serde(default)]
    tipo: String,
    #[serde(default)]
    search: String,
    page: Option<usize>,
}

#[derive(Deserialize)]
struct DoctorQueryParams {
    #[serde(default)]
    especialidad: String,
}

#[derive(Deserialize)]
struct FloorQueryParams {
    #[serde(default)]
    edificio: String,
}

#[derive(Serialize)]
struct DayOption {
    code: u8,
    name: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/records", get(list_records).post(create_record))
        .route("/api/records/from-doctor/{doctor_id}", post(create_record_for_doctor))
        .route("/api/records/{id}", delete(delete_record).patch(update_record))
        .route("/api/records/{id}/edit", post(begin_edit))
        .route("/api/records/{id}/cancel", post(cancel_edit))
        .route("/api/records/{id}/duplicate", post(duplicate_record))
        .route("/api/records/{id}/save", post(save_record))
        .route("/api/reload", post(reload))
        .route("/api/catalog/doctors", get(list_doctors))
        .route("/api/catalog/specialties", get(list_specialties))
        .route("/api/catalog/buildings", get(list_buildings))
        .route("/api/catalog/rooms", get(list_rooms))
        .route("/api/catalog/floors", get(list_floors))
        .route("/api/catalog/days", get(list_days))
        .route("/api/export", get(export_staff))
        .route("/api/status", get(status))
        .route("/api/status/error", delete(clear_error))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> StatusCode {
    match state.hospital.health().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!("health check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<RecordQueryParams>,
) -> Result<Json<RecordView>, AppError> {
    let mut store = state.store.lock().await;
    store.apply_filters(Filters {
        specialty: params.especialidad,
        building: params.edificio,
        kind: params.tipo,
        search_text: params.search,
    });
    if let Some(page) = params.page {
        store.set_page(page)?;
    }
    Ok(Json(store.view()))
}

async fn create_record(State(state): State<AppState>) -> (StatusCode, Json<CombinedRecord>) {
    let record = state.store.lock().await.add_record();
    (StatusCode::CREATED, Json(record))
}

async fn create_record_for_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<(StatusCode, Json<CombinedRecord>), AppError> {
    let record = state.store.lock().await.add_record_for_doctor(doctor_id)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RecordPatch>,
) -> Result<Json<CombinedRecord>, AppError> {
    let record = state.store.lock().await.update_field(&id, patch)?;
    Ok(Json(record))
}

async fn begin_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.lock().await.begin_edit(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cancel_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.lock().await.cancel_edit(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn duplicate_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CombinedRecord>), AppError> {
    let record = state.store.lock().await.duplicate(&id)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn save_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.dashboard().save(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.dashboard().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reload(State(state): State<AppState>) -> Json<LoadReport> {
    Json(state.dashboard().load_all().await)
}

async fn list_doctors(
    State(state): State<AppState>,
    Query(params): Query<DoctorQueryParams>,
) -> Json<Vec<Doctor>> {
    Json(state.store.lock().await.doctors_for(&params.especialidad))
}

async fn list_specialties(State(state): State<AppState>) -> Json<Vec<Specialty>> {
    Json(state.store.lock().await.collections().specialties.clone())
}

async fn list_buildings(State(state): State<AppState>) -> Json<Vec<Building>> {
    Json(state.store.lock().await.collections().buildings.clone())
}

async fn list_rooms(State(state): State<AppState>) -> Json<Vec<Room>> {
    Json(state.store.lock().await.collections().rooms.clone())
}

async fn list_floors(
    State(state): State<AppState>,
    Query(params): Query<FloorQueryParams>,
) -> Json<Vec<String>> {
    Json(state.store.lock().await.floors_for(&params.edificio))
}

async fn list_days() -> Json<Vec<DayOption>> {
    Json(
        WEEK_DAYS
            .iter()
            .map(|(code, name)| DayOption { code: *code, name: *name })
            .collect(),
    )
}

async fn export_staff(State(state): State<AppState>) -> Response {
    let file = state.dashboard().export().await;
    let content_type = file.content_type();
    let disposition = format!("attachment; filename=\"{}\"", file.file_name());
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.into_bytes(),
    )
        .into_response()
}

async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.dashboard().status().await)
}

async fn clear_error(State(state): State<AppState>) -> StatusCode {
    state.store.lock().await.clear_error();
    StatusCode::NO_CONTENT
}
