use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
    Extension,
};
use chrono::Utc;

use crate::{
    api::{state::AppState, middleware::auth::CurrentSession},
    board::{admin_feed, student_feed, StudentQuery},
    domain::{Announcement, AnnouncementForm},
    error::{AppError, Result},
};

/// Admins get the whole collection; students get their filtered feed.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state.service_context.announcement_service.list().await?;

    let feed = if current.session.is_admin() {
        admin_feed(&announcements)
    } else {
        student_feed(&announcements, &query)
    };

    Ok(Json(feed))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service.get(id).await?;

    if !current.session.is_admin() && !announcement.is_visible_to_students() {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }

    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<AnnouncementForm>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let created = state.service_context.announcement_service
        .create(form, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<AnnouncementForm>,
) -> Result<Json<Announcement>> {
    let updated = state.service_context.announcement_service
        .update(id, form, Utc::now())
        .await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service_context.announcement_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
