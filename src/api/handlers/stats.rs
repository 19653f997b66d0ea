use axum::{
    extract::State,
    Json,
    Extension,
};

use crate::{
    api::{state::AppState, middleware::auth::CurrentSession},
    board::Stats,
    error::Result,
};

/// Counts over the collection as the caller's role sees it.
pub async fn stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<Stats>> {
    let announcements = state.service_context.announcement_service.list().await?;

    let stats = if current.session.is_admin() {
        Stats::for_admin(&announcements)
    } else {
        Stats::for_students(&announcements)
    };

    Ok(Json(stats))
}
