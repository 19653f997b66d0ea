mod admin;
mod announcements;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};
use crate::api::state::AppState;

pub fn create_portal_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Student view
        .route("/student", get(announcements::student_page))

        // Admin view
        .route("/admin", get(admin::announcements::admin_page))
        .route("/admin/announcements", post(admin::announcements::admin_create_announcement))
        .route("/admin/announcements/:id", post(admin::announcements::admin_update_announcement))
        .route("/admin/announcements/:id/edit", get(admin::announcements::admin_edit_page))
        .route("/admin/announcements/:id/delete", get(admin::announcements::admin_confirm_delete_page))
        .route("/admin/announcements/:id/delete", post(admin::announcements::admin_delete_announcement))

        // CSRF protection for state-changing requests (runs after auth)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::api::middleware::auth::require_csrf,
        ))
        // Require a session for all portal routes (runs first)
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::api::middleware::auth::require_auth_redirect,
        ))
}
