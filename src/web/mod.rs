pub mod templates;
pub mod portal;

use axum::{
    Router,
    extract::State,
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;

use crate::{api::state::AppState, auth::SESSION_COOKIE};

pub fn create_web_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))

        // Auth pages (web interface)
        .route("/login", get(templates::auth::login_page))
        .route("/login", post(templates::auth::login_handler))
        .route("/logout", post(templates::auth::logout_handler))

        // Portal routes
        .nest("/portal", portal::create_portal_routes(state.clone()))

        .with_state(state)
}

// GET / sends a signed-in user to their role's view, everyone else to the login page.
async fn home(State(state): State<AppState>, jar: CookieJar) -> Redirect {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(session) = state.service_context.auth_service
            .validate_session(cookie.value())
            .await
        {
            return Redirect::to(session.role().home_path());
        }
    }

    Redirect::to("/login")
}
