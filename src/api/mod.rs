pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

use state::AppState;

pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))

        // API routes
        .nest("/api", api_routes(app_state.clone()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/announcements", announcement_routes(state.clone()))
        .route(
            "/stats",
            get(handlers::stats::stats).route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_auth,
            )),
        )
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    // Anyone signed in may read; only the admin may write.
    let signed_in = axum::middleware::from_fn_with_state(state.clone(), middleware::auth::require_auth);
    let admin_only = axum::middleware::from_fn_with_state(state, middleware::auth::require_admin);

    Router::new()
        .route(
            "/",
            get(handlers::announcements::list)
                .route_layer(signed_in.clone())
                .merge(post(handlers::announcements::create).route_layer(admin_only.clone())),
        )
        .route(
            "/:id",
            get(handlers::announcements::get)
                .route_layer(signed_in)
                .merge(
                    put(handlers::announcements::update)
                        .delete(handlers::announcements::delete)
                        .route_layer(admin_only),
                ),
        )
}
