pub mod api;
pub mod auth;
pub mod board;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;
pub mod web;

use axum::Router;

use api::state::AppState;

/// JSON API and HTML portal on one router.
pub fn create_router(state: AppState) -> Router {
    api::create_app(state.clone()).merge(web::create_web_routes(state))
}
