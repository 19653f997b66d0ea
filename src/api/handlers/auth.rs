use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    auth::{AuthService, SESSION_COOKIE},
    domain::Role,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    /// Accepted for form compatibility; never checked.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub redirect: String,
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let auth_service = &state.service_context.auth_service;
    let success = auth_service
        .login(&req.email, req.password.as_deref())
        .await?;

    let cookie = auth_service.create_session_cookie(&success.token);
    let identity = success.session.identity;

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            redirect: identity.role.home_path().to_string(),
            message: success.notice.unwrap_or_else(|| "Login successful".to_string()),
            email: identity.email,
            role: identity.role,
            display_name: identity.display_name,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}
