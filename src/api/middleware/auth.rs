use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::Session,
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentSession {
    pub session: Session,
}

/// Largest form body buffered while looking for the CSRF field.
const MAX_FORM_BYTES: usize = 64 * 1024;

async fn session_from_jar(state: &AppState, jar: &CookieJar) -> Option<Session> {
    let cookie = jar.get(SESSION_COOKIE)?;
    state
        .service_context
        .auth_service
        .validate_session(cookie.value())
        .await
}

pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = session_from_jar(&state, &jar)
        .await
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(CurrentSession { session });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = session_from_jar(&state, &jar)
        .await
        .ok_or(AppError::Unauthorized)?;

    if !session.is_admin() {
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(CurrentSession { session });

    Ok(next.run(request).await)
}

/// Portal variant of `require_auth`: sends visitors to the login page
/// instead of answering 401.
pub async fn require_auth_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match session_from_jar(&state, &jar).await {
        Some(session) => {
            request.extensions_mut().insert(CurrentSession { session });
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Checks the `csrf_token` form field (or `X-CSRF-Token` header) on
/// state-changing portal requests. Runs after the session is known.
pub async fn require_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(next.run(request).await);
    }

    let session_id = request
        .extensions()
        .get::<CurrentSession>()
        .map(|c| c.session.id.clone())
        .ok_or(AppError::Unauthorized)?;

    let header_token = request
        .headers()
        .get("X-CSRF-Token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Could not read form: {}", e)))?;

    let token = header_token.or_else(|| form_field(&bytes, "csrf_token"));
    let valid = token
        .map(|t| state.service_context.csrf_service.validate_token(&session_id, &t))
        .unwrap_or(false);

    if !valid {
        tracing::warn!("Rejected {} {} with a missing or bad CSRF token", parts.method, parts.uri);
        return Err(AppError::Forbidden);
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

fn form_field(body: &[u8], name: &str) -> Option<String> {
    let body = std::str::from_utf8(body).ok()?;
    body.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != name {
            return None;
        }
        urlencoding::decode(&value.replace('+', " "))
            .ok()
            .map(|v| v.into_owned())
    })
}
