use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    api::state::AppState,
    auth::{AuthService, SESSION_COOKIE},
    web::templates::HtmlTemplate,
};

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub magic_link: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    // Present on the form, never checked.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub notice: Option<String>,
}

// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginPageQuery>,
) -> impl IntoResponse {
    HtmlTemplate(LoginTemplate {
        email: String::new(),
        error: None,
        notice: query.notice,
        magic_link: is_magic_link(&state),
    })
}

// POST /login
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth_service = &state.service_context.auth_service;

    match auth_service.login(&form.email, form.password.as_deref()).await {
        Ok(success) => {
            let jar = jar.add(auth_service.create_session_cookie(&success.token));
            let home = success.session.role().home_path();
            let target = match success.notice {
                Some(notice) => format!("{}?notice={}", home, urlencoding::encode(&notice)),
                None => home.to_string(),
            };
            (jar, Redirect::to(&target)).into_response()
        }
        Err(e) => {
            tracing::debug!("Login rejected for {}: {}", form.email, e);
            let status = match e {
                crate::error::AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                HtmlTemplate(LoginTemplate {
                    email: form.email,
                    error: Some(e.user_message()),
                    notice: None,
                    magic_link: is_magic_link(&state),
                }),
            )
                .into_response()
        }
    }
}

// POST /logout
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    (jar.add(AuthService::create_logout_cookie()), Redirect::to("/login"))
}

fn is_magic_link(state: &AppState) -> bool {
    state.service_context.auth_service.mode() == crate::config::LoginMode::MagicLink
}
