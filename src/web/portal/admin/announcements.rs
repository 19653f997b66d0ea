use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    api::{
        middleware::auth::CurrentSession,
        state::AppState,
    },
    board::{admin_feed, Stats},
    domain::{Announcement, AnnouncementForm, Audience, Category, Role},
    error::{AppError, Result},
    web::templates::{stat_cards, AnnouncementCard, HtmlTemplate, SelectOption, StatCard, UserInfo},
};

/// Which record, if any, the admin form is editing. Only one edit is in
/// flight per page; the last submit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(i64),
}

impl FormMode {
    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Create",
            FormMode::Update(_) => "Update",
        }
    }

    pub fn action(&self) -> String {
        match self {
            FormMode::Create => "/portal/admin/announcements".to_string(),
            FormMode::Update(id) => format!("/portal/admin/announcements/{}", id),
        }
    }
}

pub struct FormView {
    pub submit_label: String,
    pub action: String,
    pub editing: bool,
    pub title: String,
    pub content: String,
    pub categories: Vec<SelectOption>,
    pub audiences: Vec<SelectOption>,
    pub event_date: String,
    pub error: Option<String>,
}

impl FormView {
    fn new(mode: FormMode, form: &AnnouncementForm, error: Option<String>) -> Self {
        Self {
            submit_label: mode.submit_label().to_string(),
            action: mode.action(),
            editing: matches!(mode, FormMode::Update(_)),
            title: form.title.clone(),
            content: form.content.clone(),
            categories: Category::ALL
                .iter()
                .map(|c| SelectOption::new(c.as_str(), c.as_str(), *c == form.category))
                .collect(),
            audiences: Audience::ALL
                .iter()
                .map(|a| SelectOption::new(a.as_str(), a.as_str(), *a == form.audience))
                .collect(),
            event_date: form
                .event_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "portal/admin.html")]
pub struct AdminTemplate {
    pub current_user: UserInfo,
    pub csrf_token: String,
    pub notice: Option<String>,
    pub stats: Vec<StatCard>,
    pub show_form: bool,
    pub form: FormView,
    pub announcements: Vec<AnnouncementCard>,
}

#[derive(Template)]
#[template(path = "portal/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub current_user: UserInfo,
    pub csrf_token: String,
    pub announcement: AnnouncementCard,
}

#[derive(Debug, Deserialize)]
pub struct AdminPageQuery {
    pub notice: Option<String>,
}

async fn render_admin(
    state: &AppState,
    current: &CurrentSession,
    mode: FormMode,
    form: &AnnouncementForm,
    error: Option<String>,
    notice: Option<String>,
) -> Result<AdminTemplate> {
    let announcements = state.service_context.announcement_service.list().await?;
    let csrf_token = state.service_context.csrf_service.generate_token(&current.session.id);

    Ok(AdminTemplate {
        current_user: UserInfo::from(&current.session),
        csrf_token,
        notice,
        stats: stat_cards(&Stats::for_admin(&announcements), "Total Announcements"),
        show_form: mode != FormMode::Create || error.is_some(),
        form: FormView::new(mode, form, error),
        announcements: admin_feed(&announcements).iter().map(AnnouncementCard::from).collect(),
    })
}

fn ensure_admin(current: &CurrentSession) -> Result<()> {
    if current.session.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

// GET /portal/admin
pub async fn admin_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(query): Query<AdminPageQuery>,
) -> Result<Response> {
    if !current.session.is_admin() {
        return Ok(Redirect::to(Role::Student.home_path()).into_response());
    }

    let template = render_admin(
        &state,
        &current,
        FormMode::Create,
        &AnnouncementForm::default(),
        None,
        query.notice,
    )
    .await?;

    Ok(HtmlTemplate(template).into_response())
}

// GET /portal/admin/announcements/:id/edit
pub async fn admin_edit_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Result<Response> {
    ensure_admin(&current)?;

    let announcement = state.service_context.announcement_service.get(id).await?;
    let form = AnnouncementForm::from_announcement(&announcement);
    let template = render_admin(&state, &current, FormMode::Update(id), &form, None, None).await?;

    Ok(HtmlTemplate(template).into_response())
}

// POST /portal/admin/announcements
pub async fn admin_create_announcement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Form(form): Form<AnnouncementForm>,
) -> Result<Response> {
    ensure_admin(&current)?;

    let result = state.service_context.announcement_service
        .create(form.clone(), Utc::now())
        .await;

    after_submit(&state, &current, FormMode::Create, form, result).await
}

// POST /portal/admin/announcements/:id
pub async fn admin_update_announcement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
    Form(form): Form<AnnouncementForm>,
) -> Result<Response> {
    ensure_admin(&current)?;

    let result = state.service_context.announcement_service
        .update(id, form.clone(), Utc::now())
        .await;

    after_submit(&state, &current, FormMode::Update(id), form, result).await
}

/// Success goes back to the list; validation or backend errors re-render the
/// form with what the admin typed and nothing committed.
async fn after_submit(
    state: &AppState,
    current: &CurrentSession,
    mode: FormMode,
    form: AnnouncementForm,
    result: Result<Announcement>,
) -> Result<Response> {
    match result {
        Ok(_) => Ok(Redirect::to(Role::Admin.home_path()).into_response()),
        Err(e @ (AppError::Validation(_) | AppError::External(_))) => {
            let status = match e {
                AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            };
            let template = render_admin(state, current, mode, &form, Some(e.user_message()), None).await?;
            Ok((status, HtmlTemplate(template)).into_response())
        }
        Err(e) => Err(e),
    }
}

// GET /portal/admin/announcements/:id/delete
pub async fn admin_confirm_delete_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Result<Response> {
    ensure_admin(&current)?;

    let announcement = state.service_context.announcement_service.get(id).await?;

    Ok(HtmlTemplate(ConfirmDeleteTemplate {
        current_user: UserInfo::from(&current.session),
        csrf_token: state.service_context.csrf_service.generate_token(&current.session.id),
        announcement: AnnouncementCard::from(&announcement),
    })
    .into_response())
}

// POST /portal/admin/announcements/:id/delete
pub async fn admin_delete_announcement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Result<Response> {
    ensure_admin(&current)?;

    state.service_context.announcement_service.delete(id).await?;

    Ok(Redirect::to(Role::Admin.home_path()).into_response())
}
