use askama::Template;
use axum::{
    extract::{State, Query},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;

use crate::{
    api::{
        middleware::auth::CurrentSession,
        state::AppState,
    },
    board::{empty_feed_hint, student_feed, CategoryFilter, SortOrder, Stats, StudentQuery},
    domain::{Category, Role},
    error::Result,
    web::templates::{stat_cards, AnnouncementCard, HtmlTemplate, SelectOption, StatCard, UserInfo},
};

#[derive(Template)]
#[template(path = "portal/student.html")]
pub struct StudentTemplate {
    pub current_user: UserInfo,
    pub welcome_message: String,
    pub notice: Option<String>,
    pub stats: Vec<StatCard>,
    pub search: String,
    pub categories: Vec<SelectOption>,
    pub sorts: Vec<SelectOption>,
    pub announcements: Vec<AnnouncementCard>,
    pub empty_hint: String,
}

/// Raw query string of the student page. Unknown dropdown values fall back
/// to the defaults rather than failing the page.
#[derive(Debug, Default, Deserialize)]
pub struct StudentPageQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub notice: Option<String>,
}

impl StudentPageQuery {
    fn to_feed_query(&self) -> StudentQuery {
        StudentQuery {
            search: self.q.clone().unwrap_or_default(),
            category: self
                .category
                .clone()
                .and_then(|c| CategoryFilter::try_from(c).ok())
                .unwrap_or_default(),
            sort: match self.sort.as_deref() {
                Some("oldest") => SortOrder::Oldest,
                Some("title") => SortOrder::Title,
                _ => SortOrder::Newest,
            },
        }
    }
}

pub async fn student_page(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    Query(page_query): Query<StudentPageQuery>,
) -> Result<Response> {
    if current.session.is_admin() {
        return Ok(Redirect::to(Role::Admin.home_path()).into_response());
    }

    let query = page_query.to_feed_query();
    let announcements = state.service_context.announcement_service.list().await?;
    let feed = student_feed(&announcements, &query);

    let mut categories = vec![SelectOption::new(
        CategoryFilter::All.label(),
        CategoryFilter::All.label(),
        query.category == CategoryFilter::All,
    )];
    categories.extend(Category::ALL.iter().map(|c| {
        SelectOption::new(c.as_str(), c.as_str(), query.category == CategoryFilter::Only(*c))
    }));

    let sorts = SortOrder::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label(), *s == query.sort))
        .collect();

    let template = StudentTemplate {
        current_user: UserInfo::from(&current.session),
        welcome_message: current.session.identity.welcome_message(),
        notice: page_query.notice,
        stats: stat_cards(&Stats::for_students(&announcements), "Total Announcements"),
        search: query.search.clone(),
        categories,
        sorts,
        announcements: feed.iter().map(AnnouncementCard::from).collect(),
        empty_hint: empty_feed_hint(&query).to_string(),
    };

    Ok(HtmlTemplate(template).into_response())
}
