pub mod auth;

use askama::Template;
use axum::{
    response::{Html, IntoResponse, Response},
    http::StatusCode,
};
use chrono::{DateTime, Utc};

use crate::{
    board::{CountUp, Stats},
    domain::{Announcement, Session},
};

pub struct UserInfo {
    pub email: String,
    pub role: String,
}

impl From<&Session> for UserInfo {
    fn from(session: &Session) -> Self {
        Self {
            email: session.email().to_string(),
            role: session.role().as_str().to_string(),
        }
    }
}

// Make askama templates work with axum
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Failed to render template: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template: {}", err),
                ).into_response()
            }
        }
    }
}

/// "August 5, 2024"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

pub struct AnnouncementCard {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub category_slug: String,
    pub icon: String,
    pub audience: String,
    pub posted_on: String,
    pub event_on: Option<String>,
    pub is_urgent: bool,
}

impl From<&Announcement> for AnnouncementCard {
    fn from(a: &Announcement) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            content: a.content.clone(),
            category: a.category.to_string(),
            category_slug: a.category.slug().to_string(),
            icon: a.category.icon().to_string(),
            audience: a.audience.to_string(),
            posted_on: format_date(&a.date),
            event_on: a.event_date.as_ref().map(format_date),
            is_urgent: a.category == crate::domain::Category::Urgent,
        }
    }
}

pub struct StatCard {
    pub label: String,
    pub value: usize,
    /// Comma-separated count-up frames read by the page script.
    pub frames: String,
}

impl StatCard {
    fn new(label: &str, value: usize) -> Self {
        let frames = CountUp::frames(value as u64)
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            label: label.to_string(),
            value,
            frames,
        }
    }
}

pub fn stat_cards(stats: &Stats, total_label: &str) -> Vec<StatCard> {
    vec![
        StatCard::new(total_label, stats.total),
        StatCard::new("Events", stats.events),
        StatCard::new("Urgent", stats.urgent),
        StatCard::new("Academic", stats.academic),
    ]
}
