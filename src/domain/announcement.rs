use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub audience: Audience,
    /// Creation time. Edits leave it untouched and stamp `updated_at` instead.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Announcement {
    pub fn is_visible_to_students(&self) -> bool {
        self.audience.visible_to_students()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    General,
    Event,
    Academic,
    Urgent,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::General,
        Category::Event,
        Category::Academic,
        Category::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Event => "Event",
            Category::Academic => "Academic",
            Category::Urgent => "Urgent",
        }
    }

    /// CSS badge suffix, e.g. `badge-urgent`.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Event => "event",
            Category::Academic => "academic",
            Category::Urgent => "urgent",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::General => "bell",
            Category::Event => "calendar",
            Category::Academic => "users",
            Category::Urgent => "bell-ring",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "General" => Ok(Category::General),
            "Event" => Ok(Category::Event),
            "Academic" => Ok(Category::Academic),
            "Urgent" => Ok(Category::Urgent),
            _ => Err(AppError::BadRequest(format!("Invalid category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Audience {
    #[default]
    All,
    Students,
    #[serde(rename = "Faculty Only", alias = "Faculty")]
    FacultyOnly,
}

impl Audience {
    pub const ALL: [Audience; 3] = [Audience::All, Audience::Students, Audience::FacultyOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::All => "All",
            Audience::Students => "Students",
            Audience::FacultyOnly => "Faculty Only",
        }
    }

    pub fn visible_to_students(&self) -> bool {
        !matches!(self, Audience::FacultyOnly)
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "All" => Ok(Audience::All),
            "Students" => Ok(Audience::Students),
            "Faculty Only" | "Faculty" => Ok(Audience::FacultyOnly),
            _ => Err(AppError::BadRequest(format!("Invalid audience: {}", s))),
        }
    }
}

/// Admin create/edit input, shared by the portal form and the JSON API.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AnnouncementForm {
    #[validate(length(min = 1, message = "Title and content are required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Title and content are required"))]
    pub content: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub event_date: Option<NaiveDate>,
}

impl AnnouncementForm {
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();
        self
    }

    /// Trims and validates, returning the form ready to commit.
    pub fn into_valid(self) -> Result<Self> {
        let form = self.normalize();
        if form.validate().is_err() {
            return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }
        Ok(form)
    }

    pub fn event_datetime(&self) -> Option<DateTime<Utc>> {
        self.event_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }

    pub fn from_announcement(announcement: &Announcement) -> Self {
        Self {
            title: announcement.title.clone(),
            content: announcement.content.clone(),
            category: announcement.category,
            audience: announcement.audience,
            event_date: announcement.event_date.map(|d| d.date_naive()),
        }
    }
}

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and content are required";

// HTML date inputs submit "" when left blank.
fn empty_date_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Millisecond timestamp id, bumped past the largest id already stored.
pub fn next_id(existing: &[Announcement], now: DateTime<Utc>) -> i64 {
    let candidate = now.timestamp_millis();
    match existing.iter().map(|a| a.id).max() {
        Some(max) if max >= candidate => max + 1,
        _ => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(id: i64) -> Announcement {
        Announcement {
            id,
            title: "t".to_string(),
            content: "c".to_string(),
            category: Category::General,
            audience: Audience::All,
            date: Utc.timestamp_millis_opt(id).unwrap(),
            event_date: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_next_id_uses_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        assert_eq!(next_id(&[], now), now.timestamp_millis());
    }

    #[test]
    fn test_next_id_stays_unique_when_clock_lags() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let existing = vec![sample(now.timestamp_millis() + 5)];
        assert_eq!(next_id(&existing, now), now.timestamp_millis() + 6);
    }

    #[test]
    fn test_form_trims_and_rejects_blank_fields() {
        let form = AnnouncementForm {
            title: "   ".to_string(),
            content: "Body".to_string(),
            ..Default::default()
        };
        assert!(matches!(form.into_valid(), Err(AppError::Validation(_))));

        let form = AnnouncementForm {
            title: "  Exam Week ".to_string(),
            content: " Bring pencils ".to_string(),
            ..Default::default()
        };
        let valid = form.into_valid().unwrap();
        assert_eq!(valid.title, "Exam Week");
        assert_eq!(valid.content, "Bring pencils");
    }

    #[test]
    fn test_audience_labels() {
        assert_eq!("Faculty".parse::<Audience>().unwrap(), Audience::FacultyOnly);
        assert_eq!(Audience::FacultyOnly.to_string(), "Faculty Only");
        assert!(!Audience::FacultyOnly.visible_to_students());
        assert!(Audience::Students.visible_to_students());

        let json = serde_json::to_string(&Audience::FacultyOnly).unwrap();
        assert_eq!(json, "\"Faculty Only\"");
        let legacy: Audience = serde_json::from_str("\"Faculty\"").unwrap();
        assert_eq!(legacy, Audience::FacultyOnly);
    }

    #[test]
    fn test_blank_event_date_is_none() {
        let form: AnnouncementForm = serde_json::from_str(
            r#"{"title":"a","content":"b","event_date":""}"#,
        )
        .unwrap();
        assert!(form.event_date.is_none());

        let form: AnnouncementForm = serde_json::from_str(
            r#"{"title":"a","content":"b","event_date":"2024-09-15"}"#,
        )
        .unwrap();
        assert_eq!(form.event_date, NaiveDate::from_ymd_opt(2024, 9, 15));
    }
}
