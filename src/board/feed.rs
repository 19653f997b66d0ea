use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::{Announcement, Category};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Title,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Newest, SortOrder::Oldest, SortOrder::Title];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest First",
            SortOrder::Oldest => "Oldest First",
            SortOrder::Title => "Title (A-Z)",
        }
    }
}

/// Category dropdown value; "All Categories" passes everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl TryFrom<String> for CategoryFilter {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        match value.trim() {
            "" | ALL_CATEGORIES => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.label().to_string()
    }
}

const ALL_CATEGORIES: &str = "All Categories";

impl CategoryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    fn matches(&self, announcement: &Announcement) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => announcement.category == *category,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentQuery {
    #[serde(default, rename = "q")]
    pub search: String,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub sort: SortOrder,
}

impl StudentQuery {
    pub fn is_narrowed(&self) -> bool {
        !self.search.is_empty() || self.category != CategoryFilter::All
    }
}

/// Everything a student may see, narrowed and ordered by `query`.
///
/// Faculty-only records are dropped first, then the search text is matched
/// case-insensitively against title or content, then the category filter
/// applies. Sorting is stable so equal keys keep their stored order.
pub fn student_feed(announcements: &[Announcement], query: &StudentQuery) -> Vec<Announcement> {
    let needle = query.search.to_lowercase();

    let mut feed: Vec<Announcement> = announcements
        .iter()
        .filter(|a| a.is_visible_to_students())
        .filter(|a| {
            needle.is_empty()
                || a.title.to_lowercase().contains(&needle)
                || a.content.to_lowercase().contains(&needle)
        })
        .filter(|a| query.category.matches(a))
        .cloned()
        .collect();

    feed.sort_by(|a, b| compare(a, b, query.sort));
    feed
}

fn compare(a: &Announcement, b: &Announcement, sort: SortOrder) -> Ordering {
    match sort {
        SortOrder::Newest => b.date.cmp(&a.date),
        SortOrder::Oldest => a.date.cmp(&b.date),
        // Lowercased code-point order, not locale collation: "Éxamen" sorts after "Zumba".
        SortOrder::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

/// The admin list shows the whole collection in store order.
pub fn admin_feed(announcements: &[Announcement]) -> Vec<Announcement> {
    announcements.to_vec()
}

pub fn empty_feed_hint(query: &StudentQuery) -> &'static str {
    if query.is_narrowed() {
        "Try adjusting your search or filter"
    } else {
        "No announcements yet"
    }
}
