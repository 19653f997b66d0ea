use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    domain::{Announcement, AnnouncementForm},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

/// Admin create/update/delete on top of whichever store is configured.
pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Announcement>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Announcement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    /// Create a new announcement dated `now`
    pub async fn create(&self, form: AnnouncementForm, now: DateTime<Utc>) -> Result<Announcement> {
        let form = form.into_valid()?;
        let announcement = Announcement {
            // Allocated by the store.
            id: 0,
            event_date: form.event_datetime(),
            title: form.title,
            content: form.content,
            category: form.category,
            audience: form.audience,
            date: now,
            updated_at: None,
        };

        let created = self.repo.insert(announcement).await?;
        tracing::info!("Created announcement {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Replace the editable fields; the creation date is kept.
    pub async fn update(&self, id: i64, form: AnnouncementForm, now: DateTime<Utc>) -> Result<Announcement> {
        let form = form.into_valid()?;
        let mut announcement = self.get(id).await?;

        announcement.event_date = form.event_datetime();
        announcement.title = form.title;
        announcement.content = form.content;
        announcement.category = form.category;
        announcement.audience = form.audience;
        announcement.updated_at = Some(now);

        let updated = self.repo.upsert(announcement).await?;
        tracing::info!("Updated announcement {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        // Surface a 404 rather than silently ignoring a stale id.
        self.get(id).await?;
        self.repo.remove(id).await?;
        tracing::info!("Deleted announcement {}", id);
        Ok(())
    }
}
