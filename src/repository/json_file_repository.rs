use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::{
    domain::{next_id, Announcement},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

/// File name of the single serialized collection.
pub const STORAGE_KEY: &str = "announcements";

/// Local store: one JSON array, rewritten in full on every mutation.
pub struct JsonFileRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Announcement>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Storage(format!("{} is not a valid announcement list: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file then rename over the collection.
    async fn write_all(&self, announcements: &[Announcement]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(announcements)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl AnnouncementRepository for JsonFileRepository {
    async fn list(&self) -> Result<Vec<Announcement>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|a| a.id == id))
    }

    async fn insert(&self, mut announcement: Announcement) -> Result<Announcement> {
        let _guard = self.lock.lock().await;
        let mut announcements = self.read_all().await?;

        // Allocated under the lock so concurrent creates cannot share an id.
        announcement.id = next_id(&announcements, announcement.date);
        announcements.push(announcement.clone());

        self.write_all(&announcements).await?;
        tracing::debug!("Inserted announcement {} ({} total)", announcement.id, announcements.len());
        Ok(announcement)
    }

    async fn upsert(&self, announcement: Announcement) -> Result<Announcement> {
        let _guard = self.lock.lock().await;
        let mut announcements = self.read_all().await?;

        match announcements.iter_mut().find(|a| a.id == announcement.id) {
            Some(existing) => *existing = announcement.clone(),
            None => announcements.push(announcement.clone()),
        }

        self.write_all(&announcements).await?;
        tracing::debug!("Stored announcement {} ({} total)", announcement.id, announcements.len());
        Ok(announcement)
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut announcements = self.read_all().await?;
        let before = announcements.len();
        announcements.retain(|a| a.id != id);

        if announcements.len() != before {
            self.write_all(&announcements).await?;
        }
        Ok(())
    }
}
