use async_trait::async_trait;
use crate::domain::Announcement;
use crate::error::Result;

pub mod json_file_repository;
pub mod rest_table_repository;

pub use json_file_repository::JsonFileRepository;
pub use rest_table_repository::RestTableRepository;

/// Announcement store. The local JSON file and the hosted table both sit
/// behind this trait and are picked once at startup.
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Announcement>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    /// Stores a new record under an id the store allocates; the `id` passed
    /// in is ignored. Never replaces an existing record.
    async fn insert(&self, announcement: Announcement) -> Result<Announcement>;
    /// Inserts a record with a new id, or replaces the record with that id.
    async fn upsert(&self, announcement: Announcement) -> Result<Announcement>;
    /// Removing an id that is not stored is a no-op.
    async fn remove(&self, id: i64) -> Result<()>;
}
