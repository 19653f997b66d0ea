use chrono::{TimeZone, Utc};
use gfis_board::{
    domain::{Announcement, Audience, Category},
    error::AppError,
    repository::{AnnouncementRepository, JsonFileRepository},
};

fn sample(id: i64, title: &str) -> Announcement {
    Announcement {
        id,
        title: title.to_string(),
        content: format!("{} details", title),
        category: Category::General,
        audience: Audience::All,
        date: Utc.with_ymd_and_hms(2024, 8, 1, 8, 0, 0).unwrap(),
        event_date: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn test_announcement_crud() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = JsonFileRepository::new(dir.path());

    // Missing file reads as empty
    assert!(repo.list().await?.is_empty());

    repo.upsert(sample(1, "Enrollment")).await?;
    repo.upsert(sample(2, "Foundation Day")).await?;
    assert_eq!(repo.list().await?.len(), 2);

    // Upsert with an existing id replaces in place
    let mut edited = sample(1, "Enrollment Extended");
    edited.category = Category::Urgent;
    repo.upsert(edited).await?;

    let found = repo.find_by_id(1).await?.expect("record 1");
    assert_eq!(found.title, "Enrollment Extended");
    assert_eq!(found.category, Category::Urgent);
    assert_eq!(repo.list().await?.len(), 2);

    let untouched = repo.find_by_id(2).await?;
    repo.remove(1).await?;
    assert!(repo.find_by_id(1).await?.is_none());
    assert_eq!(repo.find_by_id(2).await?, untouched);
    assert_eq!(untouched, Some(sample(2, "Foundation Day")));

    // Removing an unknown id is a no-op
    repo.remove(999).await?;
    assert_eq!(repo.list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_insert_allocates_ids_and_never_replaces() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = JsonFileRepository::new(dir.path());

    let first = repo.insert(sample(0, "Enrollment")).await?;
    // Same date, so the timestamp alone would collide.
    let second = repo.insert(sample(0, "Foundation Day")).await?;

    assert_eq!(first.id, first.date.timestamp_millis());
    assert_eq!(second.id, first.id + 1);

    let all = repo.list().await?;
    let titles: Vec<&str> = all.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Enrollment", "Foundation Day"]);

    Ok(())
}

#[tokio::test]
async fn test_survives_reopen() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    JsonFileRepository::new(dir.path())
        .upsert(sample(42, "Library Hours"))
        .await?;

    let reopened = JsonFileRepository::new(dir.path());
    let all = reopened.list().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 42);

    let raw = std::fs::read_to_string(reopened.path())?;
    assert!(raw.contains("\"title\": \"Library Hours\""));

    Ok(())
}

#[tokio::test]
async fn test_reads_legacy_records() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = JsonFileRepository::new(dir.path());

    // Older records have no eventDate and spell the audience "Faculty"
    std::fs::write(
        repo.path(),
        r#"[{"id":5,"title":"Meeting","content":"AVR","category":"Event","audience":"Faculty","date":"2024-08-05T10:00:00Z"}]"#,
    )?;

    let all = repo.list().await?;
    assert_eq!(all[0].audience, Audience::FacultyOnly);
    assert_eq!(all[0].event_date, None);

    Ok(())
}

#[tokio::test]
async fn test_malformed_file_is_a_storage_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = JsonFileRepository::new(dir.path());
    std::fs::write(repo.path(), "{not json")?;

    assert!(matches!(repo.list().await, Err(AppError::Storage(_))));

    Ok(())
}
