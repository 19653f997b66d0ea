//! Runs the hosted-table store against an in-process stand-in for the
//! PostgREST endpoint.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use gfis_board::{
    config::RemoteConfig,
    domain::{Announcement, Audience, Category},
    error::AppError,
    repository::{AnnouncementRepository, RestTableRepository},
};

const KEY: &str = "anon-test-key";

type Rows = Arc<Mutex<Vec<Value>>>;

fn authorized(headers: &HeaderMap) -> bool {
    let bearer = format!("Bearer {}", KEY);
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(KEY)
        && headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(bearer.as_str())
}

fn id_filter(params: &HashMap<String, String>) -> Option<i64> {
    params.get("id")?.strip_prefix("eq.")?.parse().ok()
}

async fn select(
    State(rows): State<Rows>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<Value>)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid API key"}))));
    }
    let mut rows = rows.lock().await.clone();
    if let Some(id) = id_filter(&params) {
        rows.retain(|r| r["id"].as_i64() == Some(id));
    }
    if params.get("order").map(String::as_str) == Some("created_at.desc") {
        rows.sort_by(|a, b| b["created_at"].as_str().cmp(&a["created_at"].as_str()));
    }
    Ok(Json(rows))
}

async fn insert(
    State(rows): State<Rows>,
    headers: HeaderMap,
    Json(body): Json<Vec<Value>>,
) -> Result<(StatusCode, Json<Vec<Value>>), (StatusCode, Json<Value>)> {
    let merge = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|p| p.contains("resolution=merge-duplicates"));

    let mut stored = rows.lock().await;
    let mut written = Vec::new();
    for mut row in body {
        if row.get("id").is_none() {
            let next = stored.iter().filter_map(|r| r["id"].as_i64()).max().unwrap_or(0) + 1;
            row["id"] = json!(next);
        } else if stored.iter().any(|r| r["id"] == row["id"]) {
            if !merge {
                return Err((
                    StatusCode::CONFLICT,
                    Json(json!({"message": "duplicate key value violates unique constraint \"announcements_pkey\""})),
                ));
            }
            stored.retain(|r| r["id"] != row["id"]);
        }
        stored.push(row.clone());
        written.push(row);
    }
    Ok((StatusCode::CREATED, Json(written)))
}

async fn delete(State(rows): State<Rows>, Query(params): Query<HashMap<String, String>>) -> StatusCode {
    if let Some(id) = id_filter(&params) {
        rows.lock().await.retain(|r| r["id"].as_i64() != Some(id));
    }
    StatusCode::NO_CONTENT
}

async fn broken() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "relation \"broken\" does not exist"})),
    )
}

async fn spawn_backend() -> anyhow::Result<String> {
    let rows: Rows = Arc::default();
    let app = Router::new()
        .route("/rest/v1/announcements", get(select).post(insert).delete(delete))
        .route("/rest/v1/broken", get(broken).post(broken).delete(broken))
        .with_state(rows);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(format!("http://{}", addr))
}

fn remote(url: &str, table: &str, key: &str) -> RemoteConfig {
    RemoteConfig {
        url: url.to_string(),
        anon_key: key.to_string(),
        table: table.to_string(),
    }
}

fn sample(id: i64, title: &str, day: u32) -> Announcement {
    Announcement {
        id,
        title: title.to_string(),
        content: "See the registrar".to_string(),
        category: Category::Academic,
        audience: Audience::Students,
        date: Utc.with_ymd_and_hms(2024, 8, day, 9, 0, 0).unwrap(),
        event_date: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn test_remote_crud() -> anyhow::Result<()> {
    let url = spawn_backend().await?;
    let repo = RestTableRepository::new(&remote(&url, "announcements", KEY));

    assert!(repo.list().await?.is_empty());

    repo.upsert(sample(1, "Add/Drop Period", 1)).await?;
    repo.upsert(sample(2, "Grades Released", 3)).await?;

    let all = repo.list().await?;
    let titles: Vec<&str> = all.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Grades Released", "Add/Drop Period"]);

    let mut edited = sample(1, "Add/Drop Period Extended", 1);
    edited.updated_at = Some(Utc.with_ymd_and_hms(2024, 8, 4, 9, 0, 0).unwrap());
    let saved = repo.upsert(edited).await?;
    assert_eq!(saved.title, "Add/Drop Period Extended");
    assert_eq!(repo.list().await?.len(), 2);

    let found = repo.find_by_id(1).await?.expect("record 1");
    assert_eq!(found.date, Utc.with_ymd_and_hms(2024, 8, 1, 9, 0, 0).unwrap());
    assert!(found.updated_at.is_some());

    repo.remove(1).await?;
    assert!(repo.find_by_id(1).await?.is_none());
    assert_eq!(repo.list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_remote_insert_lets_table_assign_ids() -> anyhow::Result<()> {
    let url = spawn_backend().await?;
    let repo = RestTableRepository::new(&remote(&url, "announcements", KEY));

    // Same client-side id and date: the table still keeps both.
    let first = repo.insert(sample(0, "Library Week", 2)).await?;
    let second = repo.insert(sample(0, "Book Fair", 2)).await?;
    assert_ne!(first.id, second.id);

    let all = repo.list().await?;
    assert_eq!(all.len(), 2);
    assert_eq!(repo.find_by_id(first.id).await?.map(|a| a.title), Some("Library Week".to_string()));
    assert_eq!(repo.find_by_id(second.id).await?.map(|a| a.title), Some("Book Fair".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_backend_errors_surface_message() -> anyhow::Result<()> {
    let url = spawn_backend().await?;

    let repo = RestTableRepository::new(&remote(&url, "broken", KEY));
    match repo.list().await {
        Err(AppError::External(msg)) => assert_eq!(msg, "relation \"broken\" does not exist"),
        other => panic!("expected backend error, got {:?}", other),
    }

    let repo = RestTableRepository::new(&remote(&url, "announcements", "wrong-key"));
    match repo.list().await {
        Err(AppError::External(msg)) => assert_eq!(msg, "Invalid API key"),
        other => panic!("expected auth error, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend() {
    let repo = RestTableRepository::new(&remote("http://127.0.0.1:9", "announcements", KEY));
    assert!(matches!(repo.list().await, Err(AppError::External(_))));
}
