use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::{
    config::RemoteConfig,
    domain::{Announcement, Audience, Category},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

// Row shape of the hosted `announcements` table.
#[derive(Debug, Serialize, Deserialize)]
struct TableRow {
    id: i64,
    title: String,
    content: String,
    category: Category,
    audience: Audience,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl From<TableRow> for Announcement {
    fn from(row: TableRow) -> Self {
        Announcement {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            audience: row.audience,
            date: row.created_at,
            event_date: row.event_date,
            updated_at: row.updated_at,
        }
    }
}

impl From<&Announcement> for TableRow {
    fn from(a: &Announcement) -> Self {
        TableRow {
            id: a.id,
            title: a.title.clone(),
            content: a.content.clone(),
            category: a.category,
            audience: a.audience,
            created_at: a.date,
            event_date: a.event_date,
            updated_at: a.updated_at,
        }
    }
}

// Insert body: the table assigns `id`.
#[derive(Debug, Serialize)]
struct NewRow<'a> {
    title: &'a str,
    content: &'a str,
    category: Category,
    audience: Audience,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_date: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Announcement> for NewRow<'a> {
    fn from(a: &'a Announcement) -> Self {
        NewRow {
            title: &a.title,
            content: &a.content,
            category: a.category,
            audience: a.audience,
            created_at: a.date,
            event_date: a.event_date,
        }
    }
}

#[derive(Deserialize)]
struct BackendError {
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

/// Remote store: every call is a round trip to a PostgREST-style table
/// endpoint. Nothing is cached between calls.
pub struct RestTableRepository {
    client: Client,
    endpoint: String,
    anon_key: String,
}

impl RestTableRepository {
    pub fn new(config: &RemoteConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &RemoteConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}/rest/v1/{}", config.url.trim_end_matches('/'), config.table),
            anon_key: config.anon_key.clone(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn rows(&self, response: Response) -> Result<Vec<TableRow>> {
        let body = check(response).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|e| AppError::External(format!("Unexpected response from backend: {}", e)))
    }
}

/// Turns a non-2xx reply into `AppError::External` with the backend's message.
pub(crate) async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BackendError>(&body)
        .ok()
        .and_then(|e| e.message.or(e.msg).or(e.error))
        .unwrap_or_else(|| if body.is_empty() { status.to_string() } else { body });

    Err(AppError::External(message))
}

#[async_trait]
impl AnnouncementRepository for RestTableRepository {
    async fn list(&self) -> Result<Vec<Announcement>> {
        let response = self
            .authorized(self.client.get(&self.endpoint))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        let rows = self.rows(response).await?;
        tracing::debug!("Fetched {} announcements from remote table", rows.len());
        Ok(rows.into_iter().map(Announcement::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        let response = self
            .authorized(self.client.get(&self.endpoint))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await?;

        Ok(self.rows(response).await?.into_iter().next().map(Announcement::from))
    }

    async fn insert(&self, announcement: Announcement) -> Result<Announcement> {
        // Plain insert: an id clash comes back as 409 instead of merging.
        let response = self
            .authorized(self.client.post(&self.endpoint))
            .header("Prefer", "return=representation")
            .json(&[NewRow::from(&announcement)])
            .send()
            .await?;

        self.rows(response)
            .await?
            .into_iter()
            .next()
            .map(Announcement::from)
            .ok_or_else(|| AppError::External("Backend did not return the created announcement".to_string()))
    }

    async fn upsert(&self, announcement: Announcement) -> Result<Announcement> {
        let response = self
            .authorized(self.client.post(&self.endpoint))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[TableRow::from(&announcement)])
            .send()
            .await?;

        match self.rows(response).await?.into_iter().next() {
            Some(row) => Ok(row.into()),
            // Some deployments answer 201 with an empty body; trust what we sent.
            None => Ok(announcement),
        }
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let response = self
            .authorized(self.client.delete(&self.endpoint))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}
