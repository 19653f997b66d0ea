use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Identity, Session};

/// Server-side sessions keyed by the SHA-256 of the cookie token.
///
/// Sessions live for the lifetime of the process; a restart logs everyone
/// out, same as a page reload did in the browser-only board.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(
        &self,
        identity: Identity,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            identity,
            created_at: Utc::now(),
            expires_at,
        };

        self.sessions
            .write()
            .await
            .insert(hash_token(token), session.clone());

        session
    }

    pub async fn find_by_token(&self, token: &str) -> Option<Session> {
        let token_hash = hash_token(token);
        let now = Utc::now();

        let found = self.sessions.read().await.get(&token_hash).cloned();
        match found {
            Some(session) if session.expires_at > now => Some(session),
            Some(_) => {
                self.sessions.write().await.remove(&token_hash);
                None
            }
            None => None,
        }
    }

    pub async fn delete_by_token(&self, token: &str) {
        self.sessions.write().await.remove(&hash_token(token));
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_token(token: &str) -> String {
    use sha2::{Sha256, Digest};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
