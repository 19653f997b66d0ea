use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }

    /// Portal page this role lands on after login.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/portal/admin",
            Role::Student => "/portal/student",
        }
    }
}

/// Outcome of the email gate, before any session exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub role: Role,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn welcome_message(&self) -> String {
        match &self.display_name {
            Some(name) => format!("Welcome Back, {}!", name),
            None => "Welcome Back!".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }

    pub fn is_admin(&self) -> bool {
        self.identity.role == Role::Admin
    }
}
