use std::sync::Arc;

use chrono::{Duration, Utc};
use cookie::{Cookie, SameSite};

use crate::{
    config::{AuthConfig, LoginMode},
    domain::{Identity, Role, Session},
    error::{AppError, Result},
};

pub mod csrf;
pub mod magic_link;
pub mod session;

use session::SessionStore;
pub use csrf::CsrfService;
pub use magic_link::{HostedMagicLink, MagicLinkProvider};

pub const SESSION_COOKIE: &str = "session";

/// Decides who may log in and as what, from the email address alone.
///
/// This is the whole of the access check: there is no password or
/// directory lookup behind it.
#[derive(Debug, Clone)]
pub struct EmailGate {
    allowed_domain: String,
    admin_email: String,
}

impl EmailGate {
    pub fn new(allowed_domain: &str, admin_email: &str) -> Self {
        Self {
            allowed_domain: allowed_domain.trim().to_lowercase(),
            admin_email: admin_email.trim().to_lowercase(),
        }
    }

    pub fn check(&self, email: &str) -> Result<Identity> {
        let email = email.trim().to_lowercase();

        if !email.ends_with(&self.allowed_domain) {
            return Err(AppError::Validation(format!(
                "Email must end with {}",
                self.allowed_domain
            )));
        }

        if email == self.admin_email {
            return Ok(Identity {
                email,
                role: Role::Admin,
                display_name: None,
            });
        }

        let local_part = email.split('@').next().unwrap_or_default();
        let display_name = display_name(local_part);
        Ok(Identity {
            email,
            role: Role::Student,
            display_name,
        })
    }
}

/// "juan.dela.cruz" -> "Juan Dela Cruz"
pub fn display_name(local_part: &str) -> Option<String> {
    let words: Vec<String> = local_part
        .split('.')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub struct LoginSuccess {
    pub session: Session,
    pub token: String,
    /// Extra message for the user, e.g. to go check their inbox.
    pub notice: Option<String>,
}

pub struct AuthService {
    gate: EmailGate,
    mode: LoginMode,
    magic_link: Option<Arc<dyn MagicLinkProvider>>,
    session_store: SessionStore,
    session_duration_hours: i64,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(config: &AuthConfig, magic_link: Option<Arc<dyn MagicLinkProvider>>) -> Self {
        Self {
            gate: EmailGate::new(&config.allowed_domain, &config.admin_email),
            mode: config.mode,
            magic_link,
            session_store: SessionStore::new(),
            session_duration_hours: config.session_duration_hours,
            secure_cookies: config.secure_cookies,
        }
    }

    pub fn gate(&self) -> &EmailGate {
        &self.gate
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    /// Runs the email gate and opens a session. The password, when given,
    /// is not looked at.
    pub async fn login(&self, email: &str, _password: Option<&str>) -> Result<LoginSuccess> {
        let identity = self.gate.check(email)?;

        let notice = match self.mode {
            LoginMode::Open => None,
            LoginMode::MagicLink => {
                let provider = self.magic_link.as_ref().ok_or_else(|| {
                    AppError::Internal("Magic-link login is enabled but no provider is configured".to_string())
                })?;
                provider
                    .send_link(&identity.email)
                    .await
                    .map_err(|e| AppError::External(format!("Login error: {}", e.user_message())))?;
                Some("Check your email for login link!".to_string())
            }
        };

        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(self.session_duration_hours);
        let session = self.session_store.create(identity, &token, expires_at).await;

        tracing::info!("{} logged in as {}", session.email(), session.role().as_str());

        Ok(LoginSuccess { session, token, notice })
    }

    pub async fn validate_session(&self, token: &str) -> Option<Session> {
        self.session_store.find_by_token(token).await
    }

    pub async fn invalidate_session(&self, token: &str) {
        self.session_store.delete_by_token(token).await
    }

    pub async fn cleanup_expired_sessions(&self) -> usize {
        self.session_store.cleanup_expired().await
    }

    pub fn create_session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(self.secure_cookies)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
