use std::{sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gfis_board::{
    api::state::AppState,
    auth::{AuthService, CsrfService, HostedMagicLink, MagicLinkProvider},
    config::{LoginMode, Settings, StorageBackend},
    repository::{AnnouncementRepository, JsonFileRepository, RestTableRepository},
    service::ServiceContext,
};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gfis_board=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!("Starting GFIS announcement board on {}", settings.bind_address());

    // Pick the announcement store
    let announcement_repo: Arc<dyn AnnouncementRepository> = match (&settings.storage.backend, &settings.remote) {
        (StorageBackend::Remote, Some(remote)) => {
            tracing::info!("Using hosted table {} at {}", remote.table, remote.url);
            Arc::new(RestTableRepository::new(remote))
        }
        (StorageBackend::Remote, None) => {
            anyhow::bail!("storage.backend is remote but no [remote] section is configured");
        }
        (StorageBackend::Local, _) => {
            let repo = JsonFileRepository::new(&settings.storage.data_dir);
            tracing::info!("Using local storage at {}", repo.path().display());
            Arc::new(repo)
        }
    };

    // One-time link login goes through the hosted auth endpoint
    let magic_link: Option<Arc<dyn MagicLinkProvider>> = match (settings.auth.mode, &settings.remote) {
        (LoginMode::MagicLink, Some(remote)) => {
            let provider: Arc<dyn MagicLinkProvider> = Arc::new(HostedMagicLink::new(remote));
            Some(provider)
        }
        (LoginMode::MagicLink, None) => {
            anyhow::bail!("auth.mode is magic_link but no [remote] section is configured");
        }
        (LoginMode::Open, _) => {
            tracing::warn!(
                "Login mode is open: any address ending in {} gets a session without a credential check",
                settings.auth.allowed_domain
            );
            None
        }
    };

    let auth_service = Arc::new(AuthService::new(&settings.auth, magic_link));
    let csrf_service = Arc::new(CsrfService::new(&settings.auth.session_secret)?);

    let service_context = Arc::new(ServiceContext::new(
        announcement_repo,
        auth_service.clone(),
        csrf_service,
    ));

    // Drop expired sessions periodically
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = auth_service.cleanup_expired_sessions().await;
            if removed > 0 {
                tracing::debug!("Removed {} expired sessions", removed);
            }
        }
    });

    let app_state = AppState::new(service_context, Arc::new(settings.clone()));
    let app = gfis_board::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;

    tracing::info!("Server listening on http://{}", settings.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
