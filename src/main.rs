mod app;
mod core;
mod features;
mod modules;
mod shared;

use crate::app::{AppServices, HttpSettings};
use crate::core::config::Config;
use crate::core::database;
use crate::features::auth::services::{AuthService, TokenService};
use crate::features::auth::AccessGuard;
use crate::features::evidence::repository::PgEvidenceRepository;
use crate::features::evidence::EvidenceService;
use crate::features::incidents::repository::PgIncidentRepository;
use crate::features::incidents::IncidentService;
use crate::features::users::models::UserRole;
use crate::features::users::password::PasswordHasher;
use crate::features::users::repository::PgUserRepository;
use crate::features::users::services::IdentityService;
use crate::modules::mailer::{HttpMailer, LogMailer, Mailer};
use crate::modules::storage::LocalFileStorage;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}, environment={}",
        worker_threads,
        std::process::id(),
        config.app.environment
    );
    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Repositories
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let incident_repository = Arc::new(PgIncidentRepository::new(pool.clone()));
    let evidence_repository = Arc::new(PgEvidenceRepository::new(pool.clone()));

    // Outbound mail
    let mailer: Arc<dyn Mailer> = match config.mail.api_url.clone() {
        Some(api_url) => {
            tracing::info!("Mail relay configured at {}", api_url);
            Arc::new(HttpMailer::new(api_url, &config.mail))
        }
        None => {
            tracing::warn!("MAIL_API_URL not set; validation emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    // Evidence storage
    let storage = Arc::new(LocalFileStorage::new(&config.storage));
    storage
        .ensure_root()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare upload directory: {}", e))?;
    tracing::info!(
        "Evidence storage ready at {} (served under {})",
        config.storage.upload_dir.display(),
        config.storage.public_path
    );

    // Identity and auth
    let hasher = PasswordHasher::from_config(&config.auth)
        .map_err(|e| anyhow::anyhow!("Invalid password hashing parameters: {}", e))?;
    let identity_service = Arc::new(IdentityService::new(
        user_repository.clone(),
        hasher,
        mailer,
    ));
    let token_service = Arc::new(TokenService::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&identity_service),
        Arc::clone(&token_service),
    ));
    let access_guard = Arc::new(AccessGuard::new(token_service, user_repository));
    tracing::info!("Auth services initialized");

    // Staff accounts
    if let Some(admin) = &config.bootstrap.admin {
        identity_service
            .ensure_account(admin, UserRole::Admin)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bootstrap admin account: {}", e))?;
    }
    if let Some(operator) = &config.bootstrap.operator {
        identity_service
            .ensure_account(operator, UserRole::Operator)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bootstrap operator account: {}", e))?;
    }

    // Incidents and evidence
    let incident_service = Arc::new(IncidentService::new(
        incident_repository.clone(),
        evidence_repository.clone(),
    ));
    let evidence_service = Arc::new(EvidenceService::new(
        incident_repository,
        evidence_repository,
        storage,
    ));
    tracing::info!("Incident and evidence services initialized");

    let app = app::build_app(
        AppServices {
            identity: identity_service,
            auth: auth_service,
            access: access_guard,
            incidents: incident_service,
            evidence: evidence_service,
        },
        &HttpSettings::from_config(&config),
    );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
