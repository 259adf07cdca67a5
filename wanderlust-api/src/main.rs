use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wanderlust_api::{app, AppState};
use wanderlust_booking::BookingManager;
use wanderlust_catalog::Catalog;
use wanderlust_core::inquiry::InquiryDesk;
use wanderlust_core::MockAuthenticator;
use wanderlust_store::{Config, FileStore, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wanderlust_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Wanderlust API on port {}", config.server.port);

    let catalog = match &config.catalog.fixtures_dir {
        Some(dir) => Catalog::load_dir(dir).context("Failed to load catalog fixtures")?,
        None => Catalog::embedded().context("Embedded catalog is malformed")?,
    };

    let storage = FileStore::open(&config.storage.path).context("Failed to open session storage")?;
    let authenticator = MockAuthenticator::new(config.auth.login_delay(), config.auth.signup_delay());
    let session = SessionStore::open(Arc::new(storage), Arc::new(authenticator));

    let inquiries = InquiryDesk::new(config.inquiry.contact_delay(), config.inquiry.newsletter_delay());

    let bookings = BookingManager::with_ttl(chrono::Duration::seconds(config.booking.draft_ttl_secs));

    let state = AppState::new(catalog, bookings, session, inquiries);
    state.spawn_draft_sweeper(config.booking.sweep_interval());
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
