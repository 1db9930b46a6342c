use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenda_backend::api::router;
use agenda_backend::config::AppConfig;
use agenda_backend::hospital::{
    placeholder, HospitalApi, HospitalConfig, HospitalHttpClient, InMemoryHospital,
};
use agenda_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "agenda_backend=debug,agenda::fallback=warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let hospital: Arc<dyn HospitalApi> = if config.offline {
        info!("offline mode: serving placeholder data in memory");
        Arc::new(InMemoryHospital::new(placeholder::collections()))
    } else {
        info!("hospital service at {}", config.api_url);
        Arc::new(HospitalHttpClient::new(HospitalConfig::from_app_config(&config))?)
    };

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(hospital, config);

    let report = state.dashboard().load_all().await;
    if !report.errors.is_empty() {
        tracing::warn!("initial load incomplete: {:?}", report.errors);
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
