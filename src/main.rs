use tokio::net::TcpListener;
use tracing::info;
use article_digest::{
    api::routes::create_router,
    config::Config,
    logging::configure_logging,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env may carry RUST_LOG, so load it before the subscriber
    dotenv::dotenv().ok();
    configure_logging();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!("Allowed origins: {:?}", config.allowed_origins());

    let app_state = AppState::from_config(config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
