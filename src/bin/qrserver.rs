use qr_forge::config::ServerConfig;
use qr_forge::server::start_server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        ec_level = %config.ec_level,
        scale = config.module_scale,
        border = config.border,
        max_body_bytes = config.max_body_bytes,
        "configuration loaded"
    );

    start_server(config).await
}
