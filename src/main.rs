use nc_news::{run_app, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nc_news=debug,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("invalid configuration: {error:#}");
            std::process::exit(1);
        }
    };
    match run_app(config).await {
        Ok(_) => (),
        Err(error) => {
            tracing::error!("server error: {error:#}");
            std::process::exit(1);
        }
    }
}
