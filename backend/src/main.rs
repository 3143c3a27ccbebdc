use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasknest_backend::config::Config;
use tasknest_backend::db::create_pool;
use tasknest_backend::routes;
use tasknest_backend::state::AppState;
use tasknest_backend::utils::jwt::SigningKeys;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasknest_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        jwt_private_key_path = %config.jwt_private_key_path,
        jwt_public_key_path = %config.jwt_public_key_path,
        session_lifetime_hours = config.session_lifetime_hours,
        "Loaded configuration from environment/.env"
    );

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&*pool).await?;

    let keys = SigningKeys::load(&config.jwt_private_key_path, &config.jwt_public_key_path)
        .map_err(|e| anyhow::anyhow!(e))?;

    let bind_port = config.bind_port;
    let state = AppState::new(pool, config, keys);
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], bind_port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
