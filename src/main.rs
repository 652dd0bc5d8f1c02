use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use sqlx::PgPool;

use subtrack::app;
use subtrack::crypto::SigningKey;
use subtrack::repo::{PgSubscriptionStore, SubscriptionStore};
use subtrack::settings::Settings;
use subtrack::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let subscriber = telemetry::create_subscriber(settings.app.log_filter(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let pool = PgPool::connect_with(settings.database.with_db())
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let signing_key = SigningKey::new(settings.app.secret_key())?;
    let store: Arc<dyn SubscriptionStore> = Arc::new(PgSubscriptionStore::new(pool));

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    app::run(listener, store, signing_key)?
        .await
        .context("Failed to run app")
}
