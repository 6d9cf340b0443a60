use anyhow::Context;
use tracing_subscriber::EnvFilter;

use flight_ticket_booking::config::AppConfig;
use flight_ticket_booking::db::Database;
use flight_ticket_booking::repositories::Repositories;
use flight_ticket_booking::seed::seed_demo_data;
use flight_ticket_booking::server::{build_rocket, Services};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;

    // Connect to the database, or keep everything in memory when no url is set
    let repos = match &config.database_url {
        Some(url) => {
            let database = Database::new(url, config.max_connections)
                .await
                .context("connecting to database")?;
            database
                .create_tables()
                .await
                .context("creating database tables")?;
            Repositories::mysql(database.get_pool().clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            Repositories::in_memory()
        }
    };

    let services = Services::new(repos.clone(), &config);
    if config.seed_demo_data {
        seed_demo_data(&repos, &services.users)
            .await
            .context("seeding demo data")?;
    }

    tracing::info!(
        seat_restore_policy = %config.seat_restore_policy,
        pending_ticket_ttl_minutes = config.pending_ticket_ttl_minutes,
        "starting booking service"
    );

    build_rocket(services, config.sweep_interval_secs)
        .launch()
        .await
        .context("running rocket")?;
    Ok(())
}
