use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use workout::{
    config::{database, settings},
    core::{cart::CreditAccount, favorites::FavoritesStore},
    errors::Result,
    storage::DatabaseStore,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Load configuration and build the venue catalog
    let config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let catalog = config
        .catalog()
        .inspect_err(|e| error!("Venue catalog is invalid: {}", e))?;
    info!("Loaded {} venues", catalog.len());
    for venue in catalog.venues() {
        info!(
            "  #{} {} ({}, {}) {:.2}/h, {} seats, rated {:.1}",
            venue.id,
            venue.name,
            venue.location.city,
            venue.location.state,
            venue.price_per_hour,
            venue.capacity,
            venue.rating
        );
    }

    // 4. Open the session credit and report order timings
    let account = CreditAccount::from_settings(&config.checkout)
        .inspect_err(|e| error!("Invalid starting credit: {}", e))?;
    info!(
        "Session credit {:.2}, checkout latency {:?}",
        account.balance(),
        config.checkout.latency()
    );
    info!(
        "Order display ticks every {:?}, settled orders leave after {:?}",
        config.orders.tick_interval(),
        config.orders.removal_delay()
    );

    // 5. Prepare the persistent key-value store
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))?;

    // 6. Report favorites that still resolve against the catalog
    let favorites = FavoritesStore::new(DatabaseStore::new(db));
    let favorite_venues = favorites.venues(&catalog).await?;
    info!("{} favorite venues", favorite_venues.len());

    Ok(())
}
