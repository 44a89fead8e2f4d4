use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::retry;
use database::mongodb::connect_from_config_with_retry;
use domain_users::{
    NatsEventPublisher, SecretHasher, UserService, mongodb::MongoUserRepository,
};
use eyre::{WrapErr, eyre};
use tracing::{info, warn};

mod config;
mod openapi;
mod server;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before anything fallible
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);
    info!(?config, "Starting {}", config.service_name);

    let mongo_client = connect_from_config_with_retry(&config.mongo, None)
        .await
        .wrap_err("Failed to connect to MongoDB")?;
    let db = mongo_client.database(config.mongo.database());

    let repository = MongoUserRepository::new(&db);
    if config.mode.resets_data() {
        warn!("MODE=DEV: dropping the users collection");
        repository
            .drop_collection()
            .await
            .wrap_err("Failed to reset the users collection")?;
    }
    repository
        .ensure_indexes()
        .await
        .wrap_err("Failed to create user indexes")?;

    info!(url = %config.nats.url, "Connecting to NATS");
    let nats_url = config.nats.url.clone();
    let nats = retry(|| async_nats::connect(nats_url.as_str()))
        .await
        .wrap_err("Failed to connect to NATS")?;
    let publisher = NatsEventPublisher::new(
        async_nats::jetstream::new(nats.clone()),
        config.nats.stream.clone(),
        config.nats.subject.clone(),
    );
    publisher
        .ensure_stream()
        .await
        .wrap_err("Failed to prepare the users stream")?;

    let hasher = SecretHasher::new(&config.secret_key)
        .map_err(|e| eyre!("Invalid SECRET_KEY: {}", e))?;

    let service = UserService::new(repository, publisher, hasher);
    let router = server::build_router(service);

    server::serve(router, &config.server, async move {
        info!("Flushing pending NATS messages");
        if let Err(e) = nats.flush().await {
            warn!(error = %e, "Failed to flush NATS connection");
        }
        drop(mongo_client);
    })
    .await
    .wrap_err("Server error")?;

    info!("User service shutdown complete");
    Ok(())
}
