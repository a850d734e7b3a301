//! # Persistence API Demo
//!
//! Seeds the in-memory store, signs in, and pages through a collection.
//!
//! Settings come from the JSON file named by `PERSISTENCE_CONFIG` when set,
//! then from `PERSISTENCE_*` variables. Missing credentials fall back to a demo
//! account.

use persistence_api::config::PersistenceConfig;
use persistence_api::lifecycle::{setup_tracing, PersistenceSystem};
use serde_json::json;
use tracing::{info, warn, Instrument};

const CUSTOMERS: usize = 25;

fn load_config() -> Result<PersistenceConfig, String> {
    let config = match std::env::var("PERSISTENCE_CONFIG") {
        Ok(path) => PersistenceConfig::from_file(path).map_err(|e| e.to_string())?,
        Err(_) => PersistenceConfig::default(),
    };
    let mut config = config.with_env_overrides().map_err(|e| e.to_string())?;

    let credentials = &mut config.credentials;
    for (field, demo) in [
        (&mut credentials.org_name, "myOrg"),
        (&mut credentials.app_name, "myApp"),
        (&mut credentials.username, "fred"),
        (&mut credentials.password, "secret"),
    ] {
        if field.is_empty() {
            *field = demo.to_owned();
        }
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = load_config()?;
    info!(credentials = ?config.credentials, "Starting persistence demo");

    let system = PersistenceSystem::new(&config);
    let credentials = &config.credentials;

    // Seed the store
    let span = tracing::info_span!("seeding");
    async {
        system
            .store
            .register_user(credentials.username.clone(), credentials.password.clone())
            .await?;
        for i in 1..=CUSTOMERS {
            system
                .store
                .insert("customers", json!({ "name": format!("customer_{i}"), "rank": i }))
                .await?;
        }
        Ok::<_, persistence_api::sdk::RemoteError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let client = system
        .clients
        .init_client(&credentials.org_name, &credentials.app_name)
        .ok_or("client could not be initialized")?;

    system
        .clients
        .login(&client, &credentials.username, &credentials.password)
        .await
        .map_err(|e| e.to_string())?;

    let customers = system
        .collections
        .init_collection(&client, "customers", None, None)
        .ok_or("collection could not be initialized")?;

    let outcome = system
        .collections
        .get_all(&customers)
        .await
        .map_err(|e| e.to_string())?;

    if let Some(error) = outcome.error() {
        warn!(error = %error, "Fetch stopped early");
    }
    let entities = outcome.into_entities();
    info!(count = entities.len(), "Customers fetched");
    for entity in entities.iter().take(3) {
        info!(name = %entity["name"], "Customer");
    }

    system.shutdown().await?;
    Ok(())
}
