use std::sync::Arc;
use tracing::{error, info};

use crate::clients::{ClientFactory, CollectionRepository};
use crate::config::PersistenceConfig;
use crate::reporting::ErrorReporter;
use crate::sdk::{StoreActor, StoreClient};

/// Runs an in-memory store and the services built on it.
///
/// `PersistenceSystem` is responsible for:
/// - **Lifecycle Management**: starting the [`StoreActor`] and stopping it on shutdown
/// - **Dependency Wiring**: handing the store to the [`ClientFactory`] as its data service
/// - **Configuration**: applying endpoint, monitoring and default request options
///
/// # Example
///
/// ```ignore
/// let system = PersistenceSystem::new(&config);
/// system.store.register_user("fred", "secret").await?;
///
/// let client = system.clients.init_client("myOrg", "myApp").unwrap();
/// system.clients.login(&client, "fred", "secret").await?;
/// let customers = system.collections.init_collection(&client, "customers", None, None).unwrap();
/// let outcome = system.collections.get_all(&customers).await?;
///
/// system.shutdown().await?;
/// ```
pub struct PersistenceSystem {
    /// Direct handle on the store, for seeding accounts and entities.
    pub store: StoreClient,

    pub clients: ClientFactory,

    pub collections: CollectionRepository,

    handle: tokio::task::JoinHandle<()>,
}

impl PersistenceSystem {
    /// Starts a store for the configured organization/application.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &PersistenceConfig) -> Self {
        Self::with_reporter(config, ErrorReporter::default())
    }

    pub fn with_reporter(config: &PersistenceConfig, reporter: ErrorReporter) -> Self {
        let (actor, store) = StoreActor::new(
            config.credentials.org_name.clone(),
            config.credentials.app_name.clone(),
            config.store_buffer_size,
        );
        let handle = tokio::spawn(actor.run());

        let clients = ClientFactory::from_config(config, Arc::new(store.clone()), reporter.clone());
        let collections =
            CollectionRepository::new(reporter).with_defaults(config.request_options.clone());

        Self {
            store,
            clients,
            collections,
            handle,
        }
    }

    /// Stops the store and waits for its task to finish.
    ///
    /// Clients created by the factory still hold store handles after this returns;
    /// their requests fail with
    /// [`RemoteError::ServiceClosed`](crate::sdk::RemoteError::ServiceClosed).
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the store shut down cleanly
    /// - `Err(String)` if the store task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        self.store.shutdown().await;
        drop(self.clients);
        drop(self.store);

        if let Err(e) = self.handle.await {
            error!("Store task failed: {:?}", e);
            return Err(format!("Store task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use serde_json::json;

    fn config() -> PersistenceConfig {
        PersistenceConfig {
            credentials: Credentials {
                org_name: "myOrg".to_owned(),
                app_name: "myApp".to_owned(),
                username: "fred".to_owned(),
                password: "secret".to_owned(),
            },
            ..PersistenceConfig::default()
        }
    }

    #[tokio::test]
    async fn test_system_applies_configured_defaults() {
        let mut config = config();
        config.request_options.limit = 4;
        let system = PersistenceSystem::new(&config);

        let client = system.clients.init_client("myOrg", "myApp").unwrap();
        let collection = system
            .collections
            .init_collection(&client, "customers", None, None)
            .unwrap();
        assert_eq!(collection.query().limit, 4);
        assert_eq!(client.uri(), config.endpoint_uri);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_with_live_clients() {
        let system = PersistenceSystem::new(&config());
        system.store.insert("customers", json!({ "name": "a" })).await.unwrap();
        let client = system.clients.init_client("myOrg", "myApp").unwrap();

        system.shutdown().await.unwrap();
        assert!(!client.is_logged_in());
    }
}
