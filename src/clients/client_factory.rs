use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::clients::ClientError;
use crate::config::{PersistenceConfig, DEFAULT_ENDPOINT_URI};
use crate::model::{AuthToken, ClientDescriptor, DataClient};
use crate::reporting::ErrorReporter;
use crate::sdk::{DataService, RemoteError};
use crate::validation::is_valid_name;

/// Builds [`DataClient`]s against one data service and signs them in.
#[derive(Clone)]
pub struct ClientFactory {
    service: Arc<dyn DataService>,
    reporter: ErrorReporter,
    endpoint_uri: String,
    monitoring_enabled: bool,
}

impl ClientFactory {
    pub fn new(service: Arc<dyn DataService>, reporter: ErrorReporter) -> Self {
        Self {
            service,
            reporter,
            endpoint_uri: DEFAULT_ENDPOINT_URI.to_owned(),
            monitoring_enabled: false,
        }
    }

    pub fn from_config(
        config: &PersistenceConfig,
        service: Arc<dyn DataService>,
        reporter: ErrorReporter,
    ) -> Self {
        Self::new(service, reporter)
            .with_endpoint(config.endpoint_uri.clone())
            .with_monitoring(config.monitoring_enabled)
    }

    pub fn with_endpoint(mut self, uri: impl Into<String>) -> Self {
        self.endpoint_uri = uri.into();
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitoring_enabled = enabled;
        self
    }

    /// Builds a client for `org_name`/`app_name`. No I/O happens here.
    ///
    /// Returns `None` after logging when either name is empty or whitespace only.
    /// Blank names are rejected even though a remote service might accept them.
    #[instrument(skip(self))]
    pub fn init_client(&self, org_name: &str, app_name: &str) -> Option<Arc<DataClient>> {
        if !is_valid_name(org_name) || !is_valid_name(app_name) {
            self.reporter.client_initialization_failure();
            return None;
        }
        debug!(uri = %self.endpoint_uri, "Client initialized");
        Some(Arc::new(DataClient::new(
            ClientDescriptor::new(
                org_name,
                app_name,
                self.endpoint_uri.clone(),
                self.monitoring_enabled,
            ),
            self.service.clone(),
        )))
    }

    /// Exchanges credentials for a session token and records it on `client`.
    ///
    /// `client` must be valid and `username`/`password` non-blank; otherwise one
    /// diagnostic naming every rejected argument is logged and no request is sent.
    #[instrument(skip(self, client, password), fields(org = %client.org_name()))]
    pub async fn login(
        &self,
        client: &DataClient,
        username: &str,
        password: &str,
    ) -> Result<AuthToken, ClientError> {
        self.check_arguments(client, username, password)?;
        self.authenticate(client, username, password)
            .await
            .map_err(ClientError::from)
    }

    /// Callback flavor of [`login`](Self::login).
    ///
    /// Rejected arguments are logged and the callback is not invoked. Otherwise the
    /// callback, if any, receives `(Some(error), None)` or `(None, Some(token))`.
    #[instrument(skip(self, client, password, callback), fields(org = %client.org_name()))]
    pub async fn login_with_callback<F>(
        &self,
        client: &DataClient,
        username: &str,
        password: &str,
        callback: Option<F>,
    ) where
        F: FnOnce(Option<RemoteError>, Option<AuthToken>) + Send,
    {
        if self.check_arguments(client, username, password).is_err() {
            return;
        }
        let result = self.authenticate(client, username, password).await;
        if let Some(callback) = callback {
            match result {
                Ok(token) => callback(None, Some(token)),
                Err(e) => callback(Some(e), None),
            }
        }
    }

    fn check_arguments(
        &self,
        client: &DataClient,
        username: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let mut invalid = Vec::new();
        if !client.is_valid() {
            invalid.push("dataClient");
        }
        if !is_valid_name(username) {
            invalid.push("username");
        }
        if !is_valid_name(password) {
            invalid.push("password");
        }
        if invalid.is_empty() {
            return Ok(());
        }
        self.reporter.login_rejected(&invalid);
        Err(ClientError::InvalidArgument(invalid.join(", ")))
    }

    async fn authenticate(
        &self,
        client: &DataClient,
        username: &str,
        password: &str,
    ) -> Result<AuthToken, RemoteError> {
        debug!("Sending login");
        match client.service().login(client, username, password).await {
            Ok(token) => {
                client.set_token(token.clone());
                info!(username, "Logged in");
                Ok(token)
            }
            Err(e) => {
                self.reporter.login_failed(&e);
                Err(e)
            }
        }
    }
}
