use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::model::DescriptorError;
use crate::sdk::DataService;
use crate::validation::{is_data_client, is_valid_name};

/// Session token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monitoring sub-state of a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    #[serde(rename = "orgName")]
    pub org_name: String,
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(rename = "URI")]
    pub uri: String,
}

/// Serializable identity of a [`DataClient`].
///
/// Serializes to the wire shape checked by [`is_data_client`]:
///
/// ```json
/// {
///     "monitoringEnabled": false,
///     "monitor": null,
///     "orgName": "...",
///     "appName": "...",
///     "URI": "..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDescriptor {
    #[serde(rename = "monitoringEnabled")]
    pub monitoring_enabled: bool,
    pub monitor: Option<Monitor>,
    #[serde(rename = "orgName")]
    pub org_name: String,
    #[serde(rename = "appName")]
    pub app_name: String,
    #[serde(rename = "URI")]
    pub uri: String,
}

impl ClientDescriptor {
    /// Builds a descriptor, attaching a [`Monitor`] when monitoring is enabled.
    pub fn new(
        org_name: impl Into<String>,
        app_name: impl Into<String>,
        uri: impl Into<String>,
        monitoring_enabled: bool,
    ) -> Self {
        let org_name = org_name.into();
        let app_name = app_name.into();
        let uri = uri.into();
        let monitor = monitoring_enabled.then(|| Monitor {
            org_name: org_name.clone(),
            app_name: app_name.clone(),
            uri: uri.clone(),
        });
        Self {
            monitoring_enabled,
            monitor,
            org_name,
            app_name,
            uri,
        }
    }
}

/// A handle on one organization/application of the remote data service.
///
/// Callers own clients through an `Arc`; [`Collection`](crate::model::Collection)s
/// only hold a weak reference. Login mutates the session in place, so a shared
/// client sees the token acquired by any holder.
pub struct DataClient {
    descriptor: ClientDescriptor,
    service: Arc<dyn DataService>,
    session: RwLock<Option<AuthToken>>,
}

impl DataClient {
    pub fn new(descriptor: ClientDescriptor, service: Arc<dyn DataService>) -> Self {
        Self {
            descriptor,
            service,
            session: RwLock::new(None),
        }
    }

    /// Rebuilds a client from a descriptor received over the boundary.
    pub fn from_descriptor(
        value: &Value,
        service: Arc<dyn DataService>,
    ) -> Result<Self, DescriptorError> {
        if !is_data_client(value) {
            return Err(DescriptorError::NotADataClient);
        }
        let descriptor: ClientDescriptor = serde_json::from_value(value.clone())?;
        Ok(Self::new(descriptor, service))
    }

    pub fn to_descriptor(&self) -> Result<Value, DescriptorError> {
        Ok(serde_json::to_value(&self.descriptor)?)
    }

    pub fn descriptor(&self) -> &ClientDescriptor {
        &self.descriptor
    }

    pub fn org_name(&self) -> &str {
        &self.descriptor.org_name
    }

    pub fn app_name(&self) -> &str {
        &self.descriptor.app_name
    }

    pub fn uri(&self) -> &str {
        &self.descriptor.uri
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.descriptor.monitoring_enabled
    }

    pub fn service(&self) -> &Arc<dyn DataService> {
        &self.service
    }

    /// A client is usable when its organization, application and endpoint are all set.
    pub fn is_valid(&self) -> bool {
        is_valid_name(&self.descriptor.org_name)
            && is_valid_name(&self.descriptor.app_name)
            && is_valid_name(&self.descriptor.uri)
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn logout(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn set_token(&self, token: AuthToken) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }
}

impl fmt::Debug for DataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataClient")
            .field("org_name", &self.descriptor.org_name)
            .field("app_name", &self.descriptor.app_name)
            .field("uri", &self.descriptor.uri)
            .field("monitoring_enabled", &self.descriptor.monitoring_enabled)
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::mock::MockDataService;
    use serde_json::json;

    fn service() -> Arc<dyn DataService> {
        Arc::new(MockDataService::new())
    }

    #[test]
    fn test_descriptor_has_data_client_shape() {
        let client = DataClient::new(
            ClientDescriptor::new("myOrg", "myApp", "https://api.usergrid.com", true),
            service(),
        );
        let value = client.to_descriptor().unwrap();
        assert!(is_data_client(&value));
        assert_eq!(value["monitor"]["orgName"], "myOrg");
        assert_eq!(value["URI"], "https://api.usergrid.com");
    }

    #[test]
    fn test_monitor_is_null_when_monitoring_disabled() {
        let descriptor = ClientDescriptor::new("myOrg", "myApp", "https://api.usergrid.com", false);
        let value = serde_json::to_value(&descriptor).unwrap();
        assert!(value["monitor"].is_null());
        assert!(is_data_client(&value));
    }

    #[test]
    fn test_from_descriptor_rejects_partial_shape() {
        let partial = json!({ "orgName": "myOrg", "appName": "myApp" });
        let result = DataClient::from_descriptor(&partial, service());
        assert!(matches!(result, Err(DescriptorError::NotADataClient)));
    }

    #[test]
    fn test_from_descriptor_round_trips_identity() {
        let value = json!({
            "monitoringEnabled": false,
            "monitor": null,
            "orgName": "myOrg",
            "appName": "myApp",
            "URI": "https://api.usergrid.com"
        });
        let client = DataClient::from_descriptor(&value, service()).unwrap();
        assert_eq!(client.org_name(), "myOrg");
        assert_eq!(client.app_name(), "myApp");
        assert!(client.is_valid());
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_session_token_lifecycle() {
        let client = DataClient::new(
            ClientDescriptor::new("myOrg", "myApp", "https://api.usergrid.com", false),
            service(),
        );
        client.set_token(AuthToken::new("token-1"));
        assert_eq!(client.token(), Some(AuthToken::new("token-1")));
        client.logout();
        assert!(client.token().is_none());
    }

    #[test]
    fn test_blank_names_make_client_invalid() {
        let client = DataClient::new(
            ClientDescriptor::new(" ", "myApp", "https://api.usergrid.com", false),
            service(),
        );
        assert!(!client.is_valid());
    }
}
