use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::model::{DataClient, DescriptorError};
use crate::validation::{is_collection, is_valid_name};

/// Page size used when a collection is initialized without a limit.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Query-language string and page size attached to a [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySpec {
    pub ql: String,
    pub limit: u32,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            ql: String::new(),
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// A query against one entity type of a [`DataClient`].
///
/// The client reference is weak: dropping the last `Arc<DataClient>` leaves the
/// collection in place but invalid, and fetching from it fails without I/O.
#[derive(Clone)]
pub struct Collection {
    client: Weak<DataClient>,
    entity_type: String,
    query: QuerySpec,
}

impl Collection {
    pub(crate) fn new(
        client: &Arc<DataClient>,
        entity_type: impl Into<String>,
        query: QuerySpec,
    ) -> Self {
        Self {
            client: Arc::downgrade(client),
            entity_type: entity_type.into(),
            query,
        }
    }

    /// Rebinds a collection descriptor to a live client.
    ///
    /// The descriptor's `_client` must describe `client`.
    pub fn from_descriptor(
        value: &Value,
        client: &Arc<DataClient>,
    ) -> Result<Self, DescriptorError> {
        if !is_collection(value) {
            return Err(DescriptorError::NotACollection);
        }
        if value["_client"] != client.to_descriptor()? {
            return Err(DescriptorError::ClientMismatch {
                org_name: value["_client"]["orgName"].as_str().unwrap_or_default().to_owned(),
                app_name: value["_client"]["appName"].as_str().unwrap_or_default().to_owned(),
            });
        }
        let entity_type: String = serde_json::from_value(value["_type"].clone())?;
        let query: QuerySpec = serde_json::from_value(value["qs"].clone())?;
        Ok(Self::new(client, entity_type, query))
    }

    pub fn to_descriptor(&self) -> Result<Value, DescriptorError> {
        let client = self.client().ok_or(DescriptorError::ClientReleased)?;
        Ok(json!({
            "_client": client.to_descriptor()?,
            "_type": self.entity_type,
            "qs": serde_json::to_value(&self.query)?,
        }))
    }

    /// The client this collection was built against, if it is still alive.
    pub fn client(&self) -> Option<Arc<DataClient>> {
        self.client.upgrade()
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    pub fn is_valid(&self) -> bool {
        is_valid_name(&self.entity_type) && self.client().is_some_and(|client| client.is_valid())
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("entity_type", &self.entity_type)
            .field("query", &self.query)
            .field("client_alive", &(self.client.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientDescriptor;
    use crate::sdk::mock::MockDataService;
    use crate::validation::is_collection;

    fn client(org_name: &str) -> Arc<DataClient> {
        Arc::new(DataClient::new(
            ClientDescriptor::new(org_name, "myApp", "https://api.usergrid.com", true),
            Arc::new(MockDataService::new()),
        ))
    }

    #[test]
    fn test_query_spec_defaults() {
        let query = QuerySpec::default();
        assert_eq!(query.ql, "");
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_descriptor_has_collection_shape() {
        let client = client("myOrg");
        let collection = Collection::new(&client, "customers", QuerySpec::default());
        let value = collection.to_descriptor().unwrap();
        assert!(is_collection(&value));
        assert_eq!(value["_type"], "customers");
        assert_eq!(value["qs"]["limit"], 10);
    }

    #[test]
    fn test_from_descriptor_rebinds_to_matching_client() {
        let client = client("myOrg");
        let query = QuerySpec { ql: "select * where name = 'Fred'".to_owned(), limit: 20 };
        let value = Collection::new(&client, "customers", query.clone()).to_descriptor().unwrap();

        let rebuilt = Collection::from_descriptor(&value, &client).unwrap();
        assert_eq!(rebuilt.entity_type(), "customers");
        assert_eq!(rebuilt.query(), &query);
        assert!(rebuilt.is_valid());
    }

    #[test]
    fn test_from_descriptor_rejects_other_client() {
        let value = Collection::new(&client("myOrg"), "customers", QuerySpec::default())
            .to_descriptor()
            .unwrap();
        let result = Collection::from_descriptor(&value, &client("otherOrg"));
        assert!(matches!(
            result,
            Err(DescriptorError::ClientMismatch { org_name, .. }) if org_name == "myOrg"
        ));
    }

    #[test]
    fn test_dropping_client_invalidates_collection() {
        let client = client("myOrg");
        let collection = Collection::new(&client, "customers", QuerySpec::default());
        assert!(collection.is_valid());

        drop(client);
        assert!(!collection.is_valid());
        assert!(collection.client().is_none());
        assert!(matches!(collection.to_descriptor(), Err(DescriptorError::ClientReleased)));
    }
}
