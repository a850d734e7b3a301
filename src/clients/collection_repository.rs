//! # Collection Repository
//!
//! Builds [`Collection`]s and drains them page by page.
//!
//! Every [`get_all`](CollectionRepository::get_all) call opens its own cursor and
//! fills its own [`EntityList`], so one repository can serve concurrent callers.
//! Pages are requested strictly one after another.
//!
//! ## Outcomes
//!
//! | What happened                          | Result                                  |
//! |----------------------------------------|-----------------------------------------|
//! | Client dropped or invalid              | `Err(InvalidCollection)`, no I/O        |
//! | First fetch failed                     | `Err(Remote(..))`                       |
//! | First page had no `entities` array     | `Err(InvalidEntities)`                  |
//! | A later page failed                    | `Ok(Partial { entities, error })`       |
//! | Every page arrived                     | `Ok(Complete(entities))`                |
//!
//! Each failure is also written to the repository's [`ErrorReporter`].

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::clients::RepositoryError;
use crate::model::{Collection, DataClient, EntityList, EntityPage, QuerySpec};
use crate::reporting::ErrorReporter;
use crate::validation::is_valid_name;

/// Result of draining a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Every page was fetched.
    Complete(EntityList),
    /// Pagination stopped early; `entities` holds the pages received before `error`.
    Partial {
        entities: EntityList,
        error: RepositoryError,
    },
}

impl FetchOutcome {
    pub fn entities(&self) -> &EntityList {
        match self {
            FetchOutcome::Complete(entities) | FetchOutcome::Partial { entities, .. } => entities,
        }
    }

    pub fn into_entities(self) -> EntityList {
        match self {
            FetchOutcome::Complete(entities) | FetchOutcome::Partial { entities, .. } => entities,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, FetchOutcome::Complete(_))
    }

    pub fn error(&self) -> Option<&RepositoryError> {
        match self {
            FetchOutcome::Complete(_) => None,
            FetchOutcome::Partial { error, .. } => Some(error),
        }
    }
}

#[derive(Clone, Default)]
pub struct CollectionRepository {
    reporter: ErrorReporter,
    defaults: QuerySpec,
}

impl CollectionRepository {
    pub fn new(reporter: ErrorReporter) -> Self {
        Self {
            reporter,
            defaults: QuerySpec::default(),
        }
    }

    /// Replaces the request options new collections start from.
    pub fn with_defaults(mut self, defaults: QuerySpec) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builds a collection of `entity_type` on `client`.
    ///
    /// `query` and `limit` override the defaults only when non-empty and non-zero.
    /// Returns `None` after logging when the client is invalid or the type is blank.
    /// A type made only of whitespace counts as blank, as do whitespace-only
    /// org and app names on the client.
    #[instrument(skip(self, client), fields(org = %client.org_name()))]
    pub fn init_collection(
        &self,
        client: &Arc<DataClient>,
        entity_type: &str,
        query: Option<&str>,
        limit: Option<u32>,
    ) -> Option<Collection> {
        if !client.is_valid() || !is_valid_name(entity_type) {
            self.reporter.initialization_failure();
            return None;
        }

        let mut options = self.defaults.clone();
        if let Some(ql) = query.filter(|ql| !ql.is_empty()) {
            options.ql = ql.to_owned();
        }
        if let Some(limit) = limit.filter(|limit| *limit != 0) {
            options.limit = limit;
        }

        debug!(ql = %options.ql, limit = options.limit, "Collection initialized");
        Some(Collection::new(client, entity_type, options))
    }

    /// Fetches every page of `collection` into a fresh [`EntityList`].
    #[instrument(skip(self, collection), fields(entity_type = %collection.entity_type()))]
    pub async fn get_all(&self, collection: &Collection) -> Result<FetchOutcome, RepositoryError> {
        let client = match collection.client() {
            Some(client) if collection.is_valid() => client,
            _ => {
                self.reporter.invalid_collection();
                return Err(RepositoryError::InvalidCollection);
            }
        };

        let mut cursor =
            client
                .service()
                .open_cursor(&client, collection.entity_type(), collection.query());

        let payload = match cursor.fetch().await {
            Ok(payload) => payload,
            Err(e) => {
                self.reporter.remote_failure(&e);
                return Err(e.into());
            }
        };
        let Some(first) = EntityPage::from_payload(payload) else {
            self.reporter.invalid_entities();
            return Err(RepositoryError::InvalidEntities);
        };

        let mut entities = EntityList::from(first);
        let mut pages = 1;
        debug!(page = pages, size = entities.len(), "Page received");

        while cursor.has_next_page() {
            let payload = match cursor.next_page().await {
                Ok(payload) => payload,
                Err(e) => {
                    self.reporter.remote_failure(&e);
                    warn!(pages, size = entities.len(), "Pagination stopped");
                    return Ok(FetchOutcome::Partial {
                        entities,
                        error: e.into(),
                    });
                }
            };
            let Some(page) = EntityPage::from_payload(payload) else {
                self.reporter.invalid_entities();
                warn!(pages, size = entities.len(), "Pagination stopped");
                return Ok(FetchOutcome::Partial {
                    entities,
                    error: RepositoryError::InvalidEntities,
                });
            };
            entities.append_page(page);
            pages += 1;
            debug!(page = pages, size = entities.len(), "Page received");
        }

        info!(pages, size = entities.len(), "Collection fetched");
        Ok(FetchOutcome::Complete(entities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientDescriptor;
    use crate::reporting::{
        RecordingSink, INITIALIZATION_FAILURE_MSG, INVALID_COLLECTION_MSG, INVALID_ENTITIES_MSG,
    };
    use crate::sdk::mock::{MockCall, MockDataService};
    use crate::sdk::RemoteError;
    use serde_json::{json, Value};

    struct Fixture {
        mock: MockDataService,
        sink: RecordingSink,
        repository: CollectionRepository,
        client: Arc<DataClient>,
    }

    fn fixture() -> Fixture {
        let mock = MockDataService::new();
        let sink = RecordingSink::new();
        let repository = CollectionRepository::new(ErrorReporter::new(Arc::new(sink.clone())));
        let client = Arc::new(DataClient::new(
            ClientDescriptor::new("myOrg", "myApp", "https://api.usergrid.com", false),
            Arc::new(mock.clone()),
        ));
        Fixture {
            mock,
            sink,
            repository,
            client,
        }
    }

    fn named(names: &[&str]) -> Vec<Value> {
        names.iter().map(|name| json!({ "name": name })).collect()
    }

    #[test]
    fn test_init_collection_uses_defaults() {
        let f = fixture();
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        assert_eq!(collection.entity_type(), "customers");
        assert_eq!(collection.query(), &QuerySpec { ql: String::new(), limit: 10 });
        assert!(f.sink.is_empty());
    }

    #[test]
    fn test_init_collection_applies_overrides() {
        let f = fixture();
        let collection = f
            .repository
            .init_collection(&f.client, "customers", Some("select * where x"), Some(20))
            .unwrap();

        assert_eq!(collection.query().ql, "select * where x");
        assert_eq!(collection.query().limit, 20);
    }

    #[test]
    fn test_empty_overrides_fall_back_to_defaults() {
        let f = fixture();
        let repository = f
            .repository
            .clone()
            .with_defaults(QuerySpec { ql: "order by name".to_owned(), limit: 5 });

        let collection = repository
            .init_collection(&f.client, "customers", Some(""), Some(0))
            .unwrap();

        assert_eq!(collection.query().ql, "order by name");
        assert_eq!(collection.query().limit, 5);
    }

    #[test]
    fn test_init_collection_rejects_blank_type() {
        let f = fixture();
        assert!(f.repository.init_collection(&f.client, " ", None, None).is_none());
        assert_eq!(f.sink.messages(), vec![INITIALIZATION_FAILURE_MSG]);
    }

    #[test]
    fn test_init_collection_rejects_invalid_client() {
        let f = fixture();
        let client = Arc::new(DataClient::new(
            ClientDescriptor::new("", "myApp", "https://api.usergrid.com", false),
            Arc::new(f.mock.clone()),
        ));
        assert!(f.repository.init_collection(&client, "customers", None, None).is_none());
        assert_eq!(f.sink.count(INITIALIZATION_FAILURE_MSG), 1);
    }

    #[tokio::test]
    async fn test_get_all_concatenates_pages_in_order() {
        let f = fixture();
        f.mock.expect_fetch().return_entities(named(&["a", "b", "c"]));
        f.mock.expect_next_page().return_entities(named(&["d", "e"]));
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        let outcome = f.repository.get_all(&collection).await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.entities().as_slice(), named(&["a", "b", "c", "d", "e"]).as_slice());
        assert!(f.sink.is_empty());
        f.mock.verify();
    }

    #[tokio::test]
    async fn test_get_all_passes_collection_query_to_service() {
        let f = fixture();
        f.mock.expect_fetch().return_entities(vec![]);
        let collection = f
            .repository
            .init_collection(&f.client, "customers", Some("select * where x"), Some(20))
            .unwrap();

        let outcome = f.repository.get_all(&collection).await.unwrap();

        assert!(outcome.entities().is_empty());
        assert_eq!(
            f.mock.calls(),
            vec![
                MockCall::OpenCursor {
                    entity_type: "customers".to_owned(),
                    query: QuerySpec { ql: "select * where x".to_owned(), limit: 20 },
                },
                MockCall::Fetch,
            ]
        );
    }

    #[tokio::test]
    async fn test_get_all_builds_fresh_list_per_call() {
        let f = fixture();
        f.mock.expect_fetch().return_entities(named(&["a"]));
        f.mock.expect_fetch().return_entities(named(&["a"]));
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        let first = f.repository.get_all(&collection).await.unwrap();
        let second = f.repository.get_all(&collection).await.unwrap();

        assert_eq!(first.entities().len(), 1);
        assert_eq!(second.entities().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_collection_never_fetches() {
        let f = fixture();
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();
        let Fixture { mock, sink, repository, client } = f;
        drop(client);

        let result = repository.get_all(&collection).await;

        let error = result.unwrap_err();
        assert_eq!(error, RepositoryError::InvalidCollection);
        assert_eq!(error.to_string(), INVALID_COLLECTION_MSG);
        assert_eq!(mock.fetch_calls(), 0);
        assert_eq!(sink.messages(), vec![INVALID_COLLECTION_MSG]);
    }

    #[tokio::test]
    async fn test_first_fetch_error_is_returned() {
        let f = fixture();
        f.mock.expect_fetch().return_err(RemoteError::Other("timeout".to_owned()));
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        let result = f.repository.get_all(&collection).await;

        assert_eq!(
            result,
            Err(RepositoryError::Remote(RemoteError::Other("timeout".to_owned())))
        );
        assert_eq!(f.sink.messages(), vec!["Remote error: timeout"]);
    }

    #[tokio::test]
    async fn test_malformed_first_page_is_rejected() {
        let f = fixture();
        f.mock.expect_fetch().return_page(json!({ "entities": null }));
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        let result = f.repository.get_all(&collection).await;

        assert_eq!(result, Err(RepositoryError::InvalidEntities));
        assert_eq!(f.sink.count(INVALID_ENTITIES_MSG), 1);
    }

    #[tokio::test]
    async fn test_later_page_error_yields_partial_outcome() {
        let f = fixture();
        f.mock.expect_fetch().return_entities(named(&["a", "b"]));
        f.mock.expect_next_page().return_entities(named(&["c"]));
        f.mock.expect_next_page().return_err(RemoteError::InvalidCursor("3".to_owned()));
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        let outcome = f.repository.get_all(&collection).await.unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(
            outcome.error(),
            Some(&RepositoryError::Remote(RemoteError::InvalidCursor("3".to_owned())))
        );
        assert_eq!(outcome.into_entities().into_vec(), named(&["a", "b", "c"]));
        assert_eq!(f.sink.messages(), vec!["Invalid cursor: 3"]);
    }

    #[tokio::test]
    async fn test_malformed_later_page_yields_partial_outcome() {
        let f = fixture();
        f.mock.expect_fetch().return_entities(named(&["a"]));
        f.mock.expect_next_page().return_page(json!({ "entities": "oops" }));
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        let outcome = f.repository.get_all(&collection).await.unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::Partial {
                entities: EntityList::from(EntityPage { entities: named(&["a"]), cursor: None }),
                error: RepositoryError::InvalidEntities,
            }
        );
        assert_eq!(f.sink.count(INVALID_ENTITIES_MSG), 1);
    }

    #[tokio::test]
    async fn test_caller_can_clear_accumulated_entities() {
        let f = fixture();
        f.mock.expect_fetch().return_entities(named(&["a", "b"]));
        let collection = f.repository.init_collection(&f.client, "customers", None, None).unwrap();

        let mut entities = f.repository.get_all(&collection).await.unwrap().into_entities();
        assert_eq!(entities.len(), 2);

        entities.clear();
        assert!(entities.is_empty());
    }
}
