use persistence_api::clients::{
    ClientError, ClientFactory, CollectionRepository, FetchOutcome, RepositoryError,
};
use persistence_api::model::{AuthToken, ClientDescriptor, DataClient, EntityList, EntityPage};
use persistence_api::reporting::{
    ErrorReporter, RecordingSink, INITIALIZATION_FAILURE_MSG, LOGIN_REJECTED_MSG,
};
use persistence_api::sdk::mock::{MockCall, MockDataService};
use persistence_api::sdk::RemoteError;
use serde_json::{json, Value};
use std::sync::Arc;

fn customers(range: std::ops::Range<u32>) -> Vec<Value> {
    range.map(|i| json!({ "uuid": i, "name": format!("customer_{i}") })).collect()
}

/// Real factory and repository with a scripted data service.
/// Exercises the whole caller flow without a store behind it.
#[tokio::test]
async fn test_login_then_drain_with_mocked_service() {
    // Setup the scripted service
    let mock = MockDataService::new();
    mock.expect_login().return_ok(AuthToken::new("token_1"));
    mock.expect_fetch().return_page(json!({ "entities": customers(0..3), "cursor": "3" }));
    mock.expect_next_page().return_page(json!({ "entities": customers(3..5), "cursor": null }));

    let sink = RecordingSink::new();
    let reporter = ErrorReporter::new(Arc::new(sink.clone()));
    let factory = ClientFactory::new(Arc::new(mock.clone()), reporter.clone());
    let repository = CollectionRepository::new(reporter);

    // Execute the caller flow
    let client = factory.init_client("myOrg", "myApp").unwrap();
    factory.login(&client, "fred", "secret").await.unwrap();
    let collection = repository
        .init_collection(&client, "customers", Some("select *"), None)
        .unwrap();
    let outcome = repository.get_all(&collection).await.unwrap();

    // Page one comes first, then page two
    assert_eq!(outcome.entities().as_slice(), customers(0..5).as_slice());
    assert!(client.is_logged_in());
    assert!(sink.is_empty());

    assert_eq!(
        mock.calls(),
        vec![
            MockCall::Login { username: "fred".to_owned() },
            MockCall::OpenCursor {
                entity_type: "customers".to_owned(),
                query: collection.query().clone(),
            },
            MockCall::Fetch,
            MockCall::NextPage,
        ]
    );
    mock.verify();
}

#[tokio::test]
async fn test_partial_outcome_keeps_pages_before_failure() {
    let mock = MockDataService::new();
    mock.expect_fetch().return_entities(customers(0..10));
    mock.expect_next_page().return_entities(customers(10..20));
    mock.expect_next_page().return_err(RemoteError::Other("connection reset".to_owned()));

    let sink = RecordingSink::new();
    let reporter = ErrorReporter::new(Arc::new(sink.clone()));
    let factory = ClientFactory::new(Arc::new(mock.clone()), reporter.clone());
    let repository = CollectionRepository::new(reporter);

    let client = factory.init_client("myOrg", "myApp").unwrap();
    let collection = repository.init_collection(&client, "customers", None, None).unwrap();
    let outcome = repository.get_all(&collection).await.unwrap();

    let mut expected = EntityList::new();
    expected.append_page(EntityPage { entities: customers(0..20), cursor: None });
    assert_eq!(
        outcome,
        FetchOutcome::Partial {
            entities: expected,
            error: RepositoryError::Remote(RemoteError::Other("connection reset".to_owned())),
        }
    );
    assert_eq!(sink.messages(), vec!["Remote error: connection reset"]);
    mock.verify();
}

#[tokio::test]
async fn test_failed_initialization_logs_once_and_never_fetches() {
    let mock = MockDataService::new();
    let sink = RecordingSink::new();
    let reporter = ErrorReporter::new(Arc::new(sink.clone()));
    let factory = ClientFactory::new(Arc::new(mock.clone()), reporter.clone());
    let repository = CollectionRepository::new(reporter);

    let client = factory.init_client("myOrg", "myApp").unwrap();
    assert!(repository.init_collection(&client, "", None, None).is_none());

    assert_eq!(sink.count(INITIALIZATION_FAILURE_MSG), 1);
    assert_eq!(sink.messages().len(), 1);
    assert!(mock.calls().is_empty());
}

/// A client whose descriptor lost its org name never reaches the service,
/// even when the credentials are fine.
#[tokio::test]
async fn test_login_with_invalid_client_never_reaches_service() {
    let mock = MockDataService::new();
    let sink = RecordingSink::new();
    let reporter = ErrorReporter::new(Arc::new(sink.clone()));
    let factory = ClientFactory::new(Arc::new(mock.clone()), reporter);

    let descriptor = ClientDescriptor::new(" ", "myApp", "https://api.usergrid.com", false);
    let client = DataClient::new(descriptor, Arc::new(mock.clone()));
    let result = factory.login(&client, "fred", "secret").await;

    assert_eq!(result, Err(ClientError::InvalidArgument("dataClient".to_owned())));
    assert!(!client.is_logged_in());
    assert_eq!(sink.messages(), vec![format!("{LOGIN_REJECTED_MSG}\n- dataClient")]);
    assert!(mock.calls().is_empty());
    mock.verify();
}
