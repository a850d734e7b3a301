//! # Mock Data Service
//!
//! Utilities for testing the factory and repository in isolation.
//!
//! Queue the calls you expect with [`MockDataService::expect_login`],
//! [`MockDataService::expect_fetch`] and [`MockDataService::expect_next_page`],
//! then hand the mock to the code under test. Expectations are consumed in
//! order; a call that does not match the next expectation panics.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::model::{AuthToken, DataClient, QuerySpec};
use crate::sdk::{DataService, PageCursor, RemoteError};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    Login {
        response: Result<AuthToken, RemoteError>,
    },
    Fetch {
        response: Result<Value, RemoteError>,
    },
    NextPage {
        response: Result<Value, RemoteError>,
    },
}

/// A call the mock received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Login { username: String },
    OpenCursor { entity_type: String, query: QuerySpec },
    Fetch,
    NextPage,
}

type Shared<T> = Arc<Mutex<T>>;

/// A mock data service with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = MockDataService::new();
/// mock.expect_fetch().return_entities(vec![json!({"name": "a"})]);
/// mock.expect_next_page().return_entities(vec![json!({"name": "b"})]);
///
/// let service: Arc<dyn DataService> = Arc::new(mock.clone());
/// // Use service in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
#[derive(Clone, Default)]
pub struct MockDataService {
    expectations: Shared<VecDeque<Expectation>>,
    calls: Shared<Vec<MockCall>>,
}

impl MockDataService {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `login` call.
    pub fn expect_login(&self) -> LoginExpectationBuilder {
        LoginExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects the first-page `fetch` of a cursor.
    pub fn expect_fetch(&self) -> PageExpectationBuilder {
        PageExpectationBuilder {
            next_page: false,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `next_page` call. Queuing one also makes `has_next_page` report true.
    pub fn expect_next_page(&self) -> PageExpectationBuilder {
        PageExpectationBuilder {
            next_page: true,
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `fetch` and `next_page` calls received.
    pub fn fetch_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, MockCall::Fetch | MockCall::NextPage))
            .count()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for `login` expectations.
pub struct LoginExpectationBuilder {
    expectations: Shared<VecDeque<Expectation>>,
}

impl LoginExpectationBuilder {
    pub fn return_ok(self, token: AuthToken) {
        self.push(Ok(token));
    }

    pub fn return_err(self, error: RemoteError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<AuthToken, RemoteError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Login { response });
    }
}

/// Builder for `fetch` and `next_page` expectations.
pub struct PageExpectationBuilder {
    next_page: bool,
    expectations: Shared<VecDeque<Expectation>>,
}

impl PageExpectationBuilder {
    /// Returns `payload` verbatim, whatever its shape.
    pub fn return_page(self, payload: Value) {
        self.push(Ok(payload));
    }

    /// Returns a well-formed page holding `entities`.
    pub fn return_entities(self, entities: Vec<Value>) {
        self.push(Ok(json!({ "entities": entities })));
    }

    pub fn return_err(self, error: RemoteError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Value, RemoteError>) {
        let expectation = if self.next_page {
            Expectation::NextPage { response }
        } else {
            Expectation::Fetch { response }
        };
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// SERVICE IMPLEMENTATION
// =============================================================================

#[async_trait]
impl DataService for MockDataService {
    async fn login(
        &self,
        _client: &DataClient,
        username: &str,
        _password: &str,
    ) -> Result<AuthToken, RemoteError> {
        self.calls.lock().unwrap().push(MockCall::Login {
            username: username.to_owned(),
        });
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(Expectation::Login { response }) => response,
            _ => panic!("Unexpected request or expectation mismatch"),
        }
    }

    fn open_cursor(
        &self,
        _client: &DataClient,
        entity_type: &str,
        query: &QuerySpec,
    ) -> Box<dyn PageCursor> {
        self.calls.lock().unwrap().push(MockCall::OpenCursor {
            entity_type: entity_type.to_owned(),
            query: query.clone(),
        });
        Box::new(MockCursor {
            expectations: self.expectations.clone(),
            calls: self.calls.clone(),
        })
    }
}

struct MockCursor {
    expectations: Shared<VecDeque<Expectation>>,
    calls: Shared<Vec<MockCall>>,
}

#[async_trait]
impl PageCursor for MockCursor {
    async fn fetch(&mut self) -> Result<Value, RemoteError> {
        self.calls.lock().unwrap().push(MockCall::Fetch);
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(Expectation::Fetch { response }) => response,
            _ => panic!("Unexpected request or expectation mismatch"),
        }
    }

    fn has_next_page(&self) -> bool {
        matches!(
            self.expectations.lock().unwrap().front(),
            Some(Expectation::NextPage { .. })
        )
    }

    async fn next_page(&mut self) -> Result<Value, RemoteError> {
        self.calls.lock().unwrap().push(MockCall::NextPage);
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(Expectation::NextPage { response }) => response,
            _ => panic!("Unexpected request or expectation mismatch"),
        }
    }
}
