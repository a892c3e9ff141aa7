mod mocks;

use std::sync::Arc;

use common::test_helpers::{default_store_rows, numbered_rows};
use isolation::{
    GuardError, IsolationGuard, TestCase, TransactionCoordinator, TransactionEvent,
};
use mocks::{
    InMemoryRowSource, MockRowSource, RecordingControl, RecordingObserver, isolated_test,
    non_isolated_test,
};

#[tokio::test]
async fn test_isolated_test_runs_inside_rolled_back_transaction() {
    let mut storage = MockRowSource::new();
    storage.expect_fetch_all().never();
    let guard = Arc::new(IsolationGuard::new(Arc::new(storage)));
    let mut coordinator = TransactionCoordinator::new(RecordingControl::new()).with_observer(guard);
    let test = isolated_test("testSave");

    coordinator.start_test(&test).await.unwrap();
    assert!(coordinator.context().is_isolation_active());
    assert_eq!(coordinator.control().calls(), vec!["begin"]);

    coordinator.end_test(&test).await.unwrap();
    assert!(!coordinator.context().is_isolation_active());
    assert_eq!(coordinator.control().calls(), vec!["begin", "rollback"]);
}

#[tokio::test]
async fn test_non_isolated_test_discards_leftover_transaction() {
    let storage = Arc::new(InMemoryRowSource::at_catalog_baseline());
    let guard = Arc::new(IsolationGuard::new(storage.clone()));
    let mut coordinator = TransactionCoordinator::new(RecordingControl::new()).with_observer(guard);

    // fixture setup opened a transaction and never closed it
    coordinator.start_test(&isolated_test("testFixture")).await.unwrap();

    let test = non_isolated_test("testReindex");
    coordinator.start_test(&test).await.unwrap();
    assert!(!coordinator.context().is_isolation_active());
    assert_eq!(coordinator.control().calls(), vec!["begin", "rollback"]);

    coordinator.end_test(&test).await.unwrap();
    assert_eq!(storage.reads().len(), 5);
    assert_eq!(coordinator.context().tests_started(), 2);
}

#[tokio::test]
async fn test_leaking_test_fails_and_next_test_still_isolates() {
    let storage = Arc::new(
        InMemoryRowSource::at_catalog_baseline()
            .with_rows("catalog_product_entity", numbered_rows("entity_id", 2)),
    );
    let guard = Arc::new(IsolationGuard::new(storage));
    let mut coordinator = TransactionCoordinator::new(RecordingControl::new()).with_observer(guard);

    let leaking = non_isolated_test("testImportProducts");
    coordinator.start_test(&leaking).await.unwrap();
    let err = coordinator.end_test(&leaking).await.unwrap_err();
    let violation = err.violation().expect("isolation error");
    assert_eq!(violation.len(), 1);
    assert_eq!(violation.surplus("catalog_product_entity").unwrap().len(), 2);

    let next = isolated_test("testSave");
    coordinator.start_test(&next).await.unwrap();
    assert!(coordinator.context().is_isolation_active());
    coordinator.end_test(&next).await.unwrap();
    assert!(!coordinator.context().is_isolation_active());
}

#[tokio::test]
async fn test_end_run_rolls_back_open_transaction() {
    let observer = Arc::new(RecordingObserver::default());
    let guard = Arc::new(IsolationGuard::new(Arc::new(MockRowSource::new())));
    let mut coordinator = TransactionCoordinator::new(RecordingControl::new())
        .with_observer(guard)
        .with_observer(observer.clone());

    coordinator.start_test(&isolated_test("testSave")).await.unwrap();
    coordinator.end_run().await.unwrap();
    coordinator.end_run().await.unwrap();

    assert!(!coordinator.context().is_isolation_active());
    assert_eq!(coordinator.control().calls(), vec!["begin", "rollback"]);
    assert_eq!(
        observer.events(),
        vec![
            TransactionEvent::StartTestTransactionRequest,
            TransactionEvent::StartTransaction,
            TransactionEvent::RollbackTransaction,
        ]
    );
}

#[tokio::test]
async fn test_begin_failure_leaves_isolation_inactive() {
    let guard = Arc::new(IsolationGuard::new(Arc::new(MockRowSource::new())));
    let mut coordinator = TransactionCoordinator::new(RecordingControl::failing_begin()).with_observer(guard);

    let err = coordinator.start_test(&isolated_test("testSave")).await.unwrap_err();

    assert!(matches!(err, GuardError::Transaction { .. }));
    assert!(err.to_string().contains("connection refused"));
    assert!(!coordinator.context().is_isolation_active());
}

#[tokio::test]
async fn test_configuration_error_stops_dispatch() {
    let observer = Arc::new(RecordingObserver::default());
    let guard = Arc::new(IsolationGuard::new(Arc::new(MockRowSource::new())));
    let mut coordinator = TransactionCoordinator::new(RecordingControl::new())
        .with_observer(guard)
        .with_observer(observer.clone());
    let test = TestCase::new("Catalog\\ProductRepositoryTest", "testSave")
        .with_class_isolation("maybe");

    let err = coordinator.start_test(&test).await.unwrap_err();

    assert!(err.is_configuration());
    assert!(observer.events().is_empty());
    assert!(coordinator.control().calls().is_empty());
}

#[tokio::test]
async fn test_registered_observer_sees_end_request() {
    let storage = Arc::new(InMemoryRowSource::at_catalog_baseline().with_rows("store", default_store_rows()));
    let observer = Arc::new(RecordingObserver::default());
    let mut coordinator = TransactionCoordinator::new(RecordingControl::new());
    coordinator.register_observer(Arc::new(IsolationGuard::new(storage)));
    coordinator.register_observer(observer.clone());

    let test = TestCase::new("Catalog\\ProductRepositoryTest", "testList");
    coordinator.start_test(&test).await.unwrap();
    coordinator.end_test(&test).await.unwrap();

    assert_eq!(
        observer.events(),
        vec![
            TransactionEvent::StartTestTransactionRequest,
            TransactionEvent::EndTestTransactionRequest,
        ]
    );
}
