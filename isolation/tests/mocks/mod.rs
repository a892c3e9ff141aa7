#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use common::test_helpers::{default_store_rows, numbered_rows};
use isolation::{
    GuardError, Row, RowSource, RunContext, TestCase, TransactionControl, TransactionEvent,
    TransactionObserver, TransactionRequest,
};

mock! {
    pub RowSource {}

    #[async_trait]
    impl RowSource for RowSource {
        async fn fetch_all(&self, table: &str) -> Result<Vec<Row>, Box<dyn Error + Send + Sync>>;
    }
}

/// Table contents held in memory, with a log of the tables read.
#[derive(Default)]
pub struct InMemoryRowSource {
    tables: HashMap<String, Vec<Row>>,
    reads: Mutex<Vec<String>>,
}

impl InMemoryRowSource {
    /// Every sentinel table exactly at its default baseline.
    pub fn at_catalog_baseline() -> Self {
        Self::default()
            .with_rows("catalog_product_entity", Vec::new())
            .with_rows("eav_attribute", numbered_rows("attribute_id", 178))
            .with_rows("catalog_category_entity", numbered_rows("entity_id", 2))
            .with_rows("eav_attribute_set", numbered_rows("attribute_set_id", 9))
            .with_rows("store", default_store_rows())
    }

    pub fn with_rows(mut self, table: &str, rows: Vec<Row>) -> Self {
        self.tables.insert(table.to_string(), rows);
        self
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowSource for InMemoryRowSource {
    async fn fetch_all(&self, table: &str) -> Result<Vec<Row>, Box<dyn Error + Send + Sync>> {
        self.reads.lock().unwrap().push(table.to_string());
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| format!("relation \"{}\" does not exist", table).into())
    }
}

/// Transaction control that only records what it was asked to do.
#[derive(Default)]
pub struct RecordingControl {
    open: bool,
    fail_begin: bool,
    pub log: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_begin() -> Self {
        Self {
            fail_begin: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionControl for RecordingControl {
    async fn begin(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.fail_begin {
            return Err("connection refused".into());
        }
        self.open = true;
        self.log.lock().unwrap().push("begin");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.open = false;
        self.log.lock().unwrap().push("rollback");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Observer that records the events it receives and never requests anything.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<TransactionEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<TransactionEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionObserver for RecordingObserver {
    async fn start_transaction_request(
        &self,
        _ctx: &RunContext,
        _test: &TestCase,
        _request: &mut TransactionRequest,
    ) -> Result<(), GuardError> {
        self.events
            .lock()
            .unwrap()
            .push(TransactionEvent::StartTestTransactionRequest);
        Ok(())
    }

    async fn end_transaction_request(
        &self,
        _ctx: &RunContext,
        _test: &TestCase,
        _request: &mut TransactionRequest,
    ) -> Result<(), GuardError> {
        self.events
            .lock()
            .unwrap()
            .push(TransactionEvent::EndTestTransactionRequest);
        Ok(())
    }

    fn transaction_started(&self, _ctx: &mut RunContext, _test: &TestCase) {
        self.events
            .lock()
            .unwrap()
            .push(TransactionEvent::StartTransaction);
    }

    fn transaction_rolled_back(&self, _ctx: &mut RunContext) {
        self.events
            .lock()
            .unwrap()
            .push(TransactionEvent::RollbackTransaction);
    }
}

pub fn isolated_test(method: &str) -> TestCase {
    TestCase::new("Catalog\\ProductRepositoryTest", method).with_method_isolation("enabled")
}

pub fn non_isolated_test(method: &str) -> TestCase {
    TestCase::new("Catalog\\ProductRepositoryTest", method).with_method_isolation("disabled")
}
