use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};

use crate::context::RunContext;
use crate::directive::TestCase;
use crate::error::GuardError;
use crate::request::{TransactionEvent, TransactionRequest};

/// Receives the transaction lifecycle events of each test.
#[async_trait]
pub trait TransactionObserver: Send + Sync {
    async fn start_transaction_request(
        &self,
        ctx: &RunContext,
        test: &TestCase,
        request: &mut TransactionRequest,
    ) -> Result<(), GuardError>;

    async fn end_transaction_request(
        &self,
        ctx: &RunContext,
        test: &TestCase,
        request: &mut TransactionRequest,
    ) -> Result<(), GuardError>;

    fn transaction_started(&self, ctx: &mut RunContext, test: &TestCase);

    fn transaction_rolled_back(&self, ctx: &mut RunContext);
}

/// Opens and discards the transaction wrapped around a test.
#[async_trait]
pub trait TransactionControl: Send {
    async fn begin(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn rollback(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn is_open(&self) -> bool;
}

pub struct SeaOrmTransactionControl {
    db: Arc<DatabaseConnection>,
    open: Option<DatabaseTransaction>,
}

impl SeaOrmTransactionControl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db, open: None }
    }

    /// The transaction a test body should run its statements in.
    pub fn transaction(&self) -> Option<&DatabaseTransaction> {
        self.open.as_ref()
    }
}

#[async_trait]
impl TransactionControl for SeaOrmTransactionControl {
    async fn begin(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.open.is_some() {
            return Err("A test transaction is already open".into());
        }
        self.open = Some(self.db.begin().await?);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(txn) = self.open.take() {
            txn.rollback().await?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Drives the transaction around each test and notifies observers.
///
/// Rollback requests are honoured before start requests. Starting while a
/// transaction is open and rolling back while none is open are no-ops.
pub struct TransactionCoordinator<C: TransactionControl> {
    control: C,
    observers: Vec<Arc<dyn TransactionObserver>>,
    context: RunContext,
}

impl<C: TransactionControl> TransactionCoordinator<C> {
    pub fn new(control: C) -> Self {
        Self {
            control,
            observers: Vec::new(),
            context: RunContext::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TransactionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn register_observer(&mut self, observer: Arc<dyn TransactionObserver>) {
        self.observers.push(observer);
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    /// Call before the test body runs.
    pub async fn start_test(&mut self, test: &TestCase) -> Result<(), GuardError> {
        self.context.record_test_start();
        debug!(
            event = %TransactionEvent::StartTestTransactionRequest,
            test = %test.id(),
            "Dispatching transaction request"
        );

        let mut request = TransactionRequest::new();
        for observer in &self.observers {
            observer
                .start_transaction_request(&self.context, test, &mut request)
                .await?;
        }
        self.apply(request, test).await
    }

    /// Call after the test body ran, whatever its outcome.
    pub async fn end_test(&mut self, test: &TestCase) -> Result<(), GuardError> {
        debug!(
            event = %TransactionEvent::EndTestTransactionRequest,
            test = %test.id(),
            "Dispatching transaction request"
        );

        let mut request = TransactionRequest::new();
        for observer in &self.observers {
            observer
                .end_transaction_request(&self.context, test, &mut request)
                .await?;
        }
        self.apply(request, test).await
    }

    /// Discards any transaction still open once the run is over.
    pub async fn end_run(&mut self) -> Result<(), GuardError> {
        info!(tests = self.context.tests_started(), "Test run finished");
        self.rollback().await
    }

    async fn apply(&mut self, request: TransactionRequest, test: &TestCase) -> Result<(), GuardError> {
        if request.is_rollback_requested() {
            self.rollback().await?;
        }
        if request.is_start_requested() {
            self.begin(test).await?;
        }
        Ok(())
    }

    async fn begin(&mut self, test: &TestCase) -> Result<(), GuardError> {
        if self.control.is_open() {
            return Ok(());
        }
        self.control
            .begin()
            .await
            .map_err(|source| GuardError::Transaction { source })?;

        debug!(event = %TransactionEvent::StartTransaction, test = %test.id(), "Transaction opened");
        for observer in &self.observers {
            observer.transaction_started(&mut self.context, test);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), GuardError> {
        if !self.control.is_open() {
            return Ok(());
        }
        self.control
            .rollback()
            .await
            .map_err(|source| GuardError::Transaction { source })?;

        debug!(event = %TransactionEvent::RollbackTransaction, "Transaction rolled back");
        for observer in &self.observers {
            observer.transaction_rolled_back(&mut self.context);
        }
        Ok(())
    }
}
