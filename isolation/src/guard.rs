use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::baseline::TableBaseline;
use crate::context::RunContext;
use crate::coordinator::TransactionObserver;
use crate::directive::{IsolationDirective, TestCase, resolve_directive};
use crate::error::GuardError;
use crate::request::TransactionRequest;
use crate::storage::RowSource;
use crate::violation::IsolationViolation;

/// Keeps isolated tests inside a rolled-back transaction and checks that
/// non-isolated tests leave the sentinel tables at their baseline.
#[derive(Clone)]
pub struct IsolationGuard {
    baseline: TableBaseline,
    storage: Arc<dyn RowSource>,
}

impl IsolationGuard {
    /// Guard over the default catalog baseline.
    pub fn new(storage: Arc<dyn RowSource>) -> Self {
        Self::with_baseline(storage, TableBaseline::catalog_default())
    }

    pub fn with_baseline(storage: Arc<dyn RowSource>, baseline: TableBaseline) -> Self {
        Self { baseline, storage }
    }

    pub fn baseline(&self) -> &TableBaseline {
        &self.baseline
    }

    pub fn resolve_directive(&self, test: &TestCase) -> Result<IsolationDirective, GuardError> {
        resolve_directive(test)
    }

    pub fn on_transaction_start_request(
        &self,
        ctx: &RunContext,
        test: &TestCase,
        request: &mut TransactionRequest,
    ) -> Result<(), GuardError> {
        let directive = self.resolve_directive(test)?;

        if ctx.is_isolation_active() {
            // an explicitly non-isolated test must not run inside a leftover transaction
            if directive == IsolationDirective::Disabled {
                debug!(test = %test.id(), "Rolling back open transaction before non-isolated test");
                request.request_transaction_rollback();
            }
        } else if directive.is_enabled()
            || (directive == IsolationDirective::Unspecified
                && self.resolve_directive(test)?.is_enabled())
        {
            debug!(test = %test.id(), "Requesting transaction start");
            request.request_transaction_start();
        }

        Ok(())
    }

    pub async fn on_transaction_end_request(
        &self,
        ctx: &RunContext,
        test: &TestCase,
        request: &mut TransactionRequest,
    ) -> Result<(), GuardError> {
        if ctx.is_isolation_active() && self.resolve_directive(test)?.is_enabled() {
            debug!(test = %test.id(), "Requesting transaction rollback");
            request.request_transaction_rollback();
            return Ok(());
        }

        let violation = self.scan_baseline().await?;
        if !violation.is_empty() {
            error!(
                test = %test.id(),
                tables = ?violation.tables().collect::<Vec<_>>(),
                "Test leaked rows into sentinel tables"
            );
            return Err(GuardError::Isolation(violation));
        }

        Ok(())
    }

    pub fn on_transaction_started(&self, ctx: &mut RunContext, test: &TestCase) {
        debug!(test = %test.id(), "Isolation active");
        ctx.isolation_mut().activate();
    }

    pub fn on_transaction_rolled_back(&self, ctx: &mut RunContext) {
        ctx.isolation_mut().deactivate();
    }

    /// Reads every sentinel table and collects the surplus of all of them.
    ///
    /// Stops early only when storage itself fails.
    pub async fn scan_baseline(&self) -> Result<IsolationViolation, GuardError> {
        let mut violation = IsolationViolation::new();

        for (table, predicate) in self.baseline.iter() {
            let rows = self
                .storage
                .fetch_all(table)
                .await
                .map_err(|source| GuardError::Storage {
                    table: table.to_string(),
                    source,
                })?;

            let row_count = rows.len();
            debug!(table, row_count, %predicate, "Checked table baseline");
            if predicate.is_deficit(row_count) {
                warn!(table, row_count, %predicate, "Table holds fewer rows than its baseline");
            }

            violation.record(table, predicate.surplus(rows));
        }

        Ok(violation)
    }
}

#[async_trait]
impl TransactionObserver for IsolationGuard {
    async fn start_transaction_request(
        &self,
        ctx: &RunContext,
        test: &TestCase,
        request: &mut TransactionRequest,
    ) -> Result<(), GuardError> {
        self.on_transaction_start_request(ctx, test, request)
    }

    async fn end_transaction_request(
        &self,
        ctx: &RunContext,
        test: &TestCase,
        request: &mut TransactionRequest,
    ) -> Result<(), GuardError> {
        self.on_transaction_end_request(ctx, test, request).await
    }

    fn transaction_started(&self, ctx: &mut RunContext, test: &TestCase) {
        self.on_transaction_started(ctx, test);
    }

    fn transaction_rolled_back(&self, ctx: &mut RunContext) {
        self.on_transaction_rolled_back(ctx);
    }
}
