pub mod baseline;
pub mod context;
pub mod coordinator;
pub mod directive;
pub mod error;
pub mod guard;
pub mod request;
pub mod storage;
pub mod violation;

pub use baseline::{BaselinePredicate, Row, TableBaseline};
pub use context::{IsolationState, RunContext};
pub use coordinator::{
    SeaOrmTransactionControl, TransactionControl, TransactionCoordinator, TransactionObserver,
};
pub use directive::{DB_ISOLATION, IsolationDirective, TestCase, resolve_directive};
pub use error::GuardError;
pub use guard::IsolationGuard;
pub use request::{TransactionEvent, TransactionRequest};
pub use storage::{RowSource, SeaOrmRowSource};
pub use violation::IsolationViolation;

use common::config::Config;
use common::telemetry::init_tracing;
use sea_orm::{Database, DatabaseConnection};
use std::error::Error;
use std::sync::Arc;

/// Connects to the configured test database and wires the isolation guard
/// into a fresh coordinator.
pub async fn bootstrap(
    config: &Config,
) -> Result<TransactionCoordinator<SeaOrmTransactionControl>, Box<dyn Error + Send + Sync>> {
    init_tracing(&config.isolation.log_level);
    tracing::info!(project = %config.common.project_name, "Connecting isolation guard");
    let db = Database::connect(config.common.database_url.clone()).await?;
    Ok(bootstrap_with_connection(Arc::new(db)))
}

/// Same as [`bootstrap`] over an existing connection.
pub fn bootstrap_with_connection(
    db: Arc<DatabaseConnection>,
) -> TransactionCoordinator<SeaOrmTransactionControl> {
    let guard = IsolationGuard::new(Arc::new(SeaOrmRowSource::from_connection(Arc::clone(&db))));
    TransactionCoordinator::new(SeaOrmTransactionControl::new(db)).with_observer(Arc::new(guard))
}
