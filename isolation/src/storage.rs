use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Asterisk, Query};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, JsonValue};
use std::error::Error;
use std::sync::Arc;
use tracing::debug;

use crate::baseline::Row;

/// Read access to the shared test database.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// All rows of `table`, in storage order.
    async fn fetch_all(&self, table: &str) -> Result<Vec<Row>, Box<dyn Error + Send + Sync>>;
}

#[derive(Clone)]
pub struct SeaOrmRowSource {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRowSource {
    pub fn from_connection(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RowSource for SeaOrmRowSource {
    async fn fetch_all(&self, table: &str) -> Result<Vec<Row>, Box<dyn Error + Send + Sync>> {
        let select = Query::select()
            .column(Asterisk)
            .from(Alias::new(table))
            .to_owned();
        let statement = self.db.get_database_backend().build(&select);
        debug!(sql = %statement, "Pulling table state");

        let values = JsonValue::find_by_statement(statement).all(self.db.as_ref()).await?;
        values
            .into_iter()
            .map(|value| match value {
                JsonValue::Object(row) => Ok(row),
                other => Err(format!("Unexpected row shape from {}: {}", table, other).into()),
            })
            .collect()
    }
}
