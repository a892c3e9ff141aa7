use std::error::Error;

use crate::violation::IsolationViolation;

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error(
        "Invalid \"@dbIsolation\" annotation on {test}, can be \"enabled\" or \"disabled\" only (got {value:?})"
    )]
    Configuration { test: String, value: Vec<String> },

    #[error("There was a problem with isolation: {0}")]
    Isolation(IsolationViolation),

    #[error("Failed to read table {table}: {source}")]
    Storage {
        table: String,
        source: Box<dyn Error + Send + Sync>,
    },

    #[error("Transaction control failed: {source}")]
    Transaction { source: Box<dyn Error + Send + Sync> },
}

impl GuardError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GuardError::Configuration { .. })
    }

    /// The leaked rows, when this is an isolation failure.
    pub fn violation(&self) -> Option<&IsolationViolation> {
        match self {
            GuardError::Isolation(violation) => Some(violation),
            _ => None,
        }
    }
}
