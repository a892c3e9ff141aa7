use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::baseline::Row;

/// Surplus rows found per sentinel table after a test.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IsolationViolation {
    tables: BTreeMap<String, Vec<Row>>,
}

impl IsolationViolation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the surplus of `table`; an empty surplus is ignored.
    pub fn record(&mut self, table: &str, surplus: Vec<Row>) {
        if surplus.is_empty() {
            return;
        }
        self.tables.insert(table.to_string(), surplus);
    }

    pub fn surplus(&self, table: &str) -> Option<&[Row]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl fmt::Display for IsolationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let serialized = serde_json::to_string_pretty(&self.tables).map_err(|_| fmt::Error)?;
        f.write_str(&serialized)
    }
}
