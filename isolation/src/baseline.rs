use std::fmt;

use serde_json::{Map, Value};

/// One storage row: column name -> value.
pub type Row = Map<String, Value>;

/// Expected population of a sentinel table when no test leaked data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselinePredicate {
    /// The table must hold no rows at all.
    Empty,
    /// The table ships with exactly `n` rows; anything after them is surplus.
    ExactCount(usize),
    /// The table ships with up to `n` default rows.
    AtMostDefault(usize),
}

impl BaselinePredicate {
    /// Number of leading rows the baseline accepts.
    pub fn allowed_rows(&self) -> usize {
        match self {
            BaselinePredicate::Empty => 0,
            BaselinePredicate::ExactCount(n) => *n,
            BaselinePredicate::AtMostDefault(n) => *n,
        }
    }

    /// Rows beyond what the baseline permits, in fetch order.
    pub fn surplus(&self, rows: Vec<Row>) -> Vec<Row> {
        let allowed = self.allowed_rows();
        if rows.len() <= allowed {
            return Vec::new();
        }
        rows.into_iter().skip(allowed).collect()
    }

    /// True when an exact baseline has fewer rows than it should.
    pub fn is_deficit(&self, row_count: usize) -> bool {
        matches!(self, BaselinePredicate::ExactCount(n) if row_count < *n)
    }
}

impl fmt::Display for BaselinePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaselinePredicate::Empty => write!(f, "empty"),
            BaselinePredicate::ExactCount(n) => write!(f, "exactly {} rows", n),
            BaselinePredicate::AtMostDefault(n) => write!(f, "at most {} default rows", n),
        }
    }
}

/// Sentinel tables scanned after non-isolated tests, in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableBaseline {
    tables: Vec<(String, BaselinePredicate)>,
}

impl TableBaseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline of a freshly installed catalog database.
    pub fn catalog_default() -> Self {
        Self::new()
            .with_table("catalog_product_entity", BaselinePredicate::Empty)
            // 178 attributes ship with a default install
            .with_table("eav_attribute", BaselinePredicate::AtMostDefault(178))
            // root category and default category
            .with_table("catalog_category_entity", BaselinePredicate::ExactCount(2))
            .with_table("eav_attribute_set", BaselinePredicate::AtMostDefault(9))
            // admin store and default store view
            .with_table("store", BaselinePredicate::ExactCount(2))
    }

    /// Adds `table`, or replaces its predicate while keeping its position.
    pub fn with_table(mut self, table: &str, predicate: BaselinePredicate) -> Self {
        match self.tables.iter_mut().find(|(name, _)| name == table) {
            Some(entry) => entry.1 = predicate,
            None => self.tables.push((table.to_string(), predicate)),
        }
        self
    }

    pub fn predicate(&self, table: &str) -> Option<BaselinePredicate> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, predicate)| *predicate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, BaselinePredicate)> {
        self.tables
            .iter()
            .map(|(name, predicate)| (name.as_str(), *predicate))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
