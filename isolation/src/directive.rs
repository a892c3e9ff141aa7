use std::collections::BTreeMap;

use strum_macros::Display;
use tracing::debug;

use crate::error::GuardError;

/// Key under which a test declares its isolation mode.
pub const DB_ISOLATION: &str = "dbIsolation";

const ENABLED: &str = "enabled";
const DISABLED: &str = "disabled";

/// Directive name -> raw values, as attached to a test class or method.
pub type Annotations = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IsolationDirective {
    #[strum(to_string = "enabled")]
    Enabled,
    #[strum(to_string = "disabled")]
    Disabled,
    #[strum(to_string = "unspecified")]
    Unspecified,
}

impl IsolationDirective {
    pub fn is_enabled(self) -> bool {
        self == IsolationDirective::Enabled
    }
}

/// A registered test together with its class- and method-level configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCase {
    pub class_name: String,
    pub method_name: String,
    pub class_annotations: Annotations,
    pub method_annotations: Annotations,
}

impl TestCase {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            ..Default::default()
        }
    }

    pub fn with_class_annotation(mut self, name: &str, values: &[&str]) -> Self {
        self.class_annotations.insert(name.to_string(), to_owned_values(values));
        self
    }

    pub fn with_method_annotation(mut self, name: &str, values: &[&str]) -> Self {
        self.method_annotations.insert(name.to_string(), to_owned_values(values));
        self
    }

    /// Shorthand for a class-level `dbIsolation` value.
    pub fn with_class_isolation(self, value: &str) -> Self {
        self.with_class_annotation(DB_ISOLATION, &[value])
    }

    /// Shorthand for a method-level `dbIsolation` value.
    pub fn with_method_isolation(self, value: &str) -> Self {
        self.with_method_annotation(DB_ISOLATION, &[value])
    }

    pub fn id(&self) -> String {
        format!("{}::{}", self.class_name, self.method_name)
    }

    /// Class annotations with method annotations replacing them key by key.
    pub fn annotations(&self) -> Annotations {
        let mut merged = self.class_annotations.clone();
        merged.extend(
            self.method_annotations
                .iter()
                .map(|(name, values)| (name.clone(), values.clone())),
        );
        merged
    }
}

fn to_owned_values(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Resolves the effective isolation directive of `test`.
///
/// The method-level value wins over the class-level one. Anything other than
/// exactly `["enabled"]` or `["disabled"]` is a configuration error.
pub fn resolve_directive(test: &TestCase) -> Result<IsolationDirective, GuardError> {
    let annotations = test.annotations();
    let directive = match annotations.get(DB_ISOLATION) {
        None => IsolationDirective::Unspecified,
        Some(values) => match values.as_slice() {
            [value] if value == ENABLED => IsolationDirective::Enabled,
            [value] if value == DISABLED => IsolationDirective::Disabled,
            _ => {
                return Err(GuardError::Configuration {
                    test: test.id(),
                    value: values.clone(),
                });
            }
        },
    };

    debug!(test = %test.id(), %directive, "Resolved isolation directive");
    Ok(directive)
}
