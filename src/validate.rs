//! Post-load validation: run every field's rules and collect all violations.
//!
//! Rules are evaluated field by field in declaration order. Within a field,
//! evaluation stops at the first failing rule. Every violation becomes one
//! line of the report:
//!
//! ```text
//! Missing required configuration: database.user
//! Configuration error: port - gte
//! ```

use std::fmt;

use tracing::debug;

use crate::binder::{self, Binding, Configure};
use crate::error::FieldfigError;
use crate::naming::NameDeriver;
use crate::rules::{self, Subject};

/// One failed rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Declared path joined with dots.
    pub path: String,
    /// Declared name of the field.
    pub field: String,
    /// The rule that failed, as written.
    pub rule: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rule == "required" {
            write!(f, "Missing required configuration: {}", self.path)
        } else {
            write!(f, "Configuration error: {} - {}", self.field, self.rule)
        }
    }
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Validate a populated structure against its declared rules.
pub fn validate<C: Configure>(config: &mut C) -> Result<(), FieldfigError> {
    let bindings = binder::bind(config, &NameDeriver::default())?;
    check_bindings(&bindings)
}

pub(crate) fn check_bindings(bindings: &[Binding<'_>]) -> Result<(), FieldfigError> {
    let mut report = ValidationReport::default();

    for binding in bindings.iter().filter(|b| !b.rules.is_empty()) {
        let descriptor = &binding.descriptor;
        let failed = match Subject::from_snapshot(descriptor.kind, &binding.snapshot()) {
            Some(subject) => rules::first_failure(&binding.rules, &subject, binding.is_zero()),
            None => binding.rules.first().map(|rule| rule.tag()),
        };
        if let Some(rule) = failed {
            report.violations.push(Violation {
                path: descriptor.dotted_path(),
                field: descriptor.name().to_string(),
                rule: rule.to_string(),
            });
        }
    }

    if report.is_empty() {
        return Ok(());
    }
    debug!(violations = report.violations.len(), "configuration failed validation");
    Err(FieldfigError::Validation(report))
}
