//! Projecting a populated configuration back into nested maps.
//!
//! The projection uses the same derived key paths as binding, so a table
//! produced here can be written out as TOML and read back into the same
//! fields. Zero values are left out (booleans are always kept) and fields
//! marked secret are redacted. A section is kept even when every field in it
//! is zero, so it shows up as an empty table or group.
//!
//! [`marshal_as_log_group`] renders the same tree as a [`LogGroup`] for
//! structured logging:
//!
//! ```ignore
//! let group = fieldfig::marshal_as_log_group(&mut config, "config")?;
//! tracing::info!(%group, "configuration loaded");
//! // config.database.user=admin config.database.password=hu***21 config.port=8080
//! ```

use std::fmt;

use toml::{Table, Value};

use crate::binder::{self, Binding, Configure};
use crate::error::FieldfigError;
use crate::naming::NameDeriver;
use crate::types::ValueKind;

/// Which derived names to key the projection by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStyle {
    /// kebab-case, as read from TOML files.
    #[default]
    Toml,
    /// lowerCamelCase.
    Json,
    /// kebab-case, with YAML overrides.
    Yaml,
}

/// Project `config` into a nested table keyed by TOML names.
pub fn marshal_as_table<C: Configure>(config: &mut C) -> Result<Table, FieldfigError> {
    marshal_with(config, KeyStyle::Toml)
}

/// Project `config` keyed by the given naming style.
pub fn marshal_with<C: Configure>(config: &mut C, style: KeyStyle) -> Result<Table, FieldfigError> {
    marshal_with_names(config, style, &NameDeriver::default())
}

/// Like [`marshal_with`], deriving names with a custom [`NameDeriver`]
/// (e.g. one with extra initialisms).
pub fn marshal_with_names<C: Configure>(
    config: &mut C,
    style: KeyStyle,
    deriver: &NameDeriver,
) -> Result<Table, FieldfigError> {
    let bindings = binder::bind(config, deriver)?;
    marshal_bindings(&bindings, style)
}

pub(crate) fn marshal_bindings(
    bindings: &[Binding<'_>],
    style: KeyStyle,
) -> Result<Table, FieldfigError> {
    let mut table = Table::new();
    for binding in bindings {
        let descriptor = &binding.descriptor;
        let keys = match style {
            KeyStyle::Toml => &descriptor.toml,
            KeyStyle::Json => &descriptor.json,
            KeyStyle::Yaml => &descriptor.yaml,
        };
        let Some(keys) = keys else {
            continue;
        };
        if binding.is_zero() && descriptor.kind != ValueKind::Bool {
            section_for(&mut table, keys)?;
            continue;
        }
        let value = match binding.snapshot() {
            Value::String(s) if descriptor.secret => Value::String(redact_secret(&s)),
            value => value,
        };
        insert_nested(&mut table, keys, value)?;
    }
    Ok(table)
}

fn insert_nested(table: &mut Table, keys: &[String], value: Value) -> Result<(), FieldfigError> {
    let Some(leaf) = keys.last() else {
        return Ok(());
    };
    let section = section_for(table, keys)?;
    if section.get(leaf).is_some_and(Value::is_table) {
        return Err(FieldfigError::KeyConflict {
            key: keys.join("."),
        });
    }
    section.insert(leaf.clone(), value);
    Ok(())
}

/// The table holding the leaf of `keys`, creating sections on the way.
fn section_for<'t>(table: &'t mut Table, keys: &[String]) -> Result<&'t mut Table, FieldfigError> {
    let sections = keys.split_last().map_or(&[][..], |(_, sections)| sections);
    let mut current = table;
    for (depth, segment) in sections.iter().enumerate() {
        current = current
            .entry(segment.as_str())
            .or_insert_with(|| Value::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| FieldfigError::KeyConflict {
                key: keys[..=depth].join("."),
            })?;
    }
    Ok(current)
}

/// Redact a secret for display: short secrets become `***`, longer ones keep
/// their first and last two characters (`a-secret-key` → `a-***ey`).
pub fn redact_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < 5 {
        return "***".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}***{tail}")
}

/// A named group of attributes, nested the way the configuration is.
#[derive(Debug, Clone, PartialEq)]
pub struct LogGroup {
    pub name: String,
    pub attrs: Vec<LogAttr>,
}

/// One attribute of a [`LogGroup`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogAttr {
    Value { key: String, value: String },
    Group(LogGroup),
}

impl LogGroup {
    fn from_table(name: &str, table: &Table) -> Self {
        let attrs = table
            .iter()
            .map(|(key, value)| match value {
                Value::Table(nested) => LogAttr::Group(LogGroup::from_table(key, nested)),
                Value::String(s) => LogAttr::Value {
                    key: key.clone(),
                    value: s.clone(),
                },
                other => LogAttr::Value {
                    key: key.clone(),
                    value: other.to_string(),
                },
            })
            .collect();
        Self {
            name: name.to_string(),
            attrs,
        }
    }

    /// Every value as a `(dotted key, value)` pair, prefixed with the group
    /// name.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        self.collect(&self.name, &mut pairs);
        pairs
    }

    fn collect(&self, prefix: &str, pairs: &mut Vec<(String, String)>) {
        for attr in &self.attrs {
            match attr {
                LogAttr::Value { key, value } => {
                    pairs.push((join_key(prefix, key), value.clone()));
                }
                LogAttr::Group(group) => group.collect(&join_key(prefix, &group.name), pairs),
            }
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

impl fmt::Display for LogGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.flatten().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if value.is_empty() || value.contains([' ', '"', '=']) {
                write!(f, "{key}={value:?}")?;
            } else {
                write!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}

/// Project `config` into a [`LogGroup`] named `name`.
pub fn marshal_as_log_group<C: Configure>(
    config: &mut C,
    name: &str,
) -> Result<LogGroup, FieldfigError> {
    let table = marshal_as_table(config)?;
    Ok(LogGroup::from_table(name, &table))
}
