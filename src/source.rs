//! Value sources and per-field source chains.
//!
//! A [`ValueSource`] answers one question: is there a raw value for this
//! key? File-backed sources take dotted paths (`server.port`) and descend
//! through nested tables; the environment source takes a variable name.
//!
//! A [`SourceChain`] is the ordered list of `(source, key)` links consulted
//! for one field. The first link that finds a value wins.

use std::fmt;

use toml::{Table, Value};

use crate::error::FieldfigError;

/// Key → raw value lookup.
pub trait ValueSource {
    fn lookup(&self, key: &str) -> Option<Value>;
}

/// One parsed TOML document.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSource {
    name: String,
    table: Table,
}

impl MapSource {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    /// Parse TOML text. `name` is used in error messages (usually the path).
    pub fn from_toml_str(name: impl Into<String>, content: &str) -> Result<Self, FieldfigError> {
        let name = name.into();
        let table: Table = toml::from_str(content).map_err(|e| FieldfigError::ParseError {
            path: name.clone().into(),
            source: e,
        })?;
        Ok(Self::new(name, table))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl ValueSource for MapSource {
    fn lookup(&self, key: &str) -> Option<Value> {
        table_get(&self.table, key).cloned()
    }
}

/// Several map sources consulted in loading order. The first source that
/// has a key wins, however deep the key is nested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapsSource {
    maps: Vec<MapSource>,
}

impl MapsSource {
    pub fn new(maps: Vec<MapSource>) -> Self {
        Self { maps }
    }

    pub fn push(&mut self, map: MapSource) {
        self.maps.push(map);
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.iter().map(MapSource::name)
    }
}

impl ValueSource for MapsSource {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.maps.iter().find_map(|map| map.lookup(key))
    }
}

/// Navigate a `toml::Table` by dotted key path (e.g. `"database.url"`).
///
/// Returns `None` when a segment is missing or an intermediate value is not
/// a table.
pub fn table_get<'a>(table: &'a Table, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let tbl = match path {
        Some(path) => {
            let mut current = table;
            for segment in path.split('.') {
                current = current.get(segment)?.as_table()?;
            }
            current
        }
        None => table,
    };

    tbl.get(leaf)
}

/// Where a field's resolved value came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    CommandLine { flag: String },
    File { key: String },
    Env { var: String },
    Default,
    Zero,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::CommandLine { flag } => write!(f, "command line flag --{flag}"),
            Origin::File { key } => write!(f, "config file key '{key}'"),
            Origin::Env { var } => write!(f, "environment variable {var}"),
            Origin::Default => write!(f, "default value"),
            Origin::Zero => write!(f, "zero value"),
        }
    }
}

struct Link<'s> {
    origin: Origin,
    key: String,
    source: &'s dyn ValueSource,
}

/// Ordered lookups for one field.
#[derive(Default)]
pub struct SourceChain<'s> {
    links: Vec<Link<'s>>,
}

impl<'s> SourceChain<'s> {
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    pub fn file(mut self, key: &str, source: &'s dyn ValueSource) -> Self {
        self.links.push(Link {
            origin: Origin::File { key: key.into() },
            key: key.into(),
            source,
        });
        self
    }

    pub fn env(mut self, var: &str, source: &'s dyn ValueSource) -> Self {
        self.links.push(Link {
            origin: Origin::Env { var: var.into() },
            key: var.into(),
            source,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn origins(&self) -> impl Iterator<Item = &Origin> {
        self.links.iter().map(|link| &link.origin)
    }

    /// The first value found, with its origin.
    pub fn lookup(&self) -> Option<(Origin, Value)> {
        self.links.iter().find_map(|link| {
            link.source
                .lookup(&link.key)
                .map(|value| (link.origin.clone(), value))
        })
    }
}
