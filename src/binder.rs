//! Walking a declared schema into per-field bindings.
//!
//! A configuration structure describes itself by implementing [`Configure`].
//! The walk visits every field in declaration order, depth-first, and turns
//! each leaf into a `Binding`: its [`FieldDescriptor`] (every derived name,
//! default, help, rules) plus a typed slot that writes into the caller's
//! structure.
//!
//! ```ignore
//! struct Database {
//!     user: String,
//!     password: String,
//! }
//!
//! impl Configure for Database {
//!     fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
//!         fields.field("user", Tags::new().default("admin"), &mut self.user);
//!         fields.field("password", Tags::new().secret(), &mut self.password);
//!     }
//! }
//! ```
//!
//! Composite names follow the nesting: `database.user` gets the flag
//! `--database-user`, the variable `DATABASE_USER` and the TOML key
//! `database.user`. A `global` leaf drops its ancestors from every name: it
//! is `--name`, `NAME` and `name` wherever it sits. A container with a disabled (`-`) name for some source is
//! still walked; it just contributes no segment to that source's names.

use toml::Value;

use crate::error::FieldfigError;
use crate::naming::{NameDeriver, SegmentNames};
use crate::rules::{self, Rule};
use crate::types::{Tags, ValueKind};
use crate::value::FieldValue;

/// A structure that declares its configurable fields.
pub trait Configure {
    fn configure<'a>(&'a mut self, fields: &mut Fields<'a>);
}

/// Everything known about one leaf field, computed once per walk.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared names from the root down to this field.
    pub path: Vec<String>,
    /// Full long flag name, without dashes.
    pub flag: String,
    /// Flag aliases, without dashes. Single characters become short flags.
    pub aliases: Vec<String>,
    /// Full environment variable name, `None` when disabled.
    pub env: Option<String>,
    /// TOML key segments, `None` when disabled.
    pub toml: Option<Vec<String>>,
    pub json: Option<Vec<String>>,
    pub yaml: Option<Vec<String>>,
    pub default: Option<String>,
    pub help: Option<String>,
    pub secret: bool,
    pub global: bool,
    pub validate: Option<String>,
    pub kind: ValueKind,
}

impl FieldDescriptor {
    /// The declared name of the leaf itself.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Declared path joined with dots, e.g. `database.user`.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// Dotted TOML key used for file lookups.
    pub fn toml_key(&self) -> Option<String> {
        self.toml.as_ref().map(|segments| segments.join("."))
    }
}

/// Type-erased access to one field of the caller's structure.
pub(crate) trait AnySlot {
    /// Write a raw value, or the default (zero value when there is none).
    fn assign(&mut self, raw: Option<&Value>) -> Result<(), String>;
    /// Current value rendered as a raw value.
    fn snapshot(&self) -> Value;
    fn is_zero(&self) -> bool;
    fn has_default(&self) -> bool;
}

struct TypedSlot<'a, T> {
    target: &'a mut T,
    default: Option<T>,
}

impl<T: FieldValue> AnySlot for TypedSlot<'_, T> {
    fn assign(&mut self, raw: Option<&Value>) -> Result<(), String> {
        *self.target = match raw {
            Some(raw) => T::from_raw(raw)?,
            None => self.default.clone().unwrap_or_default(),
        };
        Ok(())
    }

    fn snapshot(&self) -> Value {
        self.target.to_raw()
    }

    fn is_zero(&self) -> bool {
        self.target.is_zero()
    }

    fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

fn check_text<T: FieldValue>(text: &str) -> Result<(), String> {
    T::from_text(text).map(|_| ())
}

/// One bound leaf: descriptor, parsed rules and the typed slot.
pub(crate) struct Binding<'a> {
    pub(crate) descriptor: FieldDescriptor,
    pub(crate) rules: Vec<Rule>,
    /// Type check for textual values, used as the flag's value parser.
    pub(crate) check: fn(&str) -> Result<(), String>,
    slot: Box<dyn AnySlot + 'a>,
}

impl Binding<'_> {
    pub(crate) fn assign(&mut self, raw: Option<&Value>) -> Result<(), String> {
        self.slot.assign(raw)
    }

    pub(crate) fn snapshot(&self) -> Value {
        self.slot.snapshot()
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.slot.is_zero()
    }

    pub(crate) fn has_default(&self) -> bool {
        self.slot.has_default()
    }
}

struct Segment {
    name: String,
    names: SegmentNames,
}

/// Visitor handed to [`Configure::configure`].
///
/// Construction errors (a malformed default, an unknown validation rule) are
/// recorded and stop the walk; the first one is reported once the walk is
/// over.
pub struct Fields<'a> {
    deriver: NameDeriver,
    parents: Vec<Segment>,
    bindings: Vec<Binding<'a>>,
    error: Option<FieldfigError>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(deriver: NameDeriver) -> Self {
        Self {
            deriver,
            parents: Vec::new(),
            bindings: Vec::new(),
            error: None,
        }
    }

    /// Declare a leaf field.
    pub fn field<T: FieldValue>(&mut self, name: &str, tags: Tags, target: &'a mut T) {
        if self.error.is_some() {
            return;
        }
        let names = self.deriver.derive(name, &tags);
        let Some(flag_leaf) = names.flag.clone() else {
            return;
        };

        let mut path: Vec<String> = self.parents.iter().map(|p| p.name.clone()).collect();
        path.push(name.to_string());
        let dotted = path.join(".");

        let flag = if tags.global {
            flag_leaf
        } else {
            self.joined(|n| n.flag.as_deref(), &flag_leaf, "-")
        };
        let env = names.env.as_deref().map(|leaf| {
            if tags.global {
                leaf.to_string()
            } else {
                self.joined(|n| n.env.as_deref(), leaf, "_")
            }
        });

        let default = match tags.default.as_deref() {
            Some(literal) => match T::from_text(literal) {
                Ok(value) => Some(value),
                Err(reason) => {
                    self.error = Some(FieldfigError::InvalidDefault {
                        field: dotted,
                        value: literal.to_string(),
                        reason,
                    });
                    return;
                }
            },
            None => None,
        };

        let rules = match rules::parse(&dotted, tags.validate.as_deref(), T::KIND) {
            Ok(rules) => rules,
            Err(e) => {
                self.error = Some(e);
                return;
            }
        };

        let global = tags.global;
        let descriptor = FieldDescriptor {
            toml: names.toml.map(|leaf| self.segments(global, |n| n.toml.as_deref(), leaf)),
            json: names.json.map(|leaf| self.segments(global, |n| n.json.as_deref(), leaf)),
            yaml: names.yaml.map(|leaf| self.segments(global, |n| n.yaml.as_deref(), leaf)),
            path,
            flag,
            aliases: tags.aliases(),
            env,
            default: tags.default,
            help: tags.help,
            secret: tags.secret,
            global: tags.global,
            validate: tags.validate,
            kind: T::KIND,
        };

        self.bindings.push(Binding {
            descriptor,
            rules,
            check: check_text::<T>,
            slot: Box::new(TypedSlot { target, default }),
        });
    }

    /// Declare a nested structure.
    pub fn nested<C: Configure>(&mut self, name: &str, tags: Tags, target: &'a mut C) {
        if self.error.is_some() {
            return;
        }
        let names = self.deriver.derive(name, &tags);
        self.parents.push(Segment {
            name: name.to_string(),
            names,
        });
        target.configure(self);
        self.parents.pop();
    }

    /// Declare an optional nested structure. An absent one is allocated with
    /// `Default` so its fields can be populated.
    pub fn optional<C: Configure + Default>(
        &mut self,
        name: &str,
        tags: Tags,
        target: &'a mut Option<C>,
    ) {
        if self.error.is_some() {
            return;
        }
        let inner = target.get_or_insert_with(C::default);
        self.nested(name, tags, inner);
    }

    fn joined(&self, pick: impl Fn(&SegmentNames) -> Option<&str>, leaf: &str, sep: &str) -> String {
        let mut parts: Vec<&str> = self.parents.iter().filter_map(|p| pick(&p.names)).collect();
        parts.push(leaf);
        parts.join(sep)
    }

    fn segments(
        &self,
        global: bool,
        pick: impl Fn(&SegmentNames) -> Option<&str>,
        leaf: String,
    ) -> Vec<String> {
        if global {
            return vec![leaf];
        }
        let mut segments: Vec<String> = self
            .parents
            .iter()
            .filter_map(|p| pick(&p.names).map(str::to_string))
            .collect();
        segments.push(leaf);
        segments
    }

    fn finish(self) -> Result<Vec<Binding<'a>>, FieldfigError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.bindings),
        }
    }
}

/// Walk `config` and bind every leaf field.
pub(crate) fn bind<'a, C: Configure>(
    config: &'a mut C,
    deriver: &NameDeriver,
) -> Result<Vec<Binding<'a>>, FieldfigError> {
    let mut fields = Fields::new(deriver.clone());
    config.configure(&mut fields);
    fields.finish()
}

/// Descriptors of every bound field, in declaration order.
pub fn describe<C: Configure>(
    config: &mut C,
    deriver: &NameDeriver,
) -> Result<Vec<FieldDescriptor>, FieldfigError> {
    Ok(bind(config, deriver)?
        .into_iter()
        .map(|binding| binding.descriptor)
        .collect())
}
