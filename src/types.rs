//! Field annotations and the closed set of supported field kinds.
//!
//! [`Tags`] carries the per-field overrides a schema declares next to each
//! field: names for every source, the default literal, help text and the
//! validation rule expression. Every setter takes the value verbatim; the
//! literal `-` on a name override disables that source for the field.
//!
//! ```ignore
//! fields.field(
//!     "log_level",
//!     Tags::new().flag("level").env("LOGGING_LEVEL").default("INFO"),
//!     &mut self.log_level,
//! );
//! ```

use std::fmt;

/// The sentinel that disables a source for a field.
pub const DISABLED: &str = "-";

/// Per-field annotations. All overrides are optional; absent names are
/// derived from the declared field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags {
    pub(crate) flag: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) toml: Option<String>,
    pub(crate) json: Option<String>,
    pub(crate) yaml: Option<String>,
    pub(crate) default: Option<String>,
    pub(crate) help: Option<String>,
    pub(crate) validate: Option<String>,
    pub(crate) global: bool,
    pub(crate) secret: bool,
}

impl Tags {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Tags that disable the flag, env and TOML sources. A leaf with these
    /// tags is not bound at all.
    pub fn skip() -> Self {
        Self::new().flag(DISABLED).env(DISABLED).toml(DISABLED)
    }

    /// Override the long flag name (`-` omits the field from the command line
    /// and from binding altogether).
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.flag = Some(name.into());
        self
    }

    /// Comma-separated aliases, each written with a leading dash:
    /// `"-v"` or `"-v,-verbose"`. Tokens without a dash are ignored.
    pub fn alias(mut self, aliases: impl Into<String>) -> Self {
        self.alias = Some(aliases.into());
        self
    }

    /// Override the environment variable name.
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env = Some(name.into());
        self
    }

    /// Override the TOML key segment.
    pub fn toml(mut self, name: impl Into<String>) -> Self {
        self.toml = Some(name.into());
        self
    }

    /// Override the JSON key segment (used by the marshaler).
    pub fn json(mut self, name: impl Into<String>) -> Self {
        self.json = Some(name.into());
        self
    }

    /// Override the YAML key segment (used by the marshaler).
    pub fn yaml(mut self, name: impl Into<String>) -> Self {
        self.yaml = Some(name.into());
        self
    }

    /// Default value literal, parsed into the field's type when binding.
    pub fn default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    /// Help text shown next to the flag.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Validation rule expression, e.g. `"required"` or `"gte=1,lte=65535"`.
    pub fn validate(mut self, rules: impl Into<String>) -> Self {
        self.validate = Some(rules.into());
        self
    }

    /// Ignore ancestor segments when deriving the flag and env names.
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// Redact the value when marshaling.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Parse the alias list. Only dash-prefixed tokens are kept.
    pub(crate) fn aliases(&self) -> Vec<String> {
        let Some(raw) = &self.alias else {
            return vec![];
        };
        raw.split(',')
            .map(str::trim)
            .filter(|token| token.starts_with('-'))
            .map(|token| token.trim_start_matches('-').to_string())
            .filter(|alias| !alias.is_empty())
            .collect()
    }
}

/// The kinds of leaf values a configuration field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    /// Signed integer of the given width in bits.
    Int(u8),
    /// Unsigned integer of the given width in bits.
    Uint(u8),
    Float,
    Bool,
    Duration,
}

impl ValueKind {
    /// Placeholder shown in usage output, e.g. `--port <INT>`.
    pub fn value_name(&self) -> &'static str {
        match self {
            ValueKind::String => "STRING",
            ValueKind::Int(_) => "INT",
            ValueKind::Uint(_) => "UINT",
            ValueKind::Float => "FLOAT",
            ValueKind::Bool => "BOOL",
            ValueKind::Duration => "DURATION",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Int(_) | ValueKind::Uint(_) | ValueKind::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Int(bits) => write!(f, "i{bits}"),
            ValueKind::Uint(bits) => write!(f, "u{bits}"),
            ValueKind::Float => write!(f, "float"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::Duration => write!(f, "duration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_keep_dash_prefixed_tokens() {
        let tags = Tags::new().alias("-v, verbose,-vv,--loud");
        assert_eq!(tags.aliases(), vec!["v", "vv", "loud"]);
    }

    #[test]
    fn aliases_empty_when_unset() {
        assert!(Tags::new().aliases().is_empty());
        assert!(Tags::new().alias("-").aliases().is_empty());
    }

    #[test]
    fn skip_disables_all_bound_sources() {
        let tags = Tags::skip();
        assert_eq!(tags.flag.as_deref(), Some(DISABLED));
        assert_eq!(tags.env.as_deref(), Some(DISABLED));
        assert_eq!(tags.toml.as_deref(), Some(DISABLED));
    }

    #[test]
    fn value_kind_names() {
        assert_eq!(ValueKind::Int(32).value_name(), "INT");
        assert_eq!(ValueKind::Duration.to_string(), "duration");
        assert!(ValueKind::Uint(8).is_numeric());
        assert!(!ValueKind::Bool.is_numeric());
    }
}
