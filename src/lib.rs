//! Declarative, layered configuration for command-line programs. Describe a
//! struct once, and get flags, TOML files, environment variables and
//! defaults merged into it.
//!
//! ```ignore
//! let config: AppConfig = Fieldfig::builder()
//!     .program_name("greeter")
//!     .version("1.0.0")
//!     .default_load_config_flag()
//!     .load_and_validate()?;
//! ```
//!
//! That call builds a command line with one flag per field, reads any files
//! passed with `--load-config`, consults the environment, falls back to the
//! declared defaults, and runs the declared validation rules.
//!
//! # Declaring a schema
//!
//! A structure lists its fields by implementing [`Configure`]. Each field
//! carries [`Tags`]: name overrides, a default literal, help text,
//! validation rules and the `global` / `secret` markers.
//!
//! ```ignore
//! #[derive(Default)]
//! struct AppConfig {
//!     log_level: String,
//!     database: Database,
//! }
//!
//! impl Configure for AppConfig {
//!     fn configure<'a>(&'a mut self, fields: &mut Fields<'a>) {
//!         fields.field(
//!             "log_level",
//!             Tags::new().alias("-l").default("INFO").validate("oneof=DEBUG INFO WARN"),
//!             &mut self.log_level,
//!         );
//!         fields.nested("database", Tags::new(), &mut self.database);
//!     }
//! }
//! ```
//!
//! Fields are plain Rust values: strings, integers, floats, booleans and
//! [`std::time::Duration`] (`10s`, `1m5s`, `300ms`). Any type implementing
//! [`FieldValue`] works; anything else does not compile.
//!
//! # Names
//!
//! Every source gets its own name, derived from the declared path unless an
//! override says otherwise:
//!
//! | Field                 | Flag                | Env var          | TOML key        |
//! |-----------------------|---------------------|------------------|-----------------|
//! | `log_level`           | `--log-level`       | `LOG_LEVEL`      | `log-level`     |
//! | `database.user`       | `--database-user`   | `DATABASE_USER`  | `database.user` |
//! | `database.APIURL`     | `--database-api-url`| `DATABASE_API_URL` | `database.api-url` |
//!
//! An override of `-` disables that source. A `global` field drops its
//! ancestors from every name (`--user`, `USER`, `user`).
//!
//! # Layer precedence
//!
//! ```text
//! Zero value            when nothing else applies
//!        ↑ overridden by
//! Default               Tags::default("...")
//!        ↑ overridden by
//! Environment vars      DATABASE_USER
//!        ↑ overridden by
//! TOML files            first file listed wins, per key
//!        ↑ overridden by
//! Flags                 --database-user
//! ```
//!
//! An environment variable set to the empty string counts as unset.
//!
//! # Validation and marshaling
//!
//! Rules such as `required`, `gte=1`, `oneof=a b` or `contains=x` are
//! checked after loading; every violation is collected into one
//! [`FieldfigError::Validation`]. [`marshal_as_table`] projects a populated
//! structure back into a nested table with secrets redacted, and
//! [`marshal_as_log_group`] renders it for structured logs.
//!
//! # Error handling
//!
//! All fallible operations return [`FieldfigError`]. Schema mistakes (bad
//! defaults, unknown rules, duplicate flags) surface before anything is
//! parsed. Help and version requests come back as
//! [`FieldfigError::HelpRequested`], which
//! [`FieldfigBuilder::must_load_and_validate`] turns into a clean exit.

pub mod error;
pub mod naming;
pub mod source;
pub mod types;
pub mod value;

mod binder;
mod builder;
mod cli;
mod env;
mod file;
mod marshal;
mod resolve;
mod rules;
mod validate;

#[cfg(test)]
mod fixtures;

pub use binder::{Configure, FieldDescriptor, Fields, describe};
pub use builder::{DEFAULT_LOAD_CONFIG_FLAG, Fieldfig, FieldfigBuilder};
pub use env::EnvSource;
pub use error::FieldfigError;
pub use file::{load_toml_file, load_toml_files};
pub use marshal::{
    KeyStyle, LogAttr, LogGroup, marshal_as_log_group, marshal_as_table, marshal_with,
    marshal_with_names, redact_secret,
};
pub use naming::NameDeriver;
pub use types::{Tags, ValueKind};
pub use validate::{ValidationReport, Violation, validate};
pub use value::FieldValue;
