//! Core resolution pipeline: populate a structure from every source.
//!
//! Operates on explicit inputs (`ResolveInput`): the argument vector, the
//! environment pairs and any TOML sources loaded ahead of time. The only
//! I/O is reading the files named by the load-config flag. Steps:
//!
//! 1. Walk the structure into bindings
//! 2. Reject duplicate flag names
//! 3. Build the command and parse the arguments
//! 4. Load the files named on the command line (they precede preloaded
//!    sources)
//! 5. Resolve every field: flag, then TOML, then environment, then default,
//!    then the type's zero value
//! 6. Optionally run validation

use std::ffi::OsString;

use toml::Value;
use tracing::debug;

use crate::binder::{self, Binding, Configure};
use crate::cli::{self, ProgramInfo};
use crate::env::EnvSource;
use crate::error::FieldfigError;
use crate::file;
use crate::naming::NameDeriver;
use crate::source::{MapSource, MapsSource, Origin, SourceChain};
use crate::validate;

/// All inputs needed to populate a structure.
pub struct ResolveInput {
    pub(crate) program: ProgramInfo,
    /// Full argument vector, program name first.
    pub args: Vec<OsString>,
    /// Environment pairs (pass `std::env::vars()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Whether environment variables are consulted at all.
    pub env_enabled: bool,
    /// TOML sources loaded ahead of time, lowest precedence among files.
    pub toml_sources: Vec<MapSource>,
    pub deriver: NameDeriver,
    /// Run validation after every field is populated.
    pub validate: bool,
}

/// Populate `config` from the inputs.
pub fn resolve<C: Configure>(config: &mut C, input: ResolveInput) -> Result<(), FieldfigError> {
    let mut bindings = binder::bind(config, &input.deriver)?;
    cli::check_duplicates(&input.program, bindings.iter().map(|b| &b.descriptor))?;

    let cmd = cli::build_command(&input.program, &bindings);
    let matches = cli::parse(cmd, &input.args)?;

    let mut files = file::load_toml_files(&cli::config_files(&matches, &input.program))?;
    for source in input.toml_sources {
        files.push(source);
    }
    let env = if input.env_enabled {
        EnvSource::from_vars(input.env_vars)
    } else {
        EnvSource::default()
    };

    for binding in bindings.iter_mut() {
        let flag = cli::flag_value(&matches, &binding.descriptor.flag);
        apply(binding, flag, &files, &env)?;
    }

    if input.validate {
        validate::check_bindings(&bindings)?;
    }
    Ok(())
}

/// Resolve one field through its source chain and write it.
fn apply(
    binding: &mut Binding<'_>,
    flag: Option<String>,
    files: &MapsSource,
    env: &EnvSource,
) -> Result<(), FieldfigError> {
    let descriptor = &binding.descriptor;

    let found = match flag {
        Some(text) => Some((
            Origin::CommandLine {
                flag: descriptor.flag.clone(),
            },
            Value::String(text),
        )),
        None => {
            let mut chain = SourceChain::new();
            if let Some(key) = descriptor.toml_key() {
                chain = chain.file(&key, files);
            }
            if let Some(var) = &descriptor.env {
                chain = chain.env(var, env);
            }
            chain.lookup()
        }
    };

    let origin = match &found {
        Some((origin, _)) => origin.clone(),
        None if binding.has_default() => Origin::Default,
        None => Origin::Zero,
    };
    debug!(flag = %descriptor.flag, %origin, "resolved configuration field");

    let raw = found.map(|(_, value)| value);
    binding.assign(raw.as_ref()).map_err(|reason| FieldfigError::InvalidValue {
        flag: binding.descriptor.flag.clone(),
        origin,
        value: match &raw {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        },
        reason,
    })
}
