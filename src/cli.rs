//! Command-line front end.
//!
//! The command is built at runtime from the bound fields: one long flag per
//! leaf, plus aliases, `-h/--help`, `-V/--version` when a version is
//! configured and the optional load-config flag. Flags carry no clap
//! defaults; a field counts as set on the command line only when the user
//! actually passed it, so lower-precedence sources stay visible.
//!
//! Flag names share one namespace. Before anything is parsed, every name
//! (long flags, aliases, the built-in flags) is checked for duplicates so a
//! clash is reported as [`FieldfigError::DuplicateFlag`] instead of a clap
//! assertion.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use crate::binder::{Binding, FieldDescriptor};
use crate::error::FieldfigError;
use crate::types::ValueKind;

/// Program metadata and command-level options.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ProgramInfo {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    /// Long name of the flag that lists TOML files to load.
    pub load_config_flag: Option<String>,
}

/// Reject flag names (including aliases and built-in flags) used twice.
pub(crate) fn check_duplicates<'d>(
    program: &ProgramInfo,
    descriptors: impl IntoIterator<Item = &'d FieldDescriptor>,
) -> Result<(), FieldfigError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut claim = |name: &str| {
        if seen.insert(name.to_string()) {
            Ok(())
        } else {
            Err(FieldfigError::DuplicateFlag(name.to_string()))
        }
    };

    claim("help")?;
    claim("h")?;
    if program.version.is_some() {
        claim("version")?;
        claim("V")?;
    }
    if let Some(flag) = &program.load_config_flag {
        claim(flag)?;
    }
    for descriptor in descriptors {
        claim(&descriptor.flag)?;
        for alias in &descriptor.aliases {
            claim(alias)?;
        }
    }
    Ok(())
}

/// Build the clap command for a set of bindings.
pub(crate) fn build_command(program: &ProgramInfo, bindings: &[Binding<'_>]) -> Command {
    let mut cmd = Command::new(program.name.clone())
        .args_override_self(true)
        .color(ColorChoice::Never);

    if let Some(version) = &program.version {
        cmd = cmd.version(version.clone());
    }
    if let Some(description) = &program.description {
        cmd = cmd.about(description.clone());
    }
    if let Some(long_description) = &program.long_description {
        cmd = cmd.long_about(long_description.clone());
    }
    if let Some(flag) = &program.load_config_flag {
        cmd = cmd.arg(
            Arg::new(flag.clone())
                .long(flag.clone())
                .value_name("FILE")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML files to load, comma-separated; earlier files take precedence"),
        );
    }

    for binding in bindings {
        cmd = cmd.arg(field_arg(binding));
    }
    cmd
}

fn field_arg(binding: &Binding<'_>) -> Arg {
    let descriptor = &binding.descriptor;
    let check = binding.check;

    let mut arg = Arg::new(descriptor.flag.clone())
        .long(descriptor.flag.clone())
        .value_name(descriptor.kind.value_name())
        .action(ArgAction::Set)
        .value_parser(move |text: &str| check(text).map(|()| text.to_string()))
        .help(help_text(descriptor));

    if descriptor.kind == ValueKind::Bool {
        arg = arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true");
    }

    let mut has_short = false;
    for alias in &descriptor.aliases {
        let mut chars = alias.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !has_short => {
                arg = arg.short(c);
                has_short = true;
            }
            (Some(c), None) => arg = arg.visible_short_alias(c),
            _ => arg = arg.visible_alias(alias.clone()),
        }
    }
    arg
}

/// Help text with the default and the environment variable appended.
fn help_text(descriptor: &FieldDescriptor) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(help) = descriptor.help.as_deref().filter(|h| !h.is_empty()) {
        parts.push(help.to_string());
    }
    if let Some(default) = &descriptor.default {
        parts.push(format!("(default: {default})"));
    }
    if let Some(env) = &descriptor.env {
        parts.push(format!("[${env}]"));
    }
    parts.join(" ")
}

/// Parse arguments. Help and version output become
/// [`FieldfigError::HelpRequested`].
pub(crate) fn parse(cmd: Command, args: &[OsString]) -> Result<ArgMatches, FieldfigError> {
    cmd.try_get_matches_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            FieldfigError::HelpRequested(e.render().to_string())
        }
        _ => FieldfigError::Cli(e),
    })
}

/// The value passed for `flag` on the command line, if any.
pub(crate) fn flag_value(matches: &ArgMatches, flag: &str) -> Option<String> {
    match matches.value_source(flag) {
        Some(ValueSource::CommandLine) => matches.get_one::<String>(flag).cloned(),
        _ => None,
    }
}

/// Files listed with the load-config flag, in command-line order.
pub(crate) fn config_files(matches: &ArgMatches, program: &ProgramInfo) -> Vec<PathBuf> {
    let Some(flag) = &program.load_config_flag else {
        return vec![];
    };
    matches
        .get_many::<PathBuf>(flag)
        .map(|files| files.cloned().collect())
        .unwrap_or_default()
}
