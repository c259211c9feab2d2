use std::ffi::OsString;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::binder::Configure;
use crate::cli::ProgramInfo;
use crate::error::FieldfigError;
use crate::file;
use crate::naming::NameDeriver;
use crate::resolve::{self, ResolveInput};
use crate::source::MapSource;

/// Long name used by [`FieldfigBuilder::default_load_config_flag`].
pub const DEFAULT_LOAD_CONFIG_FLAG: &str = "load-config";

/// Entry point for building a fieldfig configuration.
pub struct Fieldfig;

impl Fieldfig {
    pub fn builder<C: Configure>() -> FieldfigBuilder<C> {
        FieldfigBuilder::new()
    }
}

enum TomlInput {
    File(PathBuf),
    Source(MapSource),
}

/// Builder for program metadata and load options.
///
/// Sources, highest precedence first:
///
/// - **Flags**: one per field, built from the structure.
/// - **TOML files**: named with the load-config flag, then those added
///   through [`toml_file()`](Self::toml_file) / [`toml_source()`](Self::toml_source).
///   The first file that has a key wins.
/// - **Environment**: one variable per field; see [`no_env()`](Self::no_env).
/// - **Defaults**: the literal declared on the field, else the zero value.
pub struct FieldfigBuilder<C: Configure> {
    program_name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    long_description: Option<String>,
    load_config_flag: Option<String>,
    toml: Vec<TomlInput>,
    args: Option<Vec<OsString>>,
    env_vars: Option<Vec<(String, String)>>,
    env_enabled: bool,
    deriver: NameDeriver,
    _phantom: PhantomData<C>,
}

impl<C: Configure> FieldfigBuilder<C> {
    fn new() -> Self {
        Self {
            program_name: None,
            version: None,
            description: None,
            long_description: None,
            load_config_flag: None,
            toml: Vec::new(),
            args: None,
            env_vars: None,
            env_enabled: true,
            deriver: NameDeriver::default(),
            _phantom: PhantomData,
        }
    }

    /// Set the program name shown in usage and help output. Required.
    pub fn program_name(mut self, name: &str) -> Self {
        self.program_name = Some(name.to_string());
        self
    }

    /// Set the version; enables `-V/--version`.
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// One-line description shown in `-h` output.
    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    /// Longer description shown in `--help` output.
    pub fn long_description(mut self, text: &str) -> Self {
        self.long_description = Some(text.to_string());
        self
    }

    /// Add a flag that names TOML files to load, comma-separated and
    /// repeatable: `--config a.toml,b.toml --config c.toml`.
    pub fn load_config_flag(mut self, name: &str) -> Self {
        self.load_config_flag = Some(name.to_string());
        self
    }

    /// Add the load-config flag under its default name, `--load-config`.
    pub fn default_load_config_flag(self) -> Self {
        self.load_config_flag(DEFAULT_LOAD_CONFIG_FLAG)
    }

    /// Load a TOML file. Files named on the command line take precedence.
    pub fn toml_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.toml.push(TomlInput::File(path.into()));
        self
    }

    /// Add an already parsed TOML source.
    pub fn toml_source(mut self, source: MapSource) -> Self {
        self.toml.push(TomlInput::Source(source));
        self
    }

    /// Parse these arguments instead of the process arguments. The first
    /// item is the program name, as in `std::env::args()`.
    pub fn args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Read these variables instead of the process environment.
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Disable environment variable lookups entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Treat `word` as an initialism when deriving names. With `K8S`, a
    /// field declared as `K8SAPIToken` gets the flag `--k8s-api-token`.
    pub fn initialism(mut self, word: &str) -> Self {
        self.deriver.add_initialism(word);
        self
    }

    /// Resolve the effective program name, or error if not set.
    fn effective_program_name(&self) -> Result<&str, FieldfigError> {
        self.program_name
            .as_deref()
            .ok_or(FieldfigError::ProgramNameRequired)
    }

    fn effective_args(&self) -> Vec<OsString> {
        match &self.args {
            Some(args) => args.clone(),
            None => std::env::args_os().collect(),
        }
    }

    fn effective_env_vars(&self) -> Vec<(String, String)> {
        match &self.env_vars {
            Some(vars) => vars.clone(),
            None if self.env_enabled => std::env::vars().collect(),
            None => vec![],
        }
    }

    /// Build the `ResolveInput` from current builder state.
    fn build_input(self, validate: bool) -> Result<ResolveInput, FieldfigError> {
        let program = ProgramInfo {
            name: self.effective_program_name()?.to_string(),
            version: self.version.clone(),
            description: self.description.clone(),
            long_description: self.long_description.clone(),
            load_config_flag: self.load_config_flag.clone(),
        };
        let args = self.effective_args();
        let env_vars = self.effective_env_vars();

        let mut toml_sources = Vec::with_capacity(self.toml.len());
        for input in self.toml {
            toml_sources.push(match input {
                TomlInput::File(path) => file::load_toml_file(&path)?,
                TomlInput::Source(source) => source,
            });
        }

        Ok(ResolveInput {
            program,
            args,
            env_vars,
            env_enabled: self.env_enabled,
            toml_sources,
            deriver: self.deriver,
            validate,
        })
    }

    /// Populate `config` from every source, without validation.
    pub fn load_into(self, config: &mut C) -> Result<(), FieldfigError> {
        let input = self.build_input(false)?;
        resolve::resolve(config, input)
    }

    /// Populate `config` and run validation.
    pub fn load_and_validate_into(self, config: &mut C) -> Result<(), FieldfigError> {
        let input = self.build_input(true)?;
        resolve::resolve(config, input)
    }

    /// Load a fresh `C` from every source, without validation.
    pub fn load(self) -> Result<C, FieldfigError>
    where
        C: Default,
    {
        let mut config = C::default();
        self.load_into(&mut config)?;
        Ok(config)
    }

    /// Load a fresh `C` and validate it.
    pub fn load_and_validate(self) -> Result<C, FieldfigError>
    where
        C: Default,
    {
        let mut config = C::default();
        self.load_and_validate_into(&mut config)?;
        Ok(config)
    }

    /// Load and validate, or exit the process.
    ///
    /// Help and version requests print to stdout and exit 0; any other error
    /// prints to stderr and exits 1.
    pub fn must_load_and_validate(self) -> C
    where
        C: Default,
    {
        match self.load_and_validate() {
            Ok(config) => config,
            Err(FieldfigError::HelpRequested(text)) => {
                print!("{text}");
                std::process::exit(0);
            }
            Err(FieldfigError::Cli(e)) => {
                eprint!("{}", e.render());
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{DeepConfig, RulesConfig, SimpleConfig};
    use std::fs;
    use tempfile::TempDir;

    fn builder<C: Configure>() -> FieldfigBuilder<C> {
        Fieldfig::builder::<C>()
            .program_name("app")
            .args(["app"])
            .env_vars(Vec::<(String, String)>::new())
    }

    #[test]
    fn missing_program_name_errors() {
        let result = Fieldfig::builder::<SimpleConfig>().args(["app"]).load();
        assert!(matches!(result, Err(FieldfigError::ProgramNameRequired)));
    }

    #[test]
    fn load_end_to_end() {
        let config: SimpleConfig = builder()
            .args(["app", "--value", "v1", "--nested-value", "v2"])
            .load()
            .unwrap();
        assert_eq!(config.value, "v1");
        assert_eq!(config.nested.value, "v2");
    }

    #[test]
    fn load_defaults_only() {
        let config: SimpleConfig = builder().load().unwrap();
        assert_eq!(config.value, "x");
        assert_eq!(config.nested.value, "");
    }

    #[test]
    fn load_with_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "value = \"from-file\"\n").unwrap();

        let config: SimpleConfig = builder().toml_file(&path).load().unwrap();
        assert_eq!(config.value, "from-file");
    }

    #[test]
    fn missing_builder_file_errors() {
        let dir = TempDir::new().unwrap();
        let result = builder::<SimpleConfig>()
            .toml_file(dir.path().join("absent.toml"))
            .load();
        assert!(matches!(result, Err(FieldfigError::IoError { .. })));
    }

    #[test]
    fn builder_sources_keep_their_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "value = \"from-file\"\n").unwrap();
        let source = MapSource::from_toml_str("inline", "value = \"inline\"").unwrap();

        let config: SimpleConfig = builder()
            .toml_source(source)
            .toml_file(&path)
            .load()
            .unwrap();
        assert_eq!(config.value, "inline");
    }

    #[test]
    fn default_load_config_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "value = \"loaded\"\n").unwrap();

        let config: SimpleConfig = builder()
            .default_load_config_flag()
            .args([
                OsString::from("app"),
                OsString::from("--load-config"),
                path.into_os_string(),
            ])
            .load()
            .unwrap();
        assert_eq!(config.value, "loaded");
    }

    #[test]
    fn custom_load_config_flag_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "[nested]\nvalue = \"loaded\"\n").unwrap();

        let config: SimpleConfig = builder()
            .load_config_flag("config")
            .args([OsString::from("app"), OsString::from("--config"), path.into_os_string()])
            .load()
            .unwrap();
        assert_eq!(config.nested.value, "loaded");
    }

    #[test]
    fn env_vars_and_no_env() {
        let config: SimpleConfig = builder()
            .env_vars([("NESTED_VALUE", "from-env")])
            .load()
            .unwrap();
        assert_eq!(config.nested.value, "from-env");

        let config: SimpleConfig = builder()
            .env_vars([("NESTED_VALUE", "from-env")])
            .no_env()
            .load()
            .unwrap();
        assert_eq!(config.nested.value, "");
    }

    #[test]
    fn help_is_requested() {
        let err = builder::<SimpleConfig>()
            .description("Test program")
            .args(["app", "--help"])
            .load()
            .unwrap_err();
        assert!(err.is_help_requested());
        assert!(err.to_string().contains("Test program"));
    }

    #[test]
    fn load_config_flag_collides_with_field() {
        let err = builder::<DeepConfig>()
            .version("1.0.0")
            .load_config_flag("server-host")
            .load()
            .unwrap_err();
        assert_eq!(err.to_string(), "duplicate flag: --server-host");
    }

    #[test]
    fn load_and_validate_reports_violations() {
        let err = builder::<RulesConfig>().load_and_validate().unwrap_err();
        assert!(matches!(err, FieldfigError::Validation(_)));
        assert!(
            err.to_string()
                .contains("Missing required configuration: required_value")
        );

        let config: RulesConfig = builder()
            .args([
                "app",
                "--required-value",
                "present",
                "--alphanumeric",
                "abc123",
                "--contains",
                "MustContain",
                "--number-between-0-to-10",
                "3",
            ])
            .load_and_validate()
            .unwrap();
        assert_eq!(config.number_between_0_to_10, 3);
    }

    #[test]
    fn custom_initialism_shapes_names() {
        let config: crate::fixtures::test::InitialismConfig = builder()
            .initialism("K8S")
            .env_vars([("K8S_API_TOKEN", "t0ken"), ("K8SAPI_TOKEN", "ignored")])
            .load()
            .unwrap();
        assert_eq!(config.k8s_api_token, "t0ken");
    }
}
