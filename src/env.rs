use std::collections::HashMap;

use toml::Value;

use crate::source::ValueSource;

/// Environment variables as a value source.
///
/// Lookups are by exact variable name and always yield `Value::String`; the
/// field's type decides how the text is parsed. Variables set to the empty
/// string count as unset.
///
/// Built from an iterator so tests can pass synthetic data instead of
/// `std::env::vars()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Snapshot of the process environment.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// The value of `name`, or `None` when it is missing or empty, so
    /// `HOST=` falls through to the default like an unset variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl ValueSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get(key).map(|value| Value::String(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn exact_name_lookup() {
        let env = EnvSource::from_vars(vars(&[("NESTED_VALUE", "x"), ("VALUE", "y")]));
        assert_eq!(env.lookup("NESTED_VALUE"), Some(Value::String("x".into())));
        assert_eq!(env.lookup("VALUE"), Some(Value::String("y".into())));
        assert_eq!(env.lookup("nested_value"), None);
    }

    #[test]
    fn values_stay_text() {
        let env = EnvSource::from_vars(vars(&[("PORT", "8080"), ("DEBUG", "true")]));
        assert_eq!(env.lookup("PORT"), Some(Value::String("8080".into())));
        assert_eq!(env.lookup("DEBUG"), Some(Value::String("true".into())));
    }

    #[test]
    fn empty_value_is_unset() {
        let env = EnvSource::from_vars(vars(&[("HOST", "")]));
        assert_eq!(env.get("HOST"), None);
        assert_eq!(env.lookup("HOST"), None);
    }

    #[test]
    fn missing_variable() {
        let env = EnvSource::default();
        assert!(env.lookup("ANYTHING").is_none());
    }
}
