//! Name derivation: flag, env, TOML, JSON and YAML names from a declared
//! field name.
//!
//! Explicit overrides win verbatim; the `-` sentinel disables a source.
//! Otherwise names are derived by casing the field's words:
//!
//! | Source | Casing | `log_level` / `LogLevel` | `APIURL` |
//! |--------|--------|--------------------------|----------|
//! | flag   | kebab  | `log-level`              | `api-url` |
//! | env    | SCREAMING_SNAKE | `LOG_LEVEL`     | `API_URL` |
//! | toml   | kebab  | `log-level`              | `api-url` |
//! | yaml   | kebab  | `log-level`              | `api-url` |
//! | json   | lowerCamel | `logLevel`           | `apiUrl` |
//!
//! Word splitting happens on separators, case transitions and letter/digit
//! boundaries (`Value2` becomes `value-2`). A run of capitals is split into
//! known initialisms only when the whole run is made of them, so `APIURL`
//! becomes `api-url` while an unknown run like `IDX` stays one word.
//! Initialisms containing digits (`UTF8`) stay whole.

use std::collections::BTreeSet;

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase};

use crate::types::{DISABLED, Tags};

/// Common initialisms, as used by Go's lint tooling.
pub const COMMON_INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
    "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL",
    "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// Derives source names from declared field names.
#[derive(Debug, Clone, PartialEq)]
pub struct NameDeriver {
    initialisms: BTreeSet<String>,
}

impl Default for NameDeriver {
    fn default() -> Self {
        Self {
            initialisms: COMMON_INITIALISMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Names of one path segment for every source. `None` means the source is
/// disabled for this segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentNames {
    pub flag: Option<String>,
    pub env: Option<String>,
    pub toml: Option<String>,
    pub json: Option<String>,
    pub yaml: Option<String>,
}

impl NameDeriver {
    /// Register an extra initialism (case-insensitive).
    pub fn with_initialism(mut self, word: &str) -> Self {
        self.add_initialism(word);
        self
    }

    pub fn add_initialism(&mut self, word: &str) {
        let word = word.trim().to_uppercase();
        if !word.is_empty() {
            self.initialisms.insert(word);
        }
    }

    pub fn is_initialism(&self, word: &str) -> bool {
        self.initialisms.contains(&word.to_uppercase())
    }

    /// Compute the names of a segment from its declared name and overrides.
    pub fn derive(&self, name: &str, tags: &Tags) -> SegmentNames {
        SegmentNames {
            flag: pick(tags.flag.as_deref(), || self.kebab(name)),
            env: pick(tags.env.as_deref(), || self.screaming_snake(name)),
            toml: pick(tags.toml.as_deref(), || self.kebab(name)),
            json: pick(tags.json.as_deref(), || self.lower_camel(name)),
            yaml: pick(tags.yaml.as_deref(), || self.kebab(name)),
        }
    }

    pub fn kebab(&self, name: &str) -> String {
        self.snake_words(name).to_kebab_case()
    }

    pub fn screaming_snake(&self, name: &str) -> String {
        self.snake_words(name).to_shouty_snake_case()
    }

    pub fn lower_camel(&self, name: &str) -> String {
        self.snake_words(name).to_lower_camel_case()
    }

    /// Split a declared name into lowercase words.
    pub fn words(&self, name: &str) -> Vec<String> {
        name.split(|c: char| !c.is_alphanumeric())
            .filter(|chunk| !chunk.is_empty())
            .flat_map(raw_words)
            .flat_map(|word| self.split_word(&word))
            .map(|word| word.to_lowercase())
            .collect()
    }

    fn snake_words(&self, name: &str) -> String {
        self.words(name).join("_")
    }

    fn split_word(&self, word: &str) -> Vec<String> {
        if !word.chars().any(char::is_lowercase) {
            if let Some(parts) = self.segment(word) {
                return parts.into_iter().map(str::to_string).collect();
            }
        }
        digit_runs(word)
            .into_iter()
            .flat_map(|piece| self.split_initialisms(piece))
            .collect()
    }

    fn split_initialisms(&self, word: &str) -> Vec<String> {
        if word.chars().any(char::is_lowercase) {
            return vec![word.to_string()];
        }
        match self.segment(word) {
            Some(parts) => parts.into_iter().map(str::to_string).collect(),
            None => vec![word.to_string()],
        }
    }

    /// Cover `run` entirely with initialisms, longest match first.
    fn segment<'w>(&self, run: &'w str) -> Option<Vec<&'w str>> {
        if run.is_empty() {
            return Some(vec![]);
        }
        let mut candidates: Vec<&String> = self
            .initialisms
            .iter()
            .filter(|i| run.starts_with(i.as_str()))
            .collect();
        candidates.sort_by_key(|i| std::cmp::Reverse(i.len()));

        for initialism in candidates {
            let (head, tail) = run.split_at(initialism.len());
            if let Some(mut rest) = self.segment(tail) {
                rest.insert(0, head);
                return Some(rest);
            }
        }
        None
    }
}

fn pick(explicit: Option<&str>, derive: impl FnOnce() -> String) -> Option<String> {
    match explicit {
        Some(DISABLED) => None,
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => Some(derive()),
    }
}

/// Split one alphanumeric chunk on case transitions.
///
/// A boundary falls before a capital that follows a lowercase letter
/// (digits in between are skipped), or before the last capital of a run
/// when a lowercase letter follows it (`HTTPServer` → `HTTP`, `Server`).
fn raw_words(chunk: &str) -> Vec<String> {
    let chars: Vec<char> = chunk.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && !current.is_empty() {
            let prev_letter = current.chars().rev().find(|p| !p.is_numeric());
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let after_lower = prev_letter.is_some_and(char::is_lowercase);
            let ends_run = prev_letter.is_some_and(char::is_uppercase) && next_is_lower;
            if after_lower || ends_run {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Split `word` wherever it switches between digits and non-digits.
fn digit_runs(word: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut prev_digit = None;
    for (i, c) in word.char_indices() {
        let digit = c.is_numeric();
        if prev_digit.is_some_and(|p| p != digit) {
            runs.push(&word[start..i]);
            start = i;
        }
        prev_digit = Some(digit);
    }
    if start < word.len() {
        runs.push(&word[start..]);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deriver() -> NameDeriver {
        NameDeriver::default()
    }

    #[test]
    fn snake_case_names() {
        let d = deriver();
        assert_eq!(d.kebab("log_level"), "log-level");
        assert_eq!(d.screaming_snake("log_level"), "LOG_LEVEL");
        assert_eq!(d.lower_camel("log_level"), "logLevel");
    }

    #[test]
    fn camel_case_names() {
        let d = deriver();
        assert_eq!(d.kebab("LogLevel"), "log-level");
        assert_eq!(d.screaming_snake("DocumentedValue"), "DOCUMENTED_VALUE");
        assert_eq!(d.lower_camel("ValueWithDefault"), "valueWithDefault");
    }

    #[test]
    fn initialism_runs_are_split_into_known_words() {
        let d = deriver();
        assert_eq!(d.kebab("APIURL"), "api-url");
        assert_eq!(d.kebab("UserID"), "user-id");
        assert_eq!(d.screaming_snake("HTTPServer"), "HTTP_SERVER");
        assert_eq!(d.kebab("HTTPSProxy"), "https-proxy");
        assert_eq!(d.lower_camel("UserID"), "userId");
    }

    #[test]
    fn unknown_capital_run_stays_whole() {
        assert_eq!(deriver().kebab("IDX"), "idx");
    }

    #[test]
    fn digits_start_new_words() {
        let d = deriver();
        assert_eq!(d.kebab("NumberBetween0to10"), "number-between-0-to-10");
        assert_eq!(d.screaming_snake("NumberBetween0to10"), "NUMBER_BETWEEN_0_TO_10");
        assert_eq!(d.kebab("Value2"), "value-2");
        assert_eq!(d.screaming_snake("Value2"), "VALUE_2");
        assert_eq!(d.kebab("value2"), "value-2");
        assert_eq!(d.kebab("HTTP2Server"), "http-2-server");
    }

    #[test]
    fn initialisms_with_digits_stay_whole() {
        let d = deriver();
        assert_eq!(d.kebab("UTF8Value"), "utf8-value");
        assert_eq!(d.kebab("UTF8ID"), "utf8-id");
        assert_eq!(d.screaming_snake("UTF8"), "UTF8");
    }

    #[test]
    fn custom_initialism() {
        let d = deriver().with_initialism("k8s");
        assert!(d.is_initialism("K8S"));
        assert_eq!(d.kebab("K8SAPIToken"), "k8s-api-token");
    }

    #[test]
    fn derive_uses_defaults() {
        let names = deriver().derive("max_connections", &Tags::new());
        assert_eq!(names.flag.as_deref(), Some("max-connections"));
        assert_eq!(names.env.as_deref(), Some("MAX_CONNECTIONS"));
        assert_eq!(names.toml.as_deref(), Some("max-connections"));
        assert_eq!(names.yaml.as_deref(), Some("max-connections"));
        assert_eq!(names.json.as_deref(), Some("maxConnections"));
    }

    #[test]
    fn derive_respects_overrides_and_sentinel() {
        let tags = Tags::new()
            .flag("level")
            .env("LOGGING_LEVEL")
            .toml("-")
            .json("");
        let names = deriver().derive("log_level", &tags);
        assert_eq!(names.flag.as_deref(), Some("level"));
        assert_eq!(names.env.as_deref(), Some("LOGGING_LEVEL"));
        assert_eq!(names.toml, None);
        // An empty override falls back to derivation.
        assert_eq!(names.json.as_deref(), Some("logLevel"));
    }
}
