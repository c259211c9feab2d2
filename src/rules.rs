//! The built-in validation rule engine.
//!
//! A rule expression is a comma-separated list of rules, each optionally
//! carrying a parameter after `=`: `"required"`, `"gte=0,lte=10"`,
//! `"oneof=debug info warn"`. Expressions are parsed when a field is bound,
//! against the field's kind, so a typo or an ill-typed parameter fails
//! construction instead of the first load.
//!
//! Size rules (`gt`, `gte`, `lt`, `lte`, `min`, `max`, `len`) measure the
//! character count of strings, the value of numbers and the length of
//! durations. `eq` and `ne` compare strings and booleans by value.
//!
//! Sizes, ranges, substrings and IP addresses are checked with the
//! `validator` crate; this module only parses expressions and maps each
//! rule onto the matching check.

use std::path::Path;
use std::time::Duration;

use toml::Value;
use validator::{
    ValidateContains, ValidateDoesNotContain, ValidateIp, ValidateLength, ValidateRange,
};

use crate::error::FieldfigError;
use crate::types::ValueKind;
use crate::value::{parse_bool, parse_duration};

/// One parsed rule. `tag` is the rule name as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    tag: String,
    check: Check,
}

#[derive(Debug, Clone, PartialEq)]
enum Check {
    Required,
    OmitEmpty,
    Compare(Cmp, Bound),
    OneOf { options: Vec<String>, ignore_case: bool },
    Contains(String),
    Excludes(String),
    StartsWith(String),
    EndsWith(String),
    Alpha,
    AlphaNum,
    Numeric,
    Lowercase,
    Uppercase,
    Ip,
    Dir,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cmp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq)]
enum Bound {
    /// Character count for strings, value for integers.
    Int(i128),
    Float(f64),
    Duration(Duration),
    Bool(bool),
    Text(String),
}

/// A field's current value, shaped for rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Subject {
    Text(String),
    Int(i128),
    Float(f64),
    Bool(bool),
    Duration(Duration),
}

impl Subject {
    /// Rebuild the typed view from a field snapshot.
    pub(crate) fn from_snapshot(kind: ValueKind, raw: &Value) -> Option<Self> {
        match (kind, raw) {
            (ValueKind::String, Value::String(s)) => Some(Subject::Text(s.clone())),
            (ValueKind::Int(_) | ValueKind::Uint(_), Value::Integer(i)) => {
                Some(Subject::Int(i128::from(*i)))
            }
            (ValueKind::Uint(_), Value::String(s)) => s.parse().ok().map(Subject::Int),
            (ValueKind::Float, Value::Float(f)) => Some(Subject::Float(*f)),
            (ValueKind::Bool, Value::Boolean(b)) => Some(Subject::Bool(*b)),
            (ValueKind::Duration, Value::String(s)) => parse_duration(s).ok().map(Subject::Duration),
            _ => None,
        }
    }
}

impl Rule {
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Parse a rule expression for a field of `kind`. `field` names the field
/// in errors.
pub(crate) fn parse(
    field: &str,
    expr: Option<&str>,
    kind: ValueKind,
) -> Result<Vec<Rule>, FieldfigError> {
    let Some(expr) = expr else {
        return Ok(vec![]);
    };
    expr.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            parse_one(token, kind).map_err(|reason| FieldfigError::InvalidRule {
                field: field.to_string(),
                rule: token.to_string(),
                reason,
            })
        })
        .collect()
}

fn parse_one(token: &str, kind: ValueKind) -> Result<Rule, String> {
    let (tag, param) = match token.split_once('=') {
        Some((tag, param)) => (tag.trim(), Some(param.trim())),
        None => (token, None),
    };
    let needs = |what: &str| required_param(tag, param, what);
    let strings_only = || -> Result<(), String> {
        if kind == ValueKind::String {
            Ok(())
        } else {
            Err(format!("'{tag}' applies to strings, not {kind}"))
        }
    };

    let check = match tag {
        "required" => Check::Required,
        "omitempty" => Check::OmitEmpty,
        "gt" | "gte" | "lt" | "lte" | "eq" | "ne" | "min" | "max" | "len" => {
            let cmp = match tag {
                "gt" => Cmp::Gt,
                "gte" | "min" => Cmp::Gte,
                "lt" => Cmp::Lt,
                "lte" | "max" => Cmp::Lte,
                "eq" | "len" => Cmp::Eq,
                _ => Cmp::Ne,
            };
            let by_value = matches!(tag, "eq" | "ne");
            let bound = parse_bound(needs("a parameter")?, kind, by_value)?;
            Check::Compare(cmp, bound)
        }
        "oneof" | "oneofci" => {
            let options: Vec<String> = needs("a list of options")?
                .split_whitespace()
                .map(str::to_string)
                .collect();
            match kind {
                ValueKind::String => {}
                ValueKind::Int(_) | ValueKind::Uint(_) if tag == "oneof" => {
                    for option in &options {
                        option
                            .parse::<i128>()
                            .map_err(|_| format!("{option:?} is not an integer"))?;
                    }
                }
                _ => return Err(format!("'{tag}' does not apply to {kind}")),
            }
            Check::OneOf {
                options,
                ignore_case: tag == "oneofci",
            }
        }
        "contains" => {
            strings_only()?;
            Check::Contains(needs("a substring")?.to_string())
        }
        "excludes" => {
            strings_only()?;
            Check::Excludes(needs("a substring")?.to_string())
        }
        "startswith" => {
            strings_only()?;
            Check::StartsWith(needs("a prefix")?.to_string())
        }
        "endswith" => {
            strings_only()?;
            Check::EndsWith(needs("a suffix")?.to_string())
        }
        "alpha" | "alphanum" | "numeric" | "lowercase" | "uppercase" | "ip" | "dir" | "file" => {
            strings_only()?;
            match tag {
                "alpha" => Check::Alpha,
                "alphanum" => Check::AlphaNum,
                "numeric" => Check::Numeric,
                "lowercase" => Check::Lowercase,
                "uppercase" => Check::Uppercase,
                "ip" => Check::Ip,
                "dir" => Check::Dir,
                _ => Check::File,
            }
        }
        _ => return Err(format!("unknown rule '{tag}'")),
    };

    Ok(Rule {
        tag: tag.to_string(),
        check,
    })
}

fn required_param<'p>(tag: &str, param: Option<&'p str>, what: &str) -> Result<&'p str, String> {
    param
        .filter(|p| !p.is_empty())
        .ok_or_else(|| format!("'{tag}' needs {what}"))
}

fn parse_bound(param: &str, kind: ValueKind, by_value: bool) -> Result<Bound, String> {
    let bad = |what: &str| format!("{param:?} is not {what}");
    match kind {
        ValueKind::String if by_value => Ok(Bound::Text(param.to_string())),
        ValueKind::String => param
            .parse::<usize>()
            .map(|n| Bound::Int(n as i128))
            .map_err(|_| bad("a character count")),
        ValueKind::Int(_) | ValueKind::Uint(_) => {
            param.parse().map(Bound::Int).map_err(|_| bad("an integer"))
        }
        ValueKind::Float => param.parse().map(Bound::Float).map_err(|_| bad("a number")),
        ValueKind::Duration => parse_duration(param).map(Bound::Duration),
        ValueKind::Bool if by_value => parse_bool(param).map(Bound::Bool),
        ValueKind::Bool => Err("booleans only support eq and ne".to_string()),
    }
}

/// Evaluate rules in order and return the tag of the first one that fails.
/// `omitempty` on a zero value ends evaluation successfully.
pub(crate) fn first_failure<'r>(
    rules: &'r [Rule],
    subject: &Subject,
    is_zero: bool,
) -> Option<&'r str> {
    for rule in rules {
        let ok = match &rule.check {
            Check::Required => !is_zero,
            Check::OmitEmpty if is_zero => return None,
            Check::OmitEmpty => true,
            Check::Compare(cmp, bound) => compare(*cmp, subject, bound),
            Check::OneOf {
                options,
                ignore_case,
            } => {
                let text = render(subject);
                options.iter().any(|option| {
                    if *ignore_case {
                        option.eq_ignore_ascii_case(&text)
                    } else {
                        *option == text
                    }
                })
            }
            Check::Contains(needle) => string(subject).is_some_and(|s| s.validate_contains(needle)),
            Check::Excludes(needle) => {
                string(subject).is_some_and(|s| s.validate_does_not_contain(needle))
            }
            Check::StartsWith(prefix) => {
                text(subject).is_some_and(|s| s.starts_with(prefix.as_str()))
            }
            Check::EndsWith(suffix) => text(subject).is_some_and(|s| s.ends_with(suffix.as_str())),
            Check::Alpha => non_empty(subject, |s| s.chars().all(|c| c.is_ascii_alphabetic())),
            Check::AlphaNum => {
                non_empty(subject, |s| s.chars().all(|c| c.is_ascii_alphanumeric()))
            }
            Check::Numeric => non_empty(subject, is_numeric),
            Check::Lowercase => non_empty(subject, |s| s == s.to_lowercase()),
            Check::Uppercase => non_empty(subject, |s| s == s.to_uppercase()),
            Check::Ip => string(subject).is_some_and(|s| !s.is_empty() && s.validate_ip()),
            Check::Dir => non_empty(subject, |s| Path::new(s).is_dir()),
            Check::File => non_empty(subject, |s| Path::new(s).is_file()),
        };
        if !ok {
            return Some(rule.tag.as_str());
        }
    }
    None
}

fn compare(cmp: Cmp, subject: &Subject, bound: &Bound) -> bool {
    use std::cmp::Ordering;

    let ordering: Option<Ordering> = match (subject, bound) {
        (Subject::Text(s), Bound::Int(n)) => return within_length(cmp, s, *n),
        (Subject::Int(i), Bound::Int(n)) => return within_range(cmp, i, *n),
        (Subject::Float(f), Bound::Float(n)) => return within_range(cmp, f, *n),
        (Subject::Text(s), Bound::Text(t)) => Some(s.as_str().cmp(t.as_str())),
        (Subject::Duration(d), Bound::Duration(n)) => Some(d.cmp(n)),
        (Subject::Bool(b), Bound::Bool(n)) => Some(b.cmp(n)),
        _ => None,
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match cmp {
        Cmp::Gt => ordering == Ordering::Greater,
        Cmp::Gte => ordering != Ordering::Less,
        Cmp::Lt => ordering == Ordering::Less,
        Cmp::Lte => ordering != Ordering::Greater,
        Cmp::Eq => ordering == Ordering::Equal,
        Cmp::Ne => ordering != Ordering::Equal,
    }
}

/// `value <cmp> bound` as a `validator` range check.
fn within_range<T: Copy + PartialOrd>(cmp: Cmp, value: &impl ValidateRange<T>, bound: T) -> bool {
    match cmp {
        Cmp::Gt => value.validate_range(None, None, Some(bound), None),
        Cmp::Gte => value.validate_range(Some(bound), None, None, None),
        Cmp::Lt => value.validate_range(None, None, None, Some(bound)),
        Cmp::Lte => value.validate_range(None, Some(bound), None, None),
        Cmp::Eq => value.validate_range(Some(bound), Some(bound), None, None),
        Cmp::Ne => !value.validate_range(Some(bound), Some(bound), None, None),
    }
}

/// Character count of `s` against `bound` as a `validator` length check.
fn within_length(cmp: Cmp, s: &String, bound: i128) -> bool {
    let Ok(n) = u64::try_from(bound) else {
        return false;
    };
    match cmp {
        Cmp::Gt => n.checked_add(1).is_some_and(|min| s.validate_length(Some(min), None, None)),
        Cmp::Gte => s.validate_length(Some(n), None, None),
        Cmp::Lt => n.checked_sub(1).is_some_and(|max| s.validate_length(None, Some(max), None)),
        Cmp::Lte => s.validate_length(None, Some(n), None),
        Cmp::Eq => s.validate_length(None, None, Some(n)),
        Cmp::Ne => !s.validate_length(None, None, Some(n)),
    }
}

fn string(subject: &Subject) -> Option<&String> {
    match subject {
        Subject::Text(s) => Some(s),
        _ => None,
    }
}

fn text(subject: &Subject) -> Option<&str> {
    match subject {
        Subject::Text(s) => Some(s),
        _ => None,
    }
}

fn non_empty(subject: &Subject, pred: impl Fn(&str) -> bool) -> bool {
    text(subject).is_some_and(|s| !s.is_empty() && pred(s))
}

fn render(subject: &Subject) -> String {
    match subject {
        Subject::Text(s) => s.clone(),
        Subject::Int(i) => i.to_string(),
        Subject::Float(f) => f.to_string(),
        Subject::Bool(b) => b.to_string(),
        Subject::Duration(d) => humantime::format_duration(*d).to_string(),
    }
}

/// Optional sign, digits, optional fraction.
fn is_numeric(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    match unsigned.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(unsigned),
    }
}
