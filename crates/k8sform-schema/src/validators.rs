//! Attribute validators
//!
//! Re-declares the constraints the Kubernetes API server enforces so that
//! bad configuration is reported at plan time. Messages follow the
//! Terraform plugin framework wording.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

static DNS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"));

static DNS_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid regex")
});

static QUALIFIED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("valid regex"));

static LABEL_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$").expect("valid regex")
});

const DNS_LABEL_MAX: usize = 63;
const DNS_SUBDOMAIN_MAX: usize = 253;
const QUALIFIED_NAME_MAX: usize = 63;
const LABEL_VALUE_MAX: usize = 63;

/// A constraint on a single attribute value
///
/// Validators only ever see non-null values of the attribute's kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Validator {
    /// String must be one of the listed values
    OneOf { values: Vec<String> },
    /// String must match the pattern
    Regex {
        #[serde(serialize_with = "serialize_regex")]
        pattern: Regex,
    },
    /// String length bounds (in characters)
    Length { min: Option<u64>, max: Option<u64> },
    /// Integer bounds, inclusive
    IntRange { min: Option<i64>, max: Option<i64> },
    /// Float bounds
    FloatRange {
        min: Option<f64>,
        max: Option<f64>,
        exclusive_min: bool,
        exclusive_max: bool,
    },
    /// Number must be a whole multiple of `factor`
    MultipleOf { factor: f64 },
    /// List length bounds
    ItemCount { min: Option<u64>, max: Option<u64> },
    /// List items must be distinct
    UniqueItems,
    /// Map entry count bounds
    PropertyCount { min: Option<u64>, max: Option<u64> },
    /// RFC 1123 DNS subdomain (object names)
    DnsSubdomain,
    /// RFC 1123 DNS label (namespaces)
    DnsLabel,
    /// Map keys are valid label keys, values valid label values
    Labels,
    /// Map keys are valid annotation keys
    Annotations,
}

fn serialize_regex<S: Serializer>(regex: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(regex.as_str())
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::OneOf { values: a }, Self::OneOf { values: b }) => a == b,
            (Self::Regex { pattern: a }, Self::Regex { pattern: b }) => a.as_str() == b.as_str(),
            (Self::Length { min: a, max: b }, Self::Length { min: c, max: d }) => a == c && b == d,
            (Self::IntRange { min: a, max: b }, Self::IntRange { min: c, max: d }) => {
                a == c && b == d
            }
            (
                Self::FloatRange {
                    min: a,
                    max: b,
                    exclusive_min: e1,
                    exclusive_max: e2,
                },
                Self::FloatRange {
                    min: c,
                    max: d,
                    exclusive_min: e3,
                    exclusive_max: e4,
                },
            ) => a == c && b == d && e1 == e3 && e2 == e4,
            (Self::MultipleOf { factor: a }, Self::MultipleOf { factor: b }) => a == b,
            (Self::ItemCount { min: a, max: b }, Self::ItemCount { min: c, max: d })
            | (Self::PropertyCount { min: a, max: b }, Self::PropertyCount { min: c, max: d }) => {
                a == c && b == d
            }
            (Self::UniqueItems, Self::UniqueItems)
            | (Self::DnsSubdomain, Self::DnsSubdomain)
            | (Self::DnsLabel, Self::DnsLabel)
            | (Self::Labels, Self::Labels)
            | (Self::Annotations, Self::Annotations) => true,
            _ => false,
        }
    }
}

impl Validator {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Compile a pattern validator
    ///
    /// CRD patterns are ECMA-262; the few that use lookaround or
    /// backreferences do not compile and yield `None`.
    pub fn regex(pattern: &str) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(pattern) => Some(Self::Regex { pattern }),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "skipping pattern validator");
                None
            }
        }
    }

    /// Check a value, returning the diagnostic detail on failure
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::OneOf { values } => {
                let Some(s) = value.as_str() else {
                    return Ok(());
                };
                if values.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    let quoted: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
                    Err(format!(
                        "value must be one of: [{}], got: {:?}",
                        quoted.join(" "),
                        s
                    ))
                }
            }
            Self::Regex { pattern } => match value.as_str() {
                Some(s) if !pattern.is_match(s) => Err(format!(
                    "value must match regular expression '{}', got: {:?}",
                    pattern.as_str(),
                    s
                )),
                _ => Ok(()),
            },
            Self::Length { min, max } => {
                let Some(s) = value.as_str() else {
                    return Ok(());
                };
                let len = s.chars().count() as u64;
                check_bounds("string length", len, *min, *max)
            }
            Self::IntRange { min, max } => {
                let Some(n) = as_integer(value) else {
                    return Ok(());
                };
                let below = min.is_some_and(|m| n < m);
                let above = max.is_some_and(|m| n > m);
                if below || above {
                    Err(range_message("value", *min, *max, n))
                } else {
                    Ok(())
                }
            }
            Self::FloatRange {
                min,
                max,
                exclusive_min,
                exclusive_max,
            } => {
                let Some(n) = value.as_f64() else {
                    return Ok(());
                };
                let below = min.is_some_and(|m| if *exclusive_min { n <= m } else { n < m });
                let above = max.is_some_and(|m| if *exclusive_max { n >= m } else { n > m });
                if below || above {
                    Err(range_message("value", *min, *max, n))
                } else {
                    Ok(())
                }
            }
            Self::MultipleOf { factor } => {
                let Some(n) = value.as_f64() else {
                    return Ok(());
                };
                if *factor == 0.0 || (n / factor).fract() == 0.0 {
                    Ok(())
                } else {
                    Err(format!("value must be a multiple of {}, got: {}", factor, n))
                }
            }
            Self::ItemCount { min, max } => {
                let Some(items) = value.as_array() else {
                    return Ok(());
                };
                check_bounds("list length", items.len() as u64, *min, *max)
            }
            Self::UniqueItems => {
                let Some(items) = value.as_array() else {
                    return Ok(());
                };
                for (i, item) in items.iter().enumerate() {
                    if items[..i].contains(item) {
                        return Err(format!("list items must be unique, got duplicate: {}", item));
                    }
                }
                Ok(())
            }
            Self::PropertyCount { min, max } => {
                let Some(map) = value.as_object() else {
                    return Ok(());
                };
                check_bounds("number of entries", map.len() as u64, *min, *max)
            }
            Self::DnsSubdomain => {
                check_name(value, &DNS_SUBDOMAIN, DNS_SUBDOMAIN_MAX, "RFC 1123 subdomain")
            }
            Self::DnsLabel => check_name(value, &DNS_LABEL, DNS_LABEL_MAX, "RFC 1123 label"),
            Self::Labels => {
                let Some(map) = value.as_object() else {
                    return Ok(());
                };
                for (key, v) in map {
                    check_qualified_key(key)?;
                    let v = v.as_str().unwrap_or_default();
                    if v.len() > LABEL_VALUE_MAX || !LABEL_VALUE.is_match(v) {
                        return Err(format!(
                            "label value {:?} for key {:?} must be at most {} characters, \
                             start and end with an alphanumeric character and contain only \
                             '-', '_', '.' or alphanumerics",
                            v, key, LABEL_VALUE_MAX
                        ));
                    }
                }
                Ok(())
            }
            Self::Annotations => {
                let Some(map) = value.as_object() else {
                    return Ok(());
                };
                map.keys().try_for_each(|key| check_qualified_key(key))
            }
        }
    }
}

/// Integers, including floats with no fractional part
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

fn check_bounds(what: &str, actual: u64, min: Option<u64>, max: Option<u64>) -> Result<(), String> {
    let below = min.is_some_and(|m| actual < m);
    let above = max.is_some_and(|m| actual > m);
    if below || above {
        Err(range_message(what, min, max, actual))
    } else {
        Ok(())
    }
}

fn range_message<T: std::fmt::Display>(
    what: &str,
    min: Option<T>,
    max: Option<T>,
    actual: T,
) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{} must be between {} and {}, got: {}", what, min, max, actual),
        (Some(min), None) => format!("{} must be at least {}, got: {}", what, min, actual),
        (None, Some(max)) => format!("{} must be at most {}, got: {}", what, max, actual),
        (None, None) => format!("{} is out of range, got: {}", what, actual),
    }
}

fn check_name(value: &Value, pattern: &Regex, max: usize, label: &str) -> Result<(), String> {
    let Some(s) = value.as_str() else {
        return Ok(());
    };
    if s.is_empty() || s.len() > max || !pattern.is_match(s) {
        return Err(format!(
            "value must be a lowercase {} of at most {} characters, got: {:?}",
            label, max, s
        ));
    }
    Ok(())
}

/// Label and annotation keys: `[prefix/]name`
fn check_qualified_key(key: &str) -> Result<(), String> {
    let (prefix, name) = match key.rsplit_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix
        && (prefix.is_empty() || prefix.len() > DNS_SUBDOMAIN_MAX || !DNS_SUBDOMAIN.is_match(prefix))
    {
        return Err(format!(
            "key {:?} has an invalid prefix: must be a lowercase RFC 1123 subdomain",
            key
        ));
    }

    if name.is_empty() || name.len() > QUALIFIED_NAME_MAX || !QUALIFIED_NAME.is_match(name) {
        return Err(format!(
            "key {:?} must have a name part of at most {} characters, starting and ending \
             with an alphanumeric character",
            key, QUALIFIED_NAME_MAX
        ));
    }

    Ok(())
}
