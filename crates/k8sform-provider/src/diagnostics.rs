//! Terraform-style diagnostics
//!
//! Operations never abort the host: every problem is reported as a
//! diagnostic with a short summary, a detail carrying the underlying error
//! text and, when known, the attribute it concerns.

use serde::Serialize;
use std::fmt;

use k8sform_schema::{AttributePath, Violation};

use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, path: impl Into<AttributePath>) -> Self {
        self.attribute = Some(path.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        if let Some(path) = &self.attribute {
            write!(f, " (at {})", path)?;
        }
        if !self.detail.is_empty() {
            write!(f, "\n  {}", self.detail)?;
        }
        Ok(())
    }
}

impl From<Violation> for Diagnostic {
    fn from(v: Violation) -> Self {
        Diagnostic::error(v.summary, v.detail).with_attribute(v.path)
    }
}

/// An ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection holding exactly one error
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self(vec![Diagnostic::error(summary, detail)])
    }

    /// Wrap a provider error under an operation-specific summary
    pub fn from_error(summary: impl Into<String>, error: &ProviderError) -> Self {
        Self::error(summary, error.to_string())
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// `Err(self)` when any error is present
    pub fn into_result(self) -> std::result::Result<(), Diagnostics> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }
}

impl From<Vec<Violation>> for Diagnostics {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations.into_iter().map(Diagnostic::from).collect())
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_error() {
        let diags = Diagnostics::error("Unable to read VerticalPodAutoscaler", "connection refused");
        assert_eq!(diags.len(), 1);
        assert!(diags.has_errors());
        assert_eq!(
            diags.to_string(),
            "Error: Unable to read VerticalPodAutoscaler\n  connection refused"
        );
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::warning("Deprecated version", "use v2"));
        assert!(!diags.has_errors());
        assert!(diags.clone().into_result().is_ok());

        diags.push(Diagnostic::error("Broken", ""));
        assert!(diags.into_result().is_err());
    }

    #[test]
    fn test_from_violation_keeps_path() {
        let violation = k8sform_schema::validate_object(
            &[k8sform_schema::Attribute::required(
                "name",
                k8sform_schema::AttributeKind::String,
            )],
            &serde_json::json!({}),
        )
        .remove(0);

        let diag = Diagnostic::from(violation);
        assert_eq!(diag.summary, "Missing required argument");
        assert_eq!(diag.attribute.map(|p| p.to_string()).as_deref(), Some("name"));
    }
}
