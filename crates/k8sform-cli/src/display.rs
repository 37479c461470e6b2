//! Display formatting for CLI output
//!
//! - Diagnostics grouped by severity, with attribute paths
//! - Attribute trees for `schema`
//! - Line diffs of object YAML for `plan`

use console::style;
use similar::{ChangeTag, TextDiff};

use k8sform_provider::{Diagnostics, Severity};
use k8sform_schema::{Attribute, AttributeKind, AttributeMode, Schema, Validator};

/// Print diagnostics to stderr, errors first
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    let mut ordered: Vec<_> = diagnostics.iter().collect();
    ordered.sort_by_key(|d| d.severity != Severity::Error);

    for diagnostic in ordered {
        let icon = match diagnostic.severity {
            Severity::Error => style("✗").red(),
            Severity::Warning => style("⚠").yellow(),
        };
        let location = diagnostic
            .attribute
            .as_ref()
            .map(|path| format!(" at {}", style(path).dim()))
            .unwrap_or_default();

        eprintln!("{} {}{}", icon, style(&diagnostic.summary).bold(), location);
        if !diagnostic.detail.is_empty() {
            for line in diagnostic.detail.lines() {
                eprintln!("    {}", line);
            }
        }
    }
}

/// Print an attribute tree
pub fn print_schema(title: &str, schema: &Schema) {
    println!("{}", style(title).bold().underlined());
    if let Some(description) = &schema.description {
        println!("  {}", style(description).dim());
    }
    println!();
    for line in schema_lines(&schema.attributes, 1) {
        println!("{}", line);
    }
}

fn schema_lines(attributes: &[Attribute], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for attribute in attributes {
        let indent = "  ".repeat(depth);
        let mut line = format!(
            "{}{} ({}, {})",
            indent,
            attribute.name,
            attribute.kind.type_label(),
            mode_label(attribute.mode)
        );
        if let Some(values) = attribute.validators.iter().find_map(|v| match v {
            Validator::OneOf { values } => Some(values),
            _ => None,
        }) {
            line.push_str(&format!(" one of: {}", values.join(", ")));
        }
        lines.push(line);

        let nested = match &attribute.kind {
            AttributeKind::Object(children) => Some(children.as_slice()),
            AttributeKind::List(item) | AttributeKind::Map(item) => item.attributes(),
            _ => None,
        };
        if let Some(children) = nested {
            lines.extend(schema_lines(children, depth + 1));
        }
    }
    lines
}

fn mode_label(mode: AttributeMode) -> &'static str {
    match mode {
        AttributeMode::Required => "required",
        AttributeMode::Optional => "optional",
        AttributeMode::Computed => "computed",
        AttributeMode::OptionalComputed => "optional, computed",
    }
}

/// Diff lines between two YAML documents; `None` when they are equal
pub fn yaml_diff(old: &str, new: &str) -> Option<Vec<(ChangeTag, String)>> {
    if old == new {
        return None;
    }
    let diff = TextDiff::from_lines(old, new);
    Some(
        diff.iter_all_changes()
            .map(|change| (change.tag(), change.value().trim_end().to_string()))
            .collect(),
    )
}

pub fn print_diff(old: &str, new: &str) {
    let Some(lines) = yaml_diff(old, new) else {
        println!("  {}", style("No changes").dim());
        return;
    };
    for (tag, line) in lines {
        match tag {
            ChangeTag::Delete => println!("{}", style(format!("- {}", line)).red()),
            ChangeTag::Insert => println!("{}", style(format!("+ {}", line)).green()),
            ChangeTag::Equal => println!("  {}", line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_diff() {
        assert!(yaml_diff("a: 1\n", "a: 1\n").is_none());

        let lines = yaml_diff("a: 1\nb: 2\n", "a: 1\nb: 3\n").unwrap();
        assert_eq!(
            lines,
            vec![
                (ChangeTag::Equal, "a: 1".to_string()),
                (ChangeTag::Delete, "b: 2".to_string()),
                (ChangeTag::Insert, "b: 3".to_string()),
            ]
        );
    }

    #[test]
    fn test_schema_lines() {
        let attributes = vec![
            Attribute::required(
                "update_policy",
                AttributeKind::Object(vec![
                    Attribute::optional("update_mode", AttributeKind::String)
                        .with_validator(Validator::one_of(["Off", "Auto"])),
                ]),
            ),
            Attribute::computed("id", AttributeKind::String),
        ];
        assert_eq!(
            schema_lines(&attributes, 0),
            vec![
                "update_policy (object, required)",
                "  update_mode (string, optional) one of: Off, Auto",
                "id (string, computed)",
            ]
        );
    }
}
