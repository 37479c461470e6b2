//! Example configuration files for every catalog entry
//!
//! Layout, relative to the output directory:
//! - `resources/<type>/resource.tf`
//! - `data-sources/<type>_manifest/data-source.tf`
//!
//! Each snippet sets the metadata identity and every required body field,
//! using placeholder values that pass the attribute validators.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use k8sform_schema::{Attribute, AttributeKind, Validator};

use crate::catalog::{Catalog, CrdDefinition};
use crate::error::Result;

pub const RESOURCES_DIR: &str = "resources";
pub const DATA_SOURCES_DIR: &str = "data-sources";
pub const RESOURCE_FILE: &str = "resource.tf";
pub const DATA_SOURCE_FILE: &str = "data-source.tf";

/// A generated example file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleFile {
    /// Path relative to the examples directory
    pub path: PathBuf,
    pub contents: String,
}

/// Example files for every catalog entry
pub fn generate_examples(catalog: &Catalog) -> Vec<ExampleFile> {
    catalog
        .iter()
        .flat_map(|definition| {
            [
                ExampleFile {
                    path: resource_example_path(definition),
                    contents: resource_example(definition),
                },
                ExampleFile {
                    path: data_source_example_path(definition),
                    contents: data_source_example(definition),
                },
            ]
        })
        .collect()
}

/// Write every example below `dir`, returning the written paths
pub fn write_examples(catalog: &Catalog, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for file in generate_examples(catalog) {
        let path = dir.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &file.contents)?;
        tracing::debug!(path = %path.display(), "wrote example");
        written.push(path);
    }
    Ok(written)
}

/// Expected example files that do not exist below `dir`
pub fn missing_examples(catalog: &Catalog, dir: &Path) -> Vec<PathBuf> {
    catalog
        .iter()
        .flat_map(|d| [resource_example_path(d), data_source_example_path(d)])
        .filter(|path| !dir.join(path).is_file())
        .collect()
}

pub fn resource_example_path(definition: &CrdDefinition) -> PathBuf {
    Path::new(RESOURCES_DIR)
        .join(&definition.type_name)
        .join(RESOURCE_FILE)
}

pub fn data_source_example_path(definition: &CrdDefinition) -> PathBuf {
    Path::new(DATA_SOURCES_DIR)
        .join(definition.data_source_name())
        .join(DATA_SOURCE_FILE)
}

pub fn resource_example(definition: &CrdDefinition) -> String {
    render_block("resource", &definition.type_name, &example_body(definition))
}

pub fn data_source_example(definition: &CrdDefinition) -> String {
    render_block("data", &definition.data_source_name(), &example_body(definition))
}

/// HCL value tree
#[derive(Debug, Clone, PartialEq)]
enum Hcl {
    Literal(String),
    Object(Vec<(String, Hcl)>),
    Tuple(Vec<Hcl>),
}

impl Hcl {
    fn string(s: &str) -> Self {
        Hcl::Literal(format!("{:?}", s))
    }

    fn is_inline(&self) -> bool {
        match self {
            Hcl::Literal(_) => true,
            Hcl::Object(entries) => entries.is_empty(),
            Hcl::Tuple(items) => items.iter().all(Hcl::is_inline),
        }
    }

    fn inline(&self) -> String {
        match self {
            Hcl::Literal(s) => s.clone(),
            Hcl::Object(_) => "{}".to_string(),
            Hcl::Tuple(items) => format!(
                "[{}]",
                items.iter().map(Hcl::inline).collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

fn example_body(definition: &CrdDefinition) -> Vec<(String, Hcl)> {
    let mut metadata = vec![("name".to_string(), Hcl::string("some-name"))];
    if definition.is_namespaced() {
        metadata.push(("namespace".to_string(), Hcl::string("some-namespace")));
    }

    let mut body = vec![("metadata".to_string(), Hcl::Object(metadata))];
    body.extend(
        definition
            .body
            .iter()
            .map(|attribute| (attribute.name.clone(), placeholder(attribute))),
    );
    body
}

fn placeholder(attribute: &Attribute) -> Hcl {
    match &attribute.kind {
        AttributeKind::Object(children) => Hcl::Object(
            children
                .iter()
                .filter(|c| c.mode.is_required())
                .map(|c| (c.name.clone(), placeholder(c)))
                .collect(),
        ),
        AttributeKind::List(item) => {
            let element = Attribute::required(attribute.name.clone(), (**item).clone());
            Hcl::Tuple(vec![placeholder(&element)])
        }
        AttributeKind::Map(_) => Hcl::Object(Vec::new()),
        AttributeKind::String => {
            let allowed = attribute.validators.iter().find_map(|v| match v {
                Validator::OneOf { values } => values.iter().find(|s| !s.is_empty()),
                _ => None,
            });
            match allowed {
                Some(value) => Hcl::string(value),
                None => Hcl::string(&format!("some-{}", attribute.name.replace('_', "-"))),
            }
        }
        AttributeKind::Int64 => {
            let min = attribute.validators.iter().find_map(|v| match v {
                Validator::IntRange { min, .. } => *min,
                _ => None,
            });
            Hcl::Literal(min.unwrap_or(1).max(1).to_string())
        }
        AttributeKind::Float64 => Hcl::Literal("1.0".to_string()),
        AttributeKind::Bool => Hcl::Literal("false".to_string()),
        AttributeKind::Dynamic => Hcl::string(&format!("some-{}", attribute.name.replace('_', "-"))),
    }
}

fn render_block(keyword: &str, type_name: &str, body: &[(String, Hcl)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {:?} {:?} {{", keyword, type_name, "example");
    render_entries(body, 1, &mut out);
    out.push_str("}\n");
    out
}

/// Consecutive single-line entries get their `=` aligned, like `terraform fmt`
fn render_entries(entries: &[(String, Hcl)], depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    let mut i = 0;

    while i < entries.len() {
        let end = entries[i..]
            .iter()
            .position(|(_, v)| !v.is_inline())
            .map_or(entries.len(), |p| i + p);

        if end > i {
            let width = entries[i..end].iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            for (key, value) in &entries[i..end] {
                let _ = writeln!(out, "{}{:<width$} = {}", pad, key, value.inline(), width = width);
            }
            i = end;
            continue;
        }

        let (key, value) = &entries[i];
        let _ = write!(out, "{}{} = ", pad, key);
        render_multiline(value, depth, out);
        i += 1;
    }
}

fn render_multiline(value: &Hcl, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match value {
        Hcl::Object(entries) => {
            out.push_str("{\n");
            render_entries(entries, depth + 1, out);
            let _ = writeln!(out, "{}}}", pad);
        }
        Hcl::Tuple(items) => {
            out.push_str("[\n");
            let inner = "  ".repeat(depth + 1);
            for item in items {
                out.push_str(&inner);
                if item.is_inline() {
                    let _ = writeln!(out, "{},", item.inline());
                } else {
                    // objects close with "}\n"; the element separator goes after it
                    let mut nested = String::new();
                    render_multiline(item, depth + 1, &mut nested);
                    out.push_str(nested.trim_end());
                    out.push_str(",\n");
                }
            }
            let _ = writeln!(out, "{}]", pad);
        }
        Hcl::Literal(s) => {
            let _ = writeln!(out, "{}", s);
        }
    }
}
