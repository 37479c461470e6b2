//! Schema command - show the attributes of a type, or every schema

use super::{GlobalOptions, TypeHandle};
use crate::display;
use crate::error::Result;
use k8sform_provider::{DataSource, Resource, schema::provider_schema};

pub fn run(options: &GlobalOptions, type_name: Option<&str>, json: bool) -> Result<()> {
    let provider = options.offline_provider()?;

    let Some(type_name) = type_name else {
        if json {
            println!("{}", serde_json::to_string_pretty(&provider.schema())?);
        } else {
            display::print_schema("provider \"k8s\"", &provider_schema());
        }
        return Ok(());
    };

    let (title, schema) = match TypeHandle::resolve(&provider, type_name)? {
        TypeHandle::Resource(resource) => (
            format!("resource \"{}\"", resource.type_name()),
            resource.schema().clone(),
        ),
        TypeHandle::DataSource(data_source) => (
            format!("data \"{}\"", data_source.type_name()),
            data_source.schema().clone(),
        ),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        display::print_schema(&title, &schema);
    }
    Ok(())
}
