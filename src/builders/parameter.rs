//! `@@parameter` directives: the `components.parameters` section.

use super::schema::Schema;
use crate::directive::{parse_bool, DirectiveRecord};
use crate::type_mapper::PrimitiveType;
use crate::warnings::Warnings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

/// Parameter object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ParameterLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Builds one parameter per record. The parameter name defaults to the identifier; a `path`
/// parameter without an explicit `required` is required.
pub fn build_parameters(
    records: &[DirectiveRecord],
    warnings: &mut Warnings,
) -> BTreeMap<String, Parameter> {
    let mut parameters = BTreeMap::new();

    for record in records {
        debug!("Building parameter: {}", record.identifier);
        let mut parameter = Parameter {
            name: record.identifier.clone(),
            ..Parameter::default()
        };
        let mut explicit_required = false;

        for (key, field) in record.fields() {
            match key {
                "name" => parameter.name = field.value.clone(),
                "in" => match ParameterLocation::parse(&field.value) {
                    Some(location) => parameter.location = Some(location),
                    None => record.warn_invalid_value(key, field, warnings),
                },
                "required" | "deprecated" => match parse_bool(&field.value) {
                    Some(flag) if key == "required" => {
                        parameter.required = flag;
                        explicit_required = true;
                    }
                    Some(flag) => parameter.deprecated = flag,
                    None => record.warn_invalid_value(key, field, warnings),
                },
                "description" => parameter.description = Some(field.value.clone()),
                "schema.ref" => {
                    if let Some(name) = record.single_name(field, warnings) {
                        parameter.schema = Some(Schema::reference_to(&name));
                    }
                }
                "schema.type" => match PrimitiveType::parse(&field.value) {
                    Some(t) => {
                        let schema = parameter.schema.get_or_insert_with(Schema::default);
                        schema.reference = None;
                        schema.schema_type = Some(t);
                    }
                    None => record.warn_invalid_value(key, field, warnings),
                },
                "schema.format" => {
                    parameter
                        .schema
                        .get_or_insert_with(Schema::default)
                        .format = Some(field.value.clone());
                }
                _ => record.warn_invalid_name(field, warnings),
            }
        }

        if parameter.location == Some(ParameterLocation::Path) && !explicit_required {
            parameter.required = true;
        }

        parameters.insert(record.identifier.clone(), parameter);
    }

    parameters
}
