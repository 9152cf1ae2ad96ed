//! `@@operation` directives.
//!
//! One directive holds every method of a path. Keys are prefixed with the method they belong
//! to (`get.summary`, `delete.responses.ref`, ...); lines are grouped by that prefix before any
//! field is interpreted. `method: get;head` declares methods that have no other keys.

use super::server::{Server, ServerBuild};
use crate::directive::{
    parse_bool, parse_references, split_list, DirectiveField, DirectiveRecord, Reference, Section,
};
use crate::warnings::Warnings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// HTTP methods a path item can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId", default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Reference>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Reference>,
    /// Status code (or `default`) to response reference
    #[serde(default)]
    pub responses: BTreeMap<String, Reference>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
}

/// The operations declared by one `@@operation` directive, by method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationBuild {
    pub operations: BTreeMap<HttpMethod, Operation>,
}

impl OperationBuild {
    pub fn methods(&self) -> impl Iterator<Item = HttpMethod> + '_ {
        self.operations.keys().copied()
    }
}

/// Builds one [`OperationBuild`] per record. `servers` resolves `server.ref` names.
pub fn build_operations(
    records: &[DirectiveRecord],
    servers: &ServerBuild,
    warnings: &mut Warnings,
) -> BTreeMap<String, OperationBuild> {
    let mut builds = BTreeMap::new();

    for record in records {
        debug!("Building operations: {}", record.identifier);
        builds.insert(
            record.identifier.clone(),
            build_operation(record, servers, warnings),
        );
    }

    builds
}

fn build_operation(
    record: &DirectiveRecord,
    servers: &ServerBuild,
    warnings: &mut Warnings,
) -> OperationBuild {
    let mut grouped: BTreeMap<HttpMethod, Vec<(&str, &DirectiveField)>> = BTreeMap::new();
    let mut invalid_methods = BTreeSet::new();

    for (key, field) in record.fields() {
        if key == "method" {
            for name in split_list(&field.value) {
                match HttpMethod::parse(&name) {
                    Some(method) => {
                        grouped.entry(method).or_default();
                    }
                    None => {
                        invalid_methods.insert(name);
                    }
                }
            }
            continue;
        }

        let Some((method_name, field_key)) = key.split_once('.') else {
            record.warn_invalid_name(field, warnings);
            continue;
        };
        match HttpMethod::parse(method_name) {
            Some(method) => grouped.entry(method).or_default().push((field_key, field)),
            None => {
                invalid_methods.insert(method_name.to_string());
            }
        }
    }

    for method in &invalid_methods {
        warnings.add(format!(
            "[Warning] @@{}: invalid method: {}",
            record.kind, method
        ));
    }

    let operations = grouped
        .into_iter()
        .map(|(method, fields)| {
            let operation = parse_operation_fields(record, &fields, servers, warnings);
            (method, operation)
        })
        .collect();

    OperationBuild { operations }
}

fn parse_operation_fields(
    record: &DirectiveRecord,
    fields: &[(&str, &DirectiveField)],
    servers: &ServerBuild,
    warnings: &mut Warnings,
) -> Operation {
    let mut operation = Operation::default();

    for &(key, field) in fields {
        match key {
            "summary" => operation.summary = Some(field.value.clone()),
            "description" => operation.description = Some(field.value.clone()),
            "operationId" => operation.operation_id = Some(field.value.clone()),
            "tags" => operation.tags = split_list(&field.value),
            "deprecated" => match parse_bool(&field.value) {
                Some(deprecated) => operation.deprecated = deprecated,
                None => record.warn_invalid_value(key, field, warnings),
            },
            "parameters.ref" => {
                operation.parameters = parse_references(&field.value, Section::Parameters);
            }
            "requestBody.ref" => {
                operation.request_body = record
                    .single_name(field, warnings)
                    .map(|name| Reference::new(Section::RequestBodies, &name));
            }
            "responses.ref" => {
                operation.responses = parse_responses(record, field, warnings);
            }
            "server.ref" => {
                operation.servers = split_list(&field.value)
                    .iter()
                    .filter_map(|name| {
                        let server = servers.get(name).cloned();
                        if server.is_none() {
                            warnings.add(format!(
                                "[Warning] @@{}: unknown server {}: {}",
                                record.kind, name, field.line
                            ));
                        }
                        server
                    })
                    .collect();
            }
            _ => record.warn_invalid_name(field, warnings),
        }
    }

    operation
}

/// Parses `<status>:<response>` elements; a bare `<response>` is the `default` response.
fn parse_responses(
    record: &DirectiveRecord,
    field: &DirectiveField,
    warnings: &mut Warnings,
) -> BTreeMap<String, Reference> {
    let mut responses = BTreeMap::new();

    for element in split_list(&field.value) {
        let (status, name) = match element.split_once(':') {
            Some((status, name)) => (status.trim(), name.trim()),
            None => ("default", element.as_str()),
        };
        if !is_valid_status(status) || name.is_empty() {
            warnings.add(format!(
                "[Warning] @@{}: invalid response {}: {}",
                record.kind, element, field.line
            ));
            continue;
        }
        responses.insert(status.to_string(), Reference::new(Section::Responses, name));
    }

    responses
}

/// `default`, a three digit code, or a range such as `4XX`.
fn is_valid_status(status: &str) -> bool {
    if status == "default" {
        return true;
    }
    let bytes = status.as_bytes();
    if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
        return false;
    }
    let rest = &bytes[1..];
    rest.iter().all(u8::is_ascii_digit) || rest == b"XX"
}
