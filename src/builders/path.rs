//! `@@path` directives: the `paths` map of the document.

use super::operation::{HttpMethod, Operation, OperationBuild};
use super::server::{Server, ServerBuild};
use crate::directive::{parse_references, DirectiveRecord, Reference, Section};
use crate::warnings::Warnings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Path item object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) {
        *self.slot_mut(method) = Some(operation);
    }

    /// Operations present on this path, in method order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, slot)| slot.as_ref().map(|op| (method, op)))
    }
}

/// Pairs every `@@path` record with the operation build and scoped servers of the same
/// identifier. Operation builds without a path are reported and left out.
pub fn build_paths(
    records: &[DirectiveRecord],
    operations: &BTreeMap<String, OperationBuild>,
    servers: &ServerBuild,
    warnings: &mut Warnings,
) -> BTreeMap<String, PathItem> {
    let mut paths = BTreeMap::new();

    for record in records {
        debug!("Building path: {}", record.identifier);
        let mut item = PathItem::default();

        for (key, field) in record.fields() {
            match key {
                "summary" => item.summary = Some(field.value.clone()),
                "description" => item.description = Some(field.value.clone()),
                "parameters.ref" => {
                    item.parameters = parse_references(&field.value, Section::Parameters);
                }
                _ => record.warn_invalid_name(field, warnings),
            }
        }

        if let Some(build) = operations.get(&record.identifier) {
            for (method, operation) in &build.operations {
                item.set_operation(*method, operation.clone());
            }
        }
        item.servers = servers.scoped(&record.identifier);

        paths.insert(record.identifier.clone(), item);
    }

    for identifier in operations.keys().filter(|id| !paths.contains_key(*id)) {
        warnings.add(format!(
            "[Warning] @@operation: no path declared for {}",
            identifier
        ));
    }

    paths
}
