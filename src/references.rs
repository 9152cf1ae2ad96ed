//! Reference checking for an assembled document.
//!
//! Builders never check a `$ref` against its target. This module walks the finished document
//! and lists every reference whose target is missing from `components`.

use crate::builders::operation::Operation;
use crate::builders::schema::Schema;
use crate::builders::MediaType;
use crate::directive::{Reference, Section};
use crate::error::{Error, Result};
use crate::openapi_builder::{Components, OpenApiDocument};
use log::debug;
use std::collections::BTreeMap;

/// Returns `<location> -> <$ref>` for every reference without a target, in document order.
pub fn find_dangling_references(doc: &OpenApiDocument) -> Vec<String> {
    let empty = Components::default();
    let mut walker = Walker {
        components: doc.components.as_ref().unwrap_or(&empty),
        dangling: Vec::new(),
    };

    let components = walker.components;
    for (name, schema) in &components.schemas {
        walker.schema(&format!("components.schemas.{}", name), schema);
    }
    for (name, parameter) in &components.parameters {
        if let Some(schema) = &parameter.schema {
            walker.schema(&format!("components.parameters.{}.schema", name), schema);
        }
    }
    for (name, body) in &components.request_bodies {
        walker.content(&format!("components.requestBodies.{}", name), &body.content);
    }
    for (name, response) in &components.responses {
        walker.content(&format!("components.responses.{}", name), &response.content);
    }

    for (path, item) in &doc.paths {
        walker.references(&format!("paths.{}.parameters", path), &item.parameters);
        for (method, operation) in item.operations() {
            walker.operation(&format!("paths.{}.{}", path, method), operation);
        }
    }

    debug!("Found {} dangling references", walker.dangling.len());
    walker.dangling
}

/// Fails with [`Error::DanglingReferences`] when any reference has no target.
pub fn check_references(doc: &OpenApiDocument) -> Result<()> {
    let dangling = find_dangling_references(doc);
    if dangling.is_empty() {
        Ok(())
    } else {
        Err(Error::DanglingReferences(dangling))
    }
}

struct Walker<'a> {
    components: &'a Components,
    dangling: Vec<String>,
}

impl Walker<'_> {
    fn resolves(&self, reference: &Reference) -> bool {
        match reference.target() {
            Some((Section::Schemas, name)) => self.components.schemas.contains_key(name),
            Some((Section::Parameters, name)) => self.components.parameters.contains_key(name),
            Some((Section::Responses, name)) => self.components.responses.contains_key(name),
            Some((Section::RequestBodies, name)) => {
                self.components.request_bodies.contains_key(name)
            }
            None => false,
        }
    }

    fn reference(&mut self, location: &str, reference: &Reference) {
        if !self.resolves(reference) {
            self.dangling
                .push(format!("{} -> {}", location, reference.reference));
        }
    }

    fn references(&mut self, location: &str, references: &[Reference]) {
        for (i, reference) in references.iter().enumerate() {
            self.reference(&format!("{}[{}]", location, i), reference);
        }
    }

    fn schema(&mut self, location: &str, schema: &Schema) {
        if let Some(reference) = &schema.reference {
            self.reference(
                location,
                &Reference {
                    reference: reference.clone(),
                },
            );
        }
        for (name, property) in &schema.properties {
            self.schema(&format!("{}.properties.{}", location, name), property);
        }
        if let Some(items) = &schema.items {
            self.schema(&format!("{}.items", location), items);
        }
    }

    fn content(&mut self, location: &str, content: &BTreeMap<String, MediaType>) {
        for (media_type, media) in content {
            self.schema(
                &format!("{}.content.{}.schema", location, media_type),
                &media.schema,
            );
        }
    }

    fn operation(&mut self, location: &str, operation: &Operation) {
        self.references(&format!("{}.parameters", location), &operation.parameters);
        if let Some(body) = &operation.request_body {
            self.reference(&format!("{}.requestBody", location), body);
        }
        for (status, response) in &operation.responses {
            self.reference(&format!("{}.responses.{}", location, status), response);
        }
    }
}
