//! `@@schema` and `@@struct` directives: the `components.schemas` section.
//!
//! Struct declarations selected by `@@struct` produce a base schema; a `@@schema` directive with
//! the same identifier then overrides it field by field.

use crate::config::FieldCase;
use crate::directive::{split_list, DirectiveField, DirectiveRecord, Reference, Section};
use crate::type_mapper::{MappedType, PrimitiveType, TypeMapper};
use crate::type_resolver::StructDescriptor;
use crate::warnings::Warnings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema object. Also used for properties and array items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Reference to another schema
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<PrimitiveType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Schema {
    /// A schema that only points at `#/components/schemas/<name>`.
    pub fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(Reference::new(Section::Schemas, name).reference),
            ..Self::default()
        }
    }

    pub fn of_type(schema_type: PrimitiveType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn from_mapped(mapped: &MappedType) -> Self {
        match mapped {
            MappedType::Reference(reference) => Self {
                reference: Some(reference.reference.clone()),
                ..Self::default()
            },
            MappedType::Primitive {
                primitive,
                format,
                items,
            } => Self {
                schema_type: Some(*primitive),
                format: format.map(str::to_string),
                items: items.as_deref().map(|i| Box::new(Self::from_mapped(i))),
                ..Self::default()
            },
        }
    }

    /// Sets `$ref`, dropping any type information it replaces.
    fn set_reference(&mut self, name: &str) {
        self.reference = Schema::reference_to(name).reference;
        self.schema_type = None;
        self.format = None;
        self.items = None;
    }

    /// Sets `type`, dropping a `$ref` it replaces.
    fn set_type(&mut self, schema_type: PrimitiveType) {
        self.schema_type = Some(schema_type);
        self.reference = None;
    }

    fn items_mut(&mut self) -> &mut Schema {
        self.items.get_or_insert_with(Box::default)
    }
}

/// Derives one object schema per struct descriptor.
///
/// Property names follow serde `rename`, then the struct's `rename_all`, then `field_case`.
/// Non-exported and skipped fields are left out; fields not wrapped in `Option` are required.
pub fn build_struct_schemas(
    descriptors: &BTreeMap<String, StructDescriptor>,
    struct_records: &[DirectiveRecord],
    mapper: &TypeMapper,
    field_case: FieldCase,
    warnings: &mut Warnings,
) -> BTreeMap<String, Schema> {
    let mut schemas = BTreeMap::new();

    for (name, descriptor) in descriptors {
        debug!("Generating struct schema for: {}", name);
        let case = descriptor.rename_all.unwrap_or(field_case);
        let mut schema = Schema::of_type(PrimitiveType::Object);

        for field in &descriptor.fields {
            if !field.exported || field.serde_attrs.skip {
                continue;
            }
            let property_name = field
                .serde_attrs
                .rename
                .clone()
                .unwrap_or_else(|| case.convert(&field.name));

            let mapped = mapper.map(&field.type_info);
            schema
                .properties
                .insert(property_name.clone(), Schema::from_mapped(&mapped));
            if !field.type_info.is_option() {
                schema.required.push(property_name);
            }
        }

        schemas.insert(name.clone(), schema);
    }

    for record in struct_records {
        for (key, field) in record.fields() {
            match key {
                "description" => {
                    if let Some(schema) = schemas.get_mut(&record.identifier) {
                        schema.description = Some(field.value.clone());
                    }
                }
                _ => record.warn_invalid_name(field, warnings),
            }
        }
    }

    schemas
}

/// Applies `@@schema` records on top of `schemas` (usually the struct-derived ones).
pub fn build_schemas(
    records: &[DirectiveRecord],
    mut schemas: BTreeMap<String, Schema>,
    warnings: &mut Warnings,
) -> BTreeMap<String, Schema> {
    for record in records {
        debug!("Building schema: {}", record.identifier);
        let schema = schemas.entry(record.identifier.clone()).or_default();
        // the block-level list first, so `properties.<p>.required` flags adjust it
        if let Some(required) = record.get("required") {
            schema.required = split_list(required);
        }

        for (key, field) in record.fields() {
            if key == "required" {
                continue;
            }
            if let Some(rest) = key.strip_prefix("properties.") {
                let (property, attribute) = match rest.split_once('.') {
                    Some((property, attribute)) => (property, attribute),
                    None => (rest, "type"),
                };
                if property.is_empty() {
                    record.warn_invalid_name(field, warnings);
                    continue;
                }
                if attribute == "required" {
                    apply_property_required(schema, property, record, key, field, warnings);
                    continue;
                }
                let known = schema.properties.contains_key(property);
                let mut node = schema.properties.get(property).cloned().unwrap_or_default();
                if !apply_attribute(&mut node, attribute, record, key, field, warnings) {
                    record.warn_invalid_name(field, warnings);
                    continue;
                }
                if known || node != Schema::default() {
                    schema.properties.insert(property.to_string(), node);
                }
                continue;
            }
            if !apply_attribute(schema, key, record, key, field, warnings) {
                record.warn_invalid_name(field, warnings);
            }
        }
    }

    schemas
}

/// Sets one schema attribute. Returns `false` when `attribute` is not a schema attribute.
fn apply_attribute(
    node: &mut Schema,
    attribute: &str,
    record: &DirectiveRecord,
    key: &str,
    field: &DirectiveField,
    warnings: &mut Warnings,
) -> bool {
    match attribute {
        "type" => match PrimitiveType::parse(&field.value) {
            Some(t) => node.set_type(t),
            None => record.warn_invalid_value(key, field, warnings),
        },
        "format" => node.format = Some(field.value.clone()),
        "description" => node.description = Some(field.value.clone()),
        "example" => node.example = Some(field.value.clone()),
        "ref" => {
            if let Some(name) = record.single_name(field, warnings) {
                node.set_reference(&name);
            }
        }
        "items.type" => match PrimitiveType::parse(&field.value) {
            Some(t) => {
                node.set_type(PrimitiveType::Array);
                node.items_mut().set_type(t);
            }
            None => record.warn_invalid_value(key, field, warnings),
        },
        "items.format" => node.items_mut().format = Some(field.value.clone()),
        "items.ref" => {
            if let Some(name) = record.single_name(field, warnings) {
                node.set_type(PrimitiveType::Array);
                node.items_mut().set_reference(&name);
            }
        }
        _ => return false,
    }
    true
}

fn apply_property_required(
    schema: &mut Schema,
    property: &str,
    record: &DirectiveRecord,
    key: &str,
    field: &DirectiveField,
    warnings: &mut Warnings,
) {
    let Some(required) = crate::directive::parse_bool(&field.value) else {
        record.warn_invalid_value(key, field, warnings);
        return;
    };
    schema.properties.entry(property.to_string()).or_default();
    let listed = schema.required.iter().any(|r| r == property);
    if required && !listed {
        schema.required.push(property.to_string());
    } else if !required && listed {
        schema.required.retain(|r| r != property);
    }
}
