use crate::builders::operation::build_operations;
use crate::builders::parameter::{build_parameters, Parameter};
use crate::builders::path::{build_paths, PathItem};
use crate::builders::request_body::{build_request_bodies, RequestBody};
use crate::builders::response::{build_responses, Response};
use crate::builders::schema::{build_schemas, build_struct_schemas, Schema};
use crate::builders::server::{build_servers, Server};
use crate::comments::DirectiveIndex;
use crate::config::GeneratorConfig;
use crate::directive::{DirectiveKind, DirectiveRecord};
use crate::type_mapper::TypeMapper;
use crate::type_resolver::StructDescriptor;
use crate::warnings::Warnings;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document version used when the `@@openapi` identifier is not a version number.
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.3";
const DEFAULT_TITLE: &str = "Generated API";
const DEFAULT_VERSION: &str = "1.0.0";

/// Assembles the document from a [`DirectiveIndex`] and the selected struct declarations.
pub struct OpenApiBuilder {
    config: GeneratorConfig,
}

/// OpenAPI Info object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "termsOfService", default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// OpenAPI Contact object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// OpenAPI License object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, Schema>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Response>,
    #[serde(rename = "requestBodies", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request_bodies: BTreeMap<String, RequestBody>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
            && self.parameters.is_empty()
            && self.responses.is_empty()
            && self.request_bodies.is_empty()
    }
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl OpenApiBuilder {
    pub fn new(config: GeneratorConfig) -> Self {
        debug!("Initializing OpenApiBuilder with {:?}", config);
        Self { config }
    }

    /// Runs every builder in dependency order and assembles the result.
    ///
    /// `structs` holds the descriptors selected by `@@struct` directives. Nothing here fails:
    /// every problem is appended to `warnings` and the document is always produced.
    pub fn build(
        &self,
        index: &DirectiveIndex,
        structs: &BTreeMap<String, StructDescriptor>,
        warnings: &mut Warnings,
    ) -> OpenApiDocument {
        let media_type = self.config.app_output_format.media_type();

        let (openapi, info) = build_info(&index.records(DirectiveKind::OpenApi, warnings), warnings);
        let servers = build_servers(&index.records(DirectiveKind::Server, warnings), warnings);

        let mapper = TypeMapper::new(
            structs
                .keys()
                .cloned()
                .chain(index.identifiers(DirectiveKind::Schema).map(str::to_string)),
        );
        let struct_schemas = build_struct_schemas(
            structs,
            &index.records(DirectiveKind::Struct, warnings),
            &mapper,
            self.config.alt_field_format,
            warnings,
        );
        let schemas = build_schemas(
            &index.records(DirectiveKind::Schema, warnings),
            struct_schemas,
            warnings,
        );
        let parameters =
            build_parameters(&index.records(DirectiveKind::Parameter, warnings), warnings);
        let request_bodies = build_request_bodies(
            &index.records(DirectiveKind::RequestBody, warnings),
            media_type,
            warnings,
        );
        let responses = build_responses(
            &index.records(DirectiveKind::Response, warnings),
            media_type,
            warnings,
        );

        let operations = build_operations(
            &index.records(DirectiveKind::Operation, warnings),
            &servers,
            warnings,
        );
        let paths = build_paths(
            &index.records(DirectiveKind::Path, warnings),
            &operations,
            &servers,
            warnings,
        );

        let components = Components {
            schemas,
            parameters,
            responses,
            request_bodies,
        };
        info!(
            "Assembled document: {} paths, {} schemas, {} parameters, {} responses, {} request bodies",
            paths.len(),
            components.schemas.len(),
            components.parameters.len(),
            components.responses.len(),
            components.request_bodies.len()
        );

        OpenApiDocument {
            openapi,
            info,
            servers: servers.root(),
            paths,
            components: (!components.is_empty()).then_some(components),
        }
    }
}

/// Returns the document version and the info object. Several records are merged in
/// identifier order, later keys overriding earlier ones.
fn build_info(records: &[DirectiveRecord], warnings: &mut Warnings) -> (String, Info) {
    let mut info = Info {
        title: DEFAULT_TITLE.to_string(),
        version: DEFAULT_VERSION.to_string(),
        ..Info::default()
    };
    let mut openapi = DEFAULT_OPENAPI_VERSION.to_string();

    match records {
        [] => {
            warnings.add(format!(
                "[Warning] @@openapi: no directive found, using title {} and version {}",
                DEFAULT_TITLE, DEFAULT_VERSION
            ));
            return (openapi, info);
        }
        [_] => {}
        _ => warnings.add(format!(
            "[Warning] @@openapi: {} directives found, merging them",
            records.len()
        )),
    }

    for record in records {
        debug!("Building info: {}", record.identifier);
        if record.identifier.starts_with(|c: char| c.is_ascii_digit()) {
            openapi = record.identifier.clone();
        }

        for (key, field) in record.fields() {
            let value = field.value.clone();
            match key {
                "title" => info.title = value,
                "version" => info.version = value,
                "description" => info.description = Some(value),
                "termsOfService" => info.terms_of_service = Some(value),
                "contact.name" => info.contact.get_or_insert_with(Contact::default).name = Some(value),
                "contact.url" => info.contact.get_or_insert_with(Contact::default).url = Some(value),
                "contact.email" => {
                    info.contact.get_or_insert_with(Contact::default).email = Some(value)
                }
                "license.name" => info.license.get_or_insert_with(License::default).name = value,
                "license.url" => info.license.get_or_insert_with(License::default).url = Some(value),
                _ => record.warn_invalid_name(field, warnings),
            }
        }
    }

    if info.license.as_ref().is_some_and(|l| l.name.is_empty()) {
        warnings.add("[Warning] @@openapi: license has no name");
    }

    (openapi, info)
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
