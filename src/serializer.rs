//! Serialization of the assembled document to YAML or JSON text, and writing it to disk.
//!
//! All maps in the document are ordered, so serializing the same document twice yields
//! byte-identical output.

use crate::config::OutputFormat;
use crate::error;
use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes the document to YAML.
pub fn serialize_yaml(doc: &OpenApiDocument) -> error::Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes the document to pretty-printed JSON.
///
/// A trailing newline is appended so the written file ends like the YAML one does.
pub fn serialize_json(doc: &OpenApiDocument) -> error::Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    let mut json = serde_json::to_string_pretty(doc)?;
    json.push('\n');
    Ok(json)
}

pub fn serialize(doc: &OpenApiDocument, format: OutputFormat) -> error::Result<String> {
    match format {
        OutputFormat::Yaml => serialize_yaml(doc),
        OutputFormat::Json => serialize_json(doc),
    }
}

/// Writes `content` to `path`, creating missing parent directories and overwriting any
/// existing file.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::operation::{HttpMethod, Operation};
    use crate::builders::path::PathItem;
    use crate::builders::schema::Schema;
    use crate::builders::server::Server;
    use crate::directive::{Reference, Section};
    use crate::openapi_builder::{Components, Info};
    use crate::type_mapper::PrimitiveType;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn create_test_document() -> OpenApiDocument {
        OpenApiDocument {
            openapi: "3.0.3".to_string(),
            info: Info {
                title: "Test API".to_string(),
                version: "1.0.0".to_string(),
                description: Some("A test API".to_string()),
                ..Info::default()
            },
            servers: Vec::new(),
            paths: BTreeMap::new(),
            components: None,
        }
    }

    fn create_complex_document() -> OpenApiDocument {
        let mut doc = create_test_document();
        doc.servers.push(Server {
            url: "https://api.example.com".to_string(),
            ..Server::default()
        });

        let mut item = PathItem::default();
        item.set_operation(
            HttpMethod::Get,
            Operation {
                summary: Some("List users".to_string()),
                responses: BTreeMap::from([(
                    "200".to_string(),
                    Reference::new(Section::Responses, "UserList"),
                )]),
                ..Operation::default()
            },
        );
        doc.paths.insert("/users".to_string(), item);

        let mut user = Schema::of_type(PrimitiveType::Object);
        user.properties
            .insert("name".to_string(), Schema::of_type(PrimitiveType::String));
        user.properties.insert("id".to_string(), Schema::of_type(PrimitiveType::Integer));
        doc.components = Some(Components {
            schemas: BTreeMap::from([("User".to_string(), user)]),
            ..Components::default()
        });
        doc
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("openapi: 3.0.3"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("description: A test API"));
        assert!(yaml.contains("paths: {}"));
        assert!(!yaml.contains("servers"));
        assert!(!yaml.contains("components"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_document()).unwrap();

        assert!(json.ends_with("}\n"));
        assert!(json.lines().count() > 5, "JSON should be pretty printed");

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["openapi"], "3.0.3");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert!(parsed.get("components").is_none());
    }

    #[test]
    fn test_serialize_complex_document() {
        let doc = create_complex_document();

        let json: serde_json::Value =
            serde_json::from_str(&serialize(&doc, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(
            json["paths"]["/users"]["get"]["responses"]["200"]["$ref"],
            "#/components/responses/UserList"
        );
        assert_eq!(json["servers"][0]["url"], "https://api.example.com");
        assert_eq!(json["components"]["schemas"]["User"]["type"], "object");

        let yaml = serialize(&doc, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("#/components/responses/UserList"));
        // ordered maps: "id" before "name"
        let id = yaml.find("id:").unwrap();
        let name = yaml.find("name:").unwrap();
        assert!(id < name);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let first = create_complex_document();
        let second = create_complex_document();

        for format in [OutputFormat::Yaml, OutputFormat::Json] {
            assert_eq!(
                serialize(&first, format).unwrap(),
                serialize(&second, format).unwrap()
            );
        }
    }

    #[test]
    fn test_roundtrip_yaml_serialization() {
        let doc = create_complex_document();
        let yaml = serialize_yaml(&doc).unwrap();

        let deserialized: OpenApiDocument = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(deserialized, doc);
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("swagger.yaml");

        write_to_file("test content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "test content");
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs").join("api").join("swagger.json");

        write_to_file("{}", &file_path).unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("swagger.yaml");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }
}
