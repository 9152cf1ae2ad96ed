use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use swagify::{
    builders::operation::HttpMethod,
    cli::{generate, run, CliArgs},
    config::{FieldCase, GeneratorConfig},
    error::Error,
    openapi_builder::OpenApiDocument,
    references::find_dangling_references,
};
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn petstore_project() -> TempDir {
    create_test_project(vec![
        ("src/api.rs", include_str!("fixtures/petstore_api.rs")),
        ("src/models.rs", include_str!("fixtures/petstore_models.rs")),
    ])
}

fn run_cli(args: &[&str]) -> anyhow::Result<()> {
    let args = CliArgs::try_parse_from(std::iter::once("swagify").chain(args.iter().copied()))?;
    run(args)
}

#[test]
fn test_petstore_document() {
    let project = petstore_project();

    let generation = generate(project.path(), GeneratorConfig::default()).unwrap();

    assert!(
        generation.warnings.is_empty(),
        "unexpected warnings: {:?}",
        generation.warnings
    );
    assert_eq!(generation.stats.files_scanned, 2);
    assert_eq!(generation.stats.structs, 3);

    let doc = &generation.document;
    assert_eq!(doc.openapi, "3.0.3");
    assert_eq!(doc.info.title, "Pet Store");
    assert_eq!(doc.info.version, "1.2.0");
    assert_eq!(
        doc.info.license.as_ref().and_then(|l| l.url.as_deref()),
        Some("https://www.apache.org/licenses/LICENSE-2.0")
    );

    // only the production server is scoped to the document root
    assert_eq!(doc.servers.len(), 1);
    assert_eq!(doc.servers[0].variables["region"].enum_values, vec!["eu", "us"]);

    assert_eq!(
        doc.paths.keys().collect::<Vec<_>>(),
        vec!["/pets", "/pets/{petId}", "/pets/{petId}/photo"]
    );
    let methods = |path: &str| -> Vec<HttpMethod> {
        doc.paths[path].operations().map(|(m, _)| m).collect()
    };
    assert_eq!(methods("/pets"), vec![HttpMethod::Get, HttpMethod::Post]);
    assert_eq!(methods("/pets/{petId}"), vec![HttpMethod::Get, HttpMethod::Delete]);
    assert_eq!(methods("/pets/{petId}/photo"), vec![HttpMethod::Put]);

    let photo = &doc.paths["/pets/{petId}/photo"];
    assert_eq!(photo.servers.len(), 1);
    assert_eq!(photo.servers[0].url, "https://uploads.petstore.example.com");

    let add_pet = doc.paths["/pets"].post.as_ref().unwrap();
    assert_eq!(add_pet.servers.len(), 1);
    assert_eq!(add_pet.servers[0].url, "https://sandbox.petstore.example.com");

    assert!(find_dangling_references(doc).is_empty());
}

#[test]
fn test_struct_schemas() {
    let project = petstore_project();

    let generation = generate(project.path(), GeneratorConfig::default()).unwrap();
    let json = serde_json::to_value(&generation.document).unwrap();
    let schemas = &json["components"]["schemas"];

    assert_eq!(
        schemas["Pet"],
        json!({
            "type": "object",
            "description": "A pet in the store",
            "properties": {
                "name": { "type": "string" },
                "ownerRef": { "type": "string", "format": "uuid" },
                "pet_id": { "type": "integer", "format": "int64" },
                "photo_urls": { "type": "array", "items": { "type": "string" } },
                "tag": { "type": "string" }
            },
            "required": ["pet_id", "name", "photo_urls"]
        })
    );
    assert_eq!(schemas["NewPet"]["required"], json!(["name", "photoUrls"]));
    assert_eq!(schemas["PetPage"]["description"], "Cursor based page");
    assert_eq!(
        schemas["PetPage"]["properties"]["items"],
        json!({
            "type": "array",
            "description": "Pets on this page",
            "items": { "$ref": "#/components/schemas/Pet" }
        })
    );
    assert_eq!(
        schemas["PetPage"]["properties"]["next_cursor"],
        json!({ "type": "string" })
    );
}

#[test]
fn test_operations_and_components() {
    let project = petstore_project();

    let generation = generate(project.path(), GeneratorConfig::default()).unwrap();
    let json = serde_json::to_value(&generation.document).unwrap();

    assert_eq!(
        json["paths"]["/pets/{petId}"]["get"],
        json!({
            "summary": "Fetch a pet",
            "operationId": "getPet",
            "responses": {
                "200": { "$ref": "#/components/responses/PetFound" },
                "404": { "$ref": "#/components/responses/NotFound" }
            }
        })
    );
    assert_eq!(
        json["paths"]["/pets/{petId}"]["delete"]["responses"]["default"],
        json!({ "$ref": "#/components/responses/NotFound" })
    );
    assert_eq!(json["paths"]["/pets/{petId}"]["delete"]["deprecated"], true);
    assert_eq!(json["paths"]["/pets/{petId}/photo"]["put"], json!({ "responses": {} }));

    let components = &json["components"];
    assert_eq!(
        components["parameters"]["petId"],
        json!({
            "name": "petId",
            "in": "path",
            "description": "Identifier of the pet",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        })
    );
    assert_eq!(components["parameters"]["limit"]["name"], "limit");
    assert!(components["parameters"]["limit"].get("required").is_none());
    assert_eq!(
        components["requestBodies"]["NewPet"]["content"]["application/json"]["schema"],
        json!({ "$ref": "#/components/schemas/NewPet" })
    );
    assert_eq!(
        components["responses"]["NotFound"],
        json!({ "description": "No such pet" })
    );
}

#[test]
fn test_alternate_field_format() {
    let project = petstore_project();
    let config = GeneratorConfig {
        alt_field_format: FieldCase::Kebab,
        ..GeneratorConfig::default()
    };

    let generation = generate(project.path(), config).unwrap();
    let json = serde_json::to_value(&generation.document).unwrap();
    let pet = &json["components"]["schemas"]["Pet"]["properties"];

    assert!(pet.get("pet-id").is_some());
    assert!(pet.get("photo-urls").is_some());
    // serde rename wins over the field format
    assert!(pet.get("ownerRef").is_some());
    // rename_all on the struct wins over the field format
    assert!(json["components"]["schemas"]["NewPet"]["properties"]
        .get("photoUrls")
        .is_some());
}

#[test]
fn test_cli_writes_yaml_by_default() {
    let project = petstore_project();
    let project_path = project.path().to_str().unwrap();

    run_cli(&[project_path]).unwrap();

    let content = std::fs::read_to_string(project.path().join("swagger.yaml")).unwrap();
    let doc: OpenApiDocument = serde_yaml::from_str(&content).unwrap();
    assert_eq!(doc.info.title, "Pet Store");
    assert_eq!(doc.paths.len(), 3);
}

#[test]
fn test_cli_writes_json_to_output_path() {
    let project = petstore_project();
    let output = project.path().join("docs").join("openapi.json");

    run_cli(&[
        project.path().to_str().unwrap(),
        "-f",
        "json",
        "-o",
        output.to_str().unwrap(),
        "--app-output-format",
        "yaml",
    ])
    .unwrap();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["info"]["version"], "1.2.0");
    assert!(json["components"]["responses"]["PetFound"]["content"]
        .get("application/yaml")
        .is_some());
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let project = petstore_project();
    let path = project.path().to_str().unwrap();

    for format in ["yaml", "json"] {
        let first = project.path().join(format!("first.{}", format));
        let second = project.path().join(format!("second.{}", format));
        run_cli(&[path, "-f", format, "-o", first.to_str().unwrap()]).unwrap();
        run_cli(&[path, "-f", format, "-o", second.to_str().unwrap()]).unwrap();

        assert_eq!(
            std::fs::read_to_string(&first).unwrap(),
            std::fs::read_to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_malformed_directives_are_warnings() {
    let project = create_test_project(vec![(
        "src/lib.rs",
        r#"
/* go-swagify
@@openapi: 3.0.3
title: Broken
*/

/* go-swagify
@@parameter: page
in: body
this line has no colon
colour: red
*/

/* go-swagify
@@operation: /items
get.summary: List items
banana.summary: Not a method
*/

/* go-swagify
@@path: /items
*/

/* go-swagify
@@widget: nope
*/

fn broken( {
"#,
    )]);

    let generation = generate(project.path(), GeneratorConfig::default()).unwrap();
    let warnings = &generation.warnings;

    assert_eq!(warnings.count_matching("@@parameter: invalid value for in: in: body"), 1);
    assert_eq!(
        warnings.count_matching("@@parameter: bad format of line: this line has no colon"),
        1
    );
    assert_eq!(warnings.count_matching("@@parameter: invalid name option: colour: red"), 1);
    assert_eq!(warnings.count_matching("@@operation: invalid method: banana"), 1);
    assert_eq!(warnings.count_matching("unknown directive type: @@widget"), 1);
    assert_eq!(warnings.count_matching("unable to parse"), 1);

    let doc = &generation.document;
    assert!(doc.paths["/items"].get.is_some());
    assert_eq!(doc.components.as_ref().unwrap().parameters["page"].location, None);
}

#[test]
fn test_strict_refs_fails_before_writing() {
    let project = create_test_project(vec![(
        "src/lib.rs",
        r#"
/* go-swagify
@@openapi: 3.0.3
*/

/* go-swagify
@@path: /orders
*/

/* go-swagify
@@operation: /orders
post.requestBody.ref: NewOrder
post.responses.ref: 201:OrderCreated
*/
"#,
    )]);
    let path = project.path().to_str().unwrap();

    // permissive by default
    run_cli(&[path]).unwrap();
    assert!(project.path().join("swagger.yaml").exists());

    let output = project.path().join("strict.yaml");
    let err = run_cli(&[path, "--strict-refs", "-o", output.to_str().unwrap()]).unwrap_err();

    match err.downcast_ref::<Error>() {
        Some(Error::DanglingReferences(refs)) => assert_eq!(
            refs,
            &vec![
                "paths./orders.post.requestBody -> #/components/requestBodies/NewOrder"
                    .to_string(),
                "paths./orders.post.responses.201 -> #/components/responses/OrderCreated"
                    .to_string(),
            ]
        ),
        other => panic!("expected dangling references, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_empty_project() {
    let project = create_test_project(vec![("README.md", "# nothing here")]);

    let generation = generate(project.path(), GeneratorConfig::default()).unwrap();

    assert_eq!(generation.stats.files_scanned, 0);
    assert_eq!(generation.document.info.title, "Generated API");
    assert!(generation.document.paths.is_empty());
    assert!(generation.document.components.is_none());
    assert_eq!(generation.warnings.len(), 1);
}
