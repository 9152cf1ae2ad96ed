//! swagify - OpenAPI documents from directive comments.
//!
//! Handlers, models and routes are documented with block comments that start with the
//! `go-swagify` marker:
//!
//! ```text
//! /* go-swagify
//! @@operation: /users/{id}
//! get.summary: Fetch a user
//! get.parameters.ref: userId
//! get.responses.ref: 200:UserFound;404:NotFound
//! */
//! ```
//!
//! Each comment is one directive of a given type (`openapi`, `server`, `schema`, `parameter`,
//! `requestBody`, `response`, `operation`, `path`, `struct`) with an identifier and a list of
//! `key: value` lines. The directives are assembled into a single cross-referenced document.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans a project directory for Rust files
//! 2. [`comments`] - Extracts directive blocks from the raw source text
//! 3. [`directive`] - Parses directive lines into typed records
//! 4. [`parser`] and [`type_resolver`] - Describe the structs named by `@@struct` directives
//! 5. [`type_mapper`] - Maps Rust field types to document types
//! 6. [`builders`] - Build schemas, parameters, bodies, responses, servers, operations, paths
//! 7. [`openapi_builder`] - Runs the builders in order and assembles the document
//! 8. [`references`] - Optionally checks every `$ref` against `components`
//! 9. [`serializer`] - Serializes the document to YAML or JSON
//!
//! Problems in directives never abort a run: they are collected in [`warnings::Warnings`]
//! and reported once the document has been written.
//!
//! # Example Usage
//!
//! ```no_run
//! use swagify::cli::generate;
//! use swagify::config::{GeneratorConfig, OutputFormat};
//! use swagify::serializer::serialize;
//! use std::path::Path;
//!
//! let generation = generate(Path::new("./my-project"), GeneratorConfig::default()).unwrap();
//! let yaml = serialize(&generation.document, OutputFormat::Yaml).unwrap();
//! println!("{}", yaml);
//! generation.warnings.flush();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod builders;
pub mod cli;
pub mod comments;
pub mod config;
pub mod directive;
pub mod error;
pub mod naming;
pub mod openapi_builder;
pub mod parser;
pub mod references;
pub mod scanner;
pub mod serializer;
pub mod type_mapper;
pub mod type_resolver;
pub mod warnings;
