//! Generator settings shared by the CLI and the document builders.

use clap::ValueEnum;

/// Encoding of the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension used for the default output file name.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

/// Body format of the documented application, used when a directive names a schema without a
/// media type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AppOutputFormat {
    #[default]
    Json,
    Yaml,
}

impl AppOutputFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            AppOutputFormat::Json => "application/json",
            AppOutputFormat::Yaml => "application/yaml",
        }
    }
}

/// Naming convention applied to struct field names when deriving property names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FieldCase {
    /// user_name
    #[default]
    #[value(name = "snakeCase")]
    Snake,
    /// user-name
    #[value(name = "kebabCase")]
    Kebab,
    /// userName
    #[value(name = "camelCase")]
    Camel,
    /// UserName
    #[value(name = "pascalCase")]
    Pascal,
    /// username
    #[value(name = "lowerCase")]
    Lower,
    /// USERNAME
    #[value(name = "upperCase")]
    Upper,
}

/// Settings consumed by [`crate::openapi_builder::OpenApiBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub app_output_format: AppOutputFormat,
    pub alt_field_format: FieldCase,
    /// Fail when a `$ref` has no target in `components`.
    pub strict_references: bool,
}
