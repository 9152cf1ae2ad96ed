//! Directive grammar: block types, `key: value` records and references.
//!
//! A directive comment carries a typed header (`@@<type>: <identifier>`) followed by lines of the
//! form `<key>: <value>`. This module turns the lines of one block into a [`DirectiveRecord`];
//! deciding which keys are valid is left to the builder that owns the block type.

use crate::warnings::Warnings;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Marker that opens a directive comment.
pub const MARKER: &str = "go-swagify";

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[a-zA-Z/.]+): *?(?P<value>.+)$").expect("directive line pattern")
});

/// The directive types understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DirectiveKind {
    OpenApi,
    Server,
    Schema,
    Parameter,
    RequestBody,
    Response,
    Operation,
    Path,
    Struct,
}

impl DirectiveKind {
    /// Parses the type name used in a directive header (case sensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openapi" => Some(Self::OpenApi),
            "server" => Some(Self::Server),
            "schema" => Some(Self::Schema),
            "parameter" => Some(Self::Parameter),
            "requestBody" => Some(Self::RequestBody),
            "response" => Some(Self::Response),
            "operation" => Some(Self::Operation),
            "path" => Some(Self::Path),
            "struct" => Some(Self::Struct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenApi => "openapi",
            Self::Server => "server",
            Self::Schema => "schema",
            Self::Parameter => "parameter",
            Self::RequestBody => "requestBody",
            Self::Response => "response",
            Self::Operation => "operation",
            Self::Path => "path",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw directive comment: header plus the remaining non-empty lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBlock {
    pub kind: DirectiveKind,
    pub identifier: String,
    pub lines: Vec<String>,
}

impl DirectiveBlock {
    pub fn new(kind: DirectiveKind, identifier: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            lines,
        }
    }
}

/// A parsed `key: value` line. The original line is kept for warning messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveField {
    pub value: String,
    pub line: String,
}

/// Key/value view of a [`DirectiveBlock`]. When a key repeats, the last occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveRecord {
    pub kind: DirectiveKind,
    pub identifier: String,
    fields: BTreeMap<String, DirectiveField>,
}

impl DirectiveRecord {
    /// Parses every line of `block`. Lines that do not match `<key>: <value>` are reported and
    /// skipped; parsing always continues with the next line.
    pub fn parse(block: &DirectiveBlock, warnings: &mut Warnings) -> Self {
        let mut fields = BTreeMap::new();

        for raw in &block.lines {
            let line = raw.trim();
            let Some(captures) = LINE_RE.captures(line) else {
                warnings.add(format!(
                    "[Warning] @@{}: bad format of line: {}",
                    block.kind, line
                ));
                continue;
            };

            let value = captures["value"].trim();
            if value.is_empty() {
                warnings.add(format!(
                    "[Warning] @@{}: bad format of line: {}",
                    block.kind, line
                ));
                continue;
            }

            fields.insert(
                captures["name"].to_string(),
                DirectiveField {
                    value: value.to_string(),
                    line: line.to_string(),
                },
            );
        }

        Self {
            kind: block.kind,
            identifier: block.identifier.clone(),
            fields,
        }
    }

    /// Builds a record directly from key/value pairs.
    pub fn from_pairs<'a>(
        kind: DirectiveKind,
        identifier: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let fields = pairs
            .into_iter()
            .map(|(key, value)| {
                (
                    key.to_string(),
                    DirectiveField {
                        value: value.to_string(),
                        line: format!("{}: {}", key, value),
                    },
                )
            })
            .collect();

        Self {
            kind,
            identifier: identifier.into(),
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|f| f.value.as_str())
    }

    /// Fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &DirectiveField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn warn_invalid_name(&self, field: &DirectiveField, warnings: &mut Warnings) {
        warnings.add(format!(
            "[Warning] @@{}: invalid name option: {}",
            self.kind, field.line
        ));
    }

    pub fn warn_invalid_value(&self, key: &str, field: &DirectiveField, warnings: &mut Warnings) {
        warnings.add(format!(
            "[Warning] @@{}: invalid value for {}: {}",
            self.kind, key, field.line
        ));
    }

    /// Returns the single name of a one-reference field, warning when more than one is given.
    pub fn single_name(&self, field: &DirectiveField, warnings: &mut Warnings) -> Option<String> {
        let mut names = split_list(&field.value).into_iter();
        let first = names.next();
        if names.next().is_some() {
            warnings.add(format!(
                "[Warning] @@{}: only one reference allowed: {}",
                self.kind, field.line
            ));
        }
        first
    }
}

/// Component namespaces that references point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Schemas,
    Parameters,
    Responses,
    RequestBodies,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Parameters => "parameters",
            Self::Responses => "responses",
            Self::RequestBodies => "requestBodies",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "schemas" => Some(Self::Schemas),
            "parameters" => Some(Self::Parameters),
            "responses" => Some(Self::Responses),
            "requestBodies" => Some(Self::RequestBodies),
            _ => None,
        }
    }
}

const COMPONENTS_PREFIX: &str = "#/components/";

/// Pointer into a component section, serialized as `{"$ref": "#/components/<section>/<name>"}`.
///
/// References are never checked against their target while building.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    pub fn new(section: Section, name: &str) -> Self {
        Self {
            reference: format!("{}{}/{}", COMPONENTS_PREFIX, section.as_str(), name),
        }
    }

    /// Splits the pointer back into section and name, if it has the component form.
    pub fn target(&self) -> Option<(Section, &str)> {
        let rest = self.reference.strip_prefix(COMPONENTS_PREFIX)?;
        let (section, name) = rest.split_once('/')?;
        if name.is_empty() {
            return None;
        }
        Some((Section::parse(section)?, name))
    }
}

/// Splits a `;`-delimited value into trimmed, non-empty elements in input order.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expands a `;`-delimited list of names into references against `section`.
pub fn parse_references(value: &str, section: Section) -> Vec<Reference> {
    split_list(value)
        .iter()
        .map(|name| Reference::new(section, name))
        .collect()
}

pub fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
