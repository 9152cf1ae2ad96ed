//! Maps declared field types onto document primitive types.

use crate::directive::{Reference, Section};
use crate::type_resolver::TypeInfo;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Primitive types of the document's schema language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl PrimitiveType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of mapping one declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedType {
    /// A primitive with an optional format hint; `array` carries its element type.
    Primitive {
        primitive: PrimitiveType,
        format: Option<&'static str>,
        items: Option<Box<MappedType>>,
    },
    /// A struct that has its own schema component.
    Reference(Reference),
}

impl MappedType {
    fn primitive(primitive: PrimitiveType, format: Option<&'static str>) -> Self {
        MappedType::Primitive {
            primitive,
            format,
            items: None,
        }
    }

    fn array(items: MappedType) -> Self {
        MappedType::Primitive {
            primitive: PrimitiveType::Array,
            format: None,
            items: Some(Box::new(items)),
        }
    }

    /// Type as seen by a schema: references count as objects.
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            MappedType::Primitive { primitive, .. } => *primitive,
            MappedType::Reference(_) => PrimitiveType::Object,
        }
    }
}

/// Converts [`TypeInfo`] into [`MappedType`]. Never fails: unknown types become `object`.
pub struct TypeMapper {
    known_structs: BTreeSet<String>,
}

impl TypeMapper {
    /// `known_structs` are the names that map to `#/components/schemas/<name>`.
    pub fn new(known_structs: impl IntoIterator<Item = String>) -> Self {
        Self {
            known_structs: known_structs.into_iter().collect(),
        }
    }

    pub fn map(&self, type_info: &TypeInfo) -> MappedType {
        let inner = type_info.generic_args.first();

        match type_info.name.as_str() {
            "Option" | "Box" | "Rc" | "Arc" | "Cow" | "RefCell" | "Cell" => {
                return match inner {
                    Some(inner) => self.map(inner),
                    None => MappedType::primitive(PrimitiveType::Object, None),
                };
            }
            "Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "LinkedList" => {
                return MappedType::array(match inner {
                    Some(inner) => self.map(inner),
                    None => MappedType::primitive(PrimitiveType::Object, None),
                });
            }
            _ => {}
        }

        if let Some(mapped) = Self::map_scalar(&type_info.name) {
            return mapped;
        }

        if self.known_structs.contains(&type_info.name) {
            return MappedType::Reference(Reference::new(Section::Schemas, &type_info.name));
        }

        debug!("Unknown type: {}, using object placeholder", type_info.name);
        MappedType::primitive(PrimitiveType::Object, None)
    }

    fn map_scalar(name: &str) -> Option<MappedType> {
        let (primitive, format) = match name {
            "String" | "str" | "char" | "PathBuf" | "Path" | "OsString" => {
                (PrimitiveType::String, None)
            }
            "Uuid" => (PrimitiveType::String, Some("uuid")),
            "DateTime" | "NaiveDateTime" | "SystemTime" | "OffsetDateTime" => {
                (PrimitiveType::String, Some("date-time"))
            }
            "NaiveDate" | "Date" => (PrimitiveType::String, Some("date")),
            "Url" => (PrimitiveType::String, Some("uri")),
            "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => (PrimitiveType::Integer, Some("int32")),
            "i64" | "i128" | "isize" | "u64" | "u128" | "usize" => {
                (PrimitiveType::Integer, Some("int64"))
            }
            "f32" => (PrimitiveType::Number, Some("float")),
            "f64" => (PrimitiveType::Number, Some("double")),
            "bool" => (PrimitiveType::Boolean, None),
            "HashMap" | "BTreeMap" | "Value" | "Map" => (PrimitiveType::Object, None),
            _ => return None,
        };
        Some(MappedType::primitive(primitive, format))
    }
}
