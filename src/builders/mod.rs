//! Builders that turn directive records into document entities.
//!
//! Every builder is a plain function from the records of one directive type to a map keyed by
//! directive identifier. Problems are appended to the [`Warnings`] passed in; no entity is ever
//! dropped because one of its fields is invalid.
//!
//! The section builders ([`schema`], [`parameter`], [`request_body`], [`response`],
//! [`server`]) have no dependencies on each other. [`operation`] reads the server build, and
//! [`path`] reads the operation build, so they must run in that order.

pub mod operation;
pub mod parameter;
pub mod path;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod server;

use crate::directive::{DirectiveField, DirectiveRecord};
use crate::type_mapper::PrimitiveType;
use crate::warnings::Warnings;
use schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Media type object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// Handles the `content.<mediaType>.schema.{ref,type}` keys and their `schema.{ref,type}`
/// shorthands, which use `default_media_type`.
///
/// Returns `false` when `key` is not a content key.
pub(crate) fn apply_content_field(
    content: &mut BTreeMap<String, MediaType>,
    default_media_type: &str,
    record: &DirectiveRecord,
    key: &str,
    field: &DirectiveField,
    warnings: &mut Warnings,
) -> bool {
    let (media_type, attribute) = if let Some(attribute) = key.strip_prefix("schema.") {
        (default_media_type, attribute)
    } else if let Some(rest) = key.strip_prefix("content.") {
        match rest.rsplit_once(".schema.") {
            Some((media_type, attribute)) if !media_type.is_empty() => (media_type, attribute),
            _ => return false,
        }
    } else {
        return false;
    };

    match attribute {
        "ref" => {
            if let Some(name) = record.single_name(field, warnings) {
                content.insert(
                    media_type.to_string(),
                    MediaType {
                        schema: Schema::reference_to(&name),
                    },
                );
            }
        }
        "type" => match PrimitiveType::parse(&field.value) {
            Some(t) => {
                content.insert(
                    media_type.to_string(),
                    MediaType {
                        schema: Schema::of_type(t),
                    },
                );
            }
            None => record.warn_invalid_value(key, field, warnings),
        },
        _ => return false,
    }
    true
}
