//! `@@requestBody` directives: the `components.requestBodies` section.

use super::{apply_content_field, MediaType};
use crate::directive::{parse_bool, DirectiveRecord};
use crate::warnings::Warnings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request body object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

pub fn build_request_bodies(
    records: &[DirectiveRecord],
    default_media_type: &str,
    warnings: &mut Warnings,
) -> BTreeMap<String, RequestBody> {
    let mut request_bodies = BTreeMap::new();

    for record in records {
        debug!("Building request body: {}", record.identifier);
        let mut body = RequestBody::default();

        for (key, field) in record.fields() {
            match key {
                "description" => body.description = Some(field.value.clone()),
                "required" => match parse_bool(&field.value) {
                    Some(required) => body.required = required,
                    None => record.warn_invalid_value(key, field, warnings),
                },
                _ => {
                    if !apply_content_field(
                        &mut body.content,
                        default_media_type,
                        record,
                        key,
                        field,
                        warnings,
                    ) {
                        record.warn_invalid_name(field, warnings);
                    }
                }
            }
        }

        request_bodies.insert(record.identifier.clone(), body);
    }

    request_bodies
}
