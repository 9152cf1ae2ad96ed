//! `@@response` directives: the `components.responses` section.

use super::{apply_content_field, MediaType};
use crate::directive::DirectiveRecord;
use crate::warnings::Warnings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response object. `description` is mandatory in the document format and is always written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
}

pub fn build_responses(
    records: &[DirectiveRecord],
    default_media_type: &str,
    warnings: &mut Warnings,
) -> BTreeMap<String, Response> {
    let mut responses = BTreeMap::new();

    for record in records {
        debug!("Building response: {}", record.identifier);
        let mut response = Response::default();

        for (key, field) in record.fields() {
            if key == "description" {
                response.description = field.value.clone();
            } else if !apply_content_field(
                &mut response.content,
                default_media_type,
                record,
                key,
                field,
                warnings,
            ) {
                record.warn_invalid_name(field, warnings);
            }
        }

        responses.insert(record.identifier.clone(), response);
    }

    responses
}
