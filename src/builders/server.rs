//! `@@server` directives.
//!
//! Servers are not a component section. Each server lists the scopes it belongs to: `openapi`
//! puts it in the document root, a path identifier attaches it to that path, and operations can
//! copy servers by name through `server.ref`.

use crate::directive::{split_list, DirectiveRecord};
use crate::warnings::Warnings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scope of servers listed at the document root.
pub const ROOT_SCOPE: &str = "openapi";

/// Server object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, ServerVariable>,
}

/// Server variable object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    pub default: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Built servers by identifier, plus the identifiers belonging to each scope.
#[derive(Debug, Clone, Default)]
pub struct ServerBuild {
    servers: BTreeMap<String, Server>,
    scopes: BTreeMap<String, Vec<String>>,
}

impl ServerBuild {
    pub fn get(&self, identifier: &str) -> Option<&Server> {
        self.servers.get(identifier)
    }

    /// Servers of one scope, in the order their records were built.
    pub fn scoped(&self, scope: &str) -> Vec<Server> {
        self.scopes
            .get(scope)
            .into_iter()
            .flatten()
            .filter_map(|id| self.servers.get(id))
            .cloned()
            .collect()
    }

    /// Servers listed at the document root.
    pub fn root(&self) -> Vec<Server> {
        self.scoped(ROOT_SCOPE)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

pub fn build_servers(records: &[DirectiveRecord], warnings: &mut Warnings) -> ServerBuild {
    let mut build = ServerBuild::default();

    for record in records {
        debug!("Building server: {}", record.identifier);
        let mut server = Server::default();
        let mut scopes = vec![ROOT_SCOPE.to_string()];

        for (key, field) in record.fields() {
            match key {
                "url" => server.url = field.value.clone(),
                "description" => server.description = Some(field.value.clone()),
                "scope" => scopes = split_list(&field.value),
                _ => {
                    let Some((name, attribute)) = key
                        .strip_prefix("variables.")
                        .and_then(|rest| rest.split_once('.'))
                        .filter(|(name, _)| !name.is_empty())
                    else {
                        record.warn_invalid_name(field, warnings);
                        continue;
                    };
                    if !matches!(attribute, "default" | "description" | "enum") {
                        record.warn_invalid_name(field, warnings);
                        continue;
                    }
                    let variable = server.variables.entry(name.to_string()).or_default();
                    match attribute {
                        "default" => variable.default = field.value.clone(),
                        "description" => variable.description = Some(field.value.clone()),
                        _ => variable.enum_values = split_list(&field.value),
                    }
                }
            }
        }

        for (name, _) in server.variables.iter().filter(|(_, v)| v.default.is_empty()) {
            warnings.add(format!(
                "[Warning] @@server: variable {} of {} has no default",
                name, record.identifier
            ));
        }
        if server.url.is_empty() {
            warnings.add(format!("[Warning] @@server: {} has no url", record.identifier));
        }

        for scope in scopes {
            let members = build.scopes.entry(scope).or_default();
            if !members.contains(&record.identifier) {
                members.push(record.identifier.clone());
            }
        }
        build.servers.insert(record.identifier.clone(), server);
    }

    build
}
