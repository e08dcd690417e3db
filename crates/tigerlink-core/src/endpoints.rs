//! Version-keyed endpoint registry.
//!
//! The registry is loaded once from a declarative TOML table and is
//! immutable afterwards. Resolution maps `(operation, version)` to a
//! concrete `{path, method, port}` descriptor, substituting `{name}`
//! placeholders in the path from an explicit route-parameter list.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tigerlink_common::PortRole;

use crate::error::{Error, EndpointField, Result};

/// An endpoint field declared either as one value for every version or as
/// a per-version table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Versioned<T> {
    Fixed(T),
    PerVersion(BTreeMap<String, T>),
}

impl<T> Versioned<T> {
    fn resolve(&self, version: &str) -> Option<&T> {
        match self {
            Versioned::Fixed(value) => Some(value),
            Versioned::PerVersion(table) => table.get(version),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
    Put,
    Patch,
}

impl Method {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EndpointDef {
    path: Versioned<String>,
    method: Option<Versioned<Method>>,
    port: Option<Versioned<PortRole>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Defaults {
    method: Method,
    port: PortRole,
}

/// The resolved `{path, method, port}` triple for one operation at one
/// server version, with all path placeholders substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub path: String,
    pub method: Method,
    pub port: PortRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointRegistry {
    endpoints: BTreeMap<String, EndpointDef>,
    defaults: Defaults,
}

impl EndpointRegistry {
    /// The table shipped with this crate, covering the "3.x" and "4.x"
    /// version tags.
    pub fn builtin() -> Self {
        toml::from_str(include_str!("endpoints.toml"))
            .expect("embedded endpoint table is valid TOML")
    }

    /// Load an external table, e.g. to cover a server version the built-in
    /// table does not know about.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::EndpointTable(e.to_string()))
    }

    /// Resolve `name` for `version`, substituting `route` into the path.
    pub fn resolve(
        &self,
        name: &str,
        version: &str,
        route: &[(&str, &str)],
    ) -> Result<ResolvedEndpoint> {
        let def = self
            .endpoints
            .get(name)
            .ok_or_else(|| Error::UnknownEndpoint(name.to_string()))?;

        let missing = |field: EndpointField| Error::EndpointFieldMissing {
            field,
            version: version.to_string(),
            endpoint: name.to_string(),
        };

        let path = def
            .path
            .resolve(version)
            .ok_or_else(|| missing(EndpointField::Path))?;
        let method = match &def.method {
            Some(m) => *m.resolve(version).ok_or_else(|| missing(EndpointField::Method))?,
            None => self.defaults.method,
        };
        let port = match &def.port {
            Some(p) => *p.resolve(version).ok_or_else(|| missing(EndpointField::Port))?,
            None => self.defaults.port,
        };

        Ok(ResolvedEndpoint {
            path: render_path(path, route)?,
            method,
            port,
        })
    }
}

/// Substitute `{name}` placeholders from `route`. A placeholder without a
/// value and a value without a placeholder are both errors, so a typo on
/// either side fails here instead of producing a bad URL.
fn render_path(template: &str, route: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut used: BTreeSet<&str> = BTreeSet::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| Error::MissingRouteParam {
            placeholder: after.to_string(),
            path: template.to_string(),
        })?;
        let name = &after[..end];
        let (key, value) = route
            .iter()
            .find(|(k, _)| *k == name)
            .ok_or_else(|| Error::MissingRouteParam {
                placeholder: name.to_string(),
                path: template.to_string(),
            })?;
        out.push_str(value);
        used.insert(*key);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    for (key, _) in route {
        if !used.contains(key) {
            return Err(Error::UnknownRouteParam {
                name: key.to_string(),
                path: template.to_string(),
            });
        }
    }
    Ok(out)
}
