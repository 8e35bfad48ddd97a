//! Addon manifest, catalogs and addon-catalog entries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{is_default, CacheHints, ContentType, ResourceName, TRANSPORT_HTTP};
use crate::endpoint::Endpoint;
use crate::error::ManifestError;

/// The provider's self-description, served at `manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonManifest {
    /// Dot-separated identifier, e.g. `com.example.films`.
    pub id: String,
    /// Semantic version of the addon.
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    pub description: String,
    pub resources: Vec<Resource>,
    pub types: Vec<ContentType>,
    pub catalogs: Vec<Catalog>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_prefixes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<AddonManifestBehaviorHints>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonManifestBehaviorHints {
    #[serde(default)]
    pub configurable: bool,
    /// The addon cannot be installed before the user has gone through the configure page.
    #[serde(default, skip_serializing_if = "is_default")]
    pub configuration_required: bool,
}

/// An advertised resource, optionally restricted to some types and id prefixes.
///
/// Decodes from both the object form and the short string form (`"stream"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ResourceDef")]
pub struct Resource {
    pub name: ResourceName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<ContentType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_prefixes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceDef {
    Short(ResourceName),
    Full {
        name: ResourceName,
        #[serde(default)]
        types: Vec<ContentType>,
        #[serde(default, rename = "idPrefixes")]
        id_prefixes: Vec<String>,
    },
}

impl From<ResourceDef> for Resource {
    fn from(def: ResourceDef) -> Self {
        match def {
            ResourceDef::Short(name) => Resource::new(name),
            ResourceDef::Full {
                name,
                types,
                id_prefixes,
            } => Resource {
                name,
                types,
                id_prefixes,
            },
        }
    }
}

impl Resource {
    pub fn new(name: ResourceName) -> Self {
        Self {
            name,
            types: Vec::new(),
            id_prefixes: Vec::new(),
        }
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = ContentType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    pub fn with_id_prefixes<S: Into<String>>(mut self, prefixes: impl IntoIterator<Item = S>) -> Self {
        self.id_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

/// A typed listing such as "Popular movies". `(type, id)` is unique per addon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<CatalogExtra>,
}

impl Catalog {
    pub fn extra(&self, name: &str) -> Option<&CatalogExtra> {
        self.extra.iter().find(|e| e.name == name)
    }
}

/// An extra argument a catalog accepts (search, genre, skip, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExtra {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub options_limit: u32,
}

impl CatalogExtra {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_required: false,
            options: Vec::new(),
            options_limit: 0,
        }
    }

    /// How many options a user may pick; defaults to 1 when unset.
    pub fn options_limit(&self) -> u32 {
        if self.options_limit == 0 {
            1
        } else {
            self.options_limit
        }
    }
}

/// One entry of an addon catalog (a catalog of other addons).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonCatalog {
    pub transport_name: String,
    /// URL of the addon's `manifest.json`.
    pub transport_url: String,
    pub manifest: AddonManifest,
}

impl AddonCatalog {
    pub fn http(transport_url: impl Into<String>, manifest: AddonManifest) -> Self {
        Self {
            transport_name: TRANSPORT_HTTP.to_string(),
            transport_url: transport_url.into(),
            manifest,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddonCatalogList {
    pub addons: Vec<AddonCatalog>,
    #[serde(flatten)]
    pub cache: CacheHints,
}

impl AddonManifest {
    /// Whether the manifest advertises `resource`.
    pub fn serves(&self, resource: ResourceName) -> bool {
        self.resources.iter().any(|r| r.name == resource)
    }

    pub fn catalog(&self, content_type: ContentType, id: &str) -> Option<&Catalog> {
        self.catalogs
            .iter()
            .find(|c| c.content_type == content_type && c.id == id)
    }

    /// Check the manifest against what the router can actually serve.
    pub fn validate(&self) -> Result<(), ManifestError> {
        validate_id(&self.id)?;
        validate_version(&self.version)?;

        for resource in &self.resources {
            if Endpoint::for_resource(resource.name).is_none() {
                return Err(ManifestError::UnservedResource(resource.name));
            }
            for t in &resource.types {
                if !self.types.contains(t) {
                    return Err(ManifestError::UndeclaredType {
                        owner: format!("resource {}", resource.name),
                        content_type: *t,
                    });
                }
            }
        }

        if !self.catalogs.is_empty() && !self.serves(ResourceName::Catalog) {
            return Err(ManifestError::MissingCatalogResource);
        }

        let mut seen = HashSet::new();
        for catalog in &self.catalogs {
            if !seen.insert((catalog.content_type, catalog.id.as_str())) {
                return Err(ManifestError::DuplicateCatalog {
                    content_type: catalog.content_type,
                    id: catalog.id.clone(),
                });
            }
            if !self.types.contains(&catalog.content_type) {
                return Err(ManifestError::UndeclaredType {
                    owner: format!("catalog {}", catalog.id),
                    content_type: catalog.content_type,
                });
            }
        }
        Ok(())
    }
}

fn validate_id(id: &str) -> Result<(), ManifestError> {
    let well_formed = id.contains('.')
        && id.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
    if well_formed {
        Ok(())
    } else {
        Err(ManifestError::InvalidId(id.to_string()))
    }
}

fn validate_version(version: &str) -> Result<(), ManifestError> {
    // Pre-release and build suffixes are allowed after the numeric core.
    let core = version.split(['-', '+']).next().unwrap_or("");
    let parts: Vec<&str> = core.split('.').collect();
    let numeric = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if numeric {
        Ok(())
    } else {
        Err(ManifestError::InvalidVersion(version.to_string()))
    }
}
