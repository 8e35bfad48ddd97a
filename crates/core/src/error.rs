use std::path::PathBuf;

use crate::schema::{ContentType, ResourceName};

/// Top-level error type. All public API functions return this or one of its parts.
#[derive(Debug, thiserror::Error)]
pub enum AddonError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Resource path error: {0}")]
    Path(#[from] PathError),

    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Invalid addon id {0:?}: expected a dot-separated identifier such as \"org.example.addon\"")]
    InvalidId(String),

    #[error("Invalid version {0:?}: expected major.minor.patch")]
    InvalidVersion(String),

    #[error("Resource {0} is advertised but not served by the router")]
    UnservedResource(ResourceName),

    #[error("Catalog {content_type}/{id} is declared more than once")]
    DuplicateCatalog { content_type: ContentType, id: String },

    #[error("{owner} uses content type {content_type} which is missing from the manifest types")]
    UndeclaredType { owner: String, content_type: ContentType },

    #[error("Manifest declares catalogs but does not advertise the catalog resource")]
    MissingCatalogResource,
}

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Resource path {0:?} has too few segments; expected /<resource>/<type>/<id>.json")]
    TooFewSegments(String),

    #[error("Resource path {0:?} has too many segments; expected at most /<resource>/<type>/<id>/<extra>.json")]
    TooManySegments(String),

    #[error("Resource path {0:?} must end in .json")]
    MissingJsonSuffix(String),

    #[error("Unknown resource {0:?}")]
    UnknownResource(String),

    #[error("Unknown content type {0:?}")]
    UnknownContentType(String),

    #[error("Malformed extra argument {0:?}; expected key=value")]
    MalformedExtra(String),

    #[error("Segment {0:?} is not valid percent-encoded UTF-8")]
    InvalidEncoding(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Cannot read bundle {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML bundle: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON bundle: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Meta {0:?} is declared more than once")]
    DuplicateMeta(String),

    #[error("Stream #{index} for {video_id:?} must carry exactly one of url, ytId, infoHash or externalUrl")]
    InvalidStream { video_id: String, index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
