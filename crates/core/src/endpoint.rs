//! The fixed set of path segments the router answers to.

use std::fmt;

use crate::schema::ResourceName;

/// A top-level resource segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Manifest,
    Catalog,
    Meta,
    Stream,
    Subtitles,
    Configure,
}

/// Every segment the router dispatches on. Built at compile time, never mutated.
pub const ENABLED_ENDPOINTS: [Endpoint; 6] = [
    Endpoint::Manifest,
    Endpoint::Catalog,
    Endpoint::Meta,
    Endpoint::Stream,
    Endpoint::Subtitles,
    Endpoint::Configure,
];

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest.json",
            Self::Catalog => "catalog",
            Self::Meta => "meta",
            Self::Stream => "stream",
            Self::Subtitles => "subtitles",
            Self::Configure => "configure",
        }
    }

    /// Exact, case-sensitive lookup of a single path segment.
    pub fn from_segment(segment: &str) -> Option<Self> {
        ENABLED_ENDPOINTS.into_iter().find(|e| e.as_str() == segment)
    }

    /// The endpoint serving a manifest resource, if the router has one.
    pub fn for_resource(resource: ResourceName) -> Option<Self> {
        match resource {
            ResourceName::Catalog => Some(Self::Catalog),
            ResourceName::Meta => Some(Self::Meta),
            ResourceName::Stream => Some(Self::Stream),
            ResourceName::Subtitles => Some(Self::Subtitles),
            ResourceName::AddonCatalog => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_enabled(segment: &str) -> bool {
    Endpoint::from_segment(segment).is_some()
}
