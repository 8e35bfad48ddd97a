//! Closed vocabularies of the protocol and the free-form constants that go with them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content types an addon can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
    Channel,
    Tv,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [Self::Movie, Self::Series, Self::Channel, Self::Tv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Channel => "channel",
            Self::Tv => "tv",
        }
    }

    /// Parse the wire token. Matching is exact: `"Movie"` is not a content type.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resources a manifest can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceName {
    AddonCatalog,
    Catalog,
    Meta,
    Stream,
    Subtitles,
}

impl ResourceName {
    pub const ALL: [ResourceName; 5] = [
        Self::AddonCatalog,
        Self::Catalog,
        Self::Meta,
        Self::Stream,
        Self::Subtitles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddonCatalog => "addon_catalog",
            Self::Catalog => "catalog",
            Self::Meta => "meta",
            Self::Stream => "stream",
            Self::Subtitles => "subtitles",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aspect ratio of a poster. Clients assume [`PosterShape::Poster`] when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PosterShape {
    /// 1:1
    Square,
    /// 1:0.675
    Poster,
    /// 1:1.77
    Landscape,
}

/// Well-known catalog extra names.
pub mod extra {
    pub const SEARCH: &str = "search";
    pub const GENRE: &str = "genre";
    pub const SKIP: &str = "skip";
}

/// Recommended `MetaLink::category` values.
pub mod link_category {
    pub const ACTOR: &str = "actor";
    pub const DIRECTOR: &str = "director";
    pub const WRITER: &str = "writer";
}

/// Common id prefixes (not exhaustive).
pub mod id_prefix {
    pub const IMDB: &str = "tt";
    pub const YOUTUBE: &str = "yt_id:";
}

/// The only transport currently supported for addon catalogs.
pub const TRANSPORT_HTTP: &str = "http";
