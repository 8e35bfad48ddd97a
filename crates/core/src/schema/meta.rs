//! Content descriptions: full `Meta` records and the `MetaPreview` used in catalogs.

use serde::{Deserialize, Serialize};

use super::{is_default, ContentType, PosterShape, Stream};

/// A link to an internal page or external url, grouped by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaLink {
    pub name: String,
    pub category: String,
    pub url: String,
}

/// One playable item of a series or channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    /// ISO 8601 publish date; for episodes the initial air date.
    pub released: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail: String,
    /// Passing streams here makes them exclusive: clients stop asking other addons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub streams: Vec<Stream>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub episode: u32,
    #[serde(default, skip_serializing_if = "is_default")]
    pub season: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailers: Vec<Stream>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub overview: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaBehaviorHints {
    /// `Video::id` to play when the detail page opens.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_video_id: String,
}

/// Full metadata of a movie, series, channel or tv item.
///
/// `id` must be unique within the provider and should carry a prefix of its
/// own so it does not collide with other addons (`yt_id:UC...`, `tt0032138`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub poster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_shape: Option<PosterShape>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub background: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Year, or a `2000-2014` / `2000-` range for series and channels.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_info: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub director: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub imdb_rating: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub released: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailers: Vec<Stream>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<MetaLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<Video>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub runtime: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub awards: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<MetaBehaviorHints>,
}

impl Meta {
    pub fn new(id: impl Into<String>, content_type: ContentType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type,
            name: name.into(),
            genres: Vec::new(),
            poster: String::new(),
            poster_shape: None,
            background: String::new(),
            logo: String::new(),
            description: String::new(),
            release_info: String::new(),
            director: Vec::new(),
            cast: Vec::new(),
            imdb_rating: String::new(),
            released: String::new(),
            trailers: Vec::new(),
            links: Vec::new(),
            videos: Vec::new(),
            runtime: String::new(),
            language: String::new(),
            country: String::new(),
            awards: String::new(),
            website: String::new(),
            behavior_hints: None,
        }
    }

    /// The abbreviated record shown in catalog listings.
    pub fn preview(&self) -> MetaPreview {
        MetaPreview {
            id: self.id.clone(),
            content_type: self.content_type,
            name: self.name.clone(),
            poster: self.poster.clone(),
            poster_shape: self.poster_shape,
            genres: self.genres.clone(),
            imdb_rating: self.imdb_rating.clone(),
            release_info: self.release_info.clone(),
            director: self.director.clone(),
            cast: self.cast.clone(),
            links: self.links.clone(),
            description: self.description.clone(),
            trailers: self.trailers.clone(),
        }
    }
}

/// Catalog entry. Unlike [`Meta`], `poster` is always emitted, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_shape: Option<PosterShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub imdb_rating: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_info: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub director: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<MetaLink>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailers: Vec<Stream>,
}
