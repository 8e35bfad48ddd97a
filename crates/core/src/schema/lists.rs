//! Response wrappers. These are the only values the router writes as a body.

use serde::{Deserialize, Serialize};

use super::{is_default, Meta, MetaPreview, Stream, Subtitles};

/// Client-side caching advice, in seconds. Zero means "not set".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHints {
    #[serde(default, skip_serializing_if = "is_default")]
    pub cache_max_age: u32,
    #[serde(default, skip_serializing_if = "is_default")]
    pub stale_revalidate: u32,
    #[serde(default, skip_serializing_if = "is_default")]
    pub stale_error: u32,
}

impl CacheHints {
    pub fn max_age(seconds: u32) -> Self {
        Self {
            cache_max_age: seconds,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaList {
    pub metas: Vec<Meta>,
    #[serde(flatten)]
    pub cache: CacheHints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaPreviewList {
    pub metas: Vec<MetaPreview>,
    #[serde(flatten)]
    pub cache: CacheHints,
}

/// Body of the meta resource: `{"meta": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaItem {
    pub meta: Meta,
    #[serde(flatten)]
    pub cache: CacheHints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamList {
    pub streams: Vec<Stream>,
    #[serde(flatten)]
    pub cache: CacheHints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitlesList {
    pub subtitles: Vec<Subtitles>,
    #[serde(flatten)]
    pub cache: CacheHints,
}

macro_rules! list_constructors {
    ($($list:ident { $field:ident: $item:ty }),* $(,)?) => {
        $(
            impl $list {
                pub fn new(items: Vec<$item>) -> Self {
                    Self {
                        $field: items,
                        cache: CacheHints::default(),
                    }
                }

                pub fn with_cache(mut self, cache: CacheHints) -> Self {
                    self.cache = cache;
                    self
                }
            }
        )*
    };
}

list_constructors! {
    MetaList { metas: Meta },
    MetaPreviewList { metas: MetaPreview },
    StreamList { streams: Stream },
    SubtitlesList { subtitles: Subtitles },
}

impl MetaItem {
    pub fn new(meta: Meta) -> Self {
        Self {
            meta,
            cache: CacheHints::default(),
        }
    }

    pub fn with_cache(mut self, cache: CacheHints) -> Self {
        self.cache = cache;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContentType, MetaLink, PosterShape};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_lists_keep_their_array() {
        assert_eq!(serde_json::to_string(&StreamList::default()).unwrap(), r#"{"streams":[]}"#);
        assert_eq!(serde_json::to_string(&SubtitlesList::default()).unwrap(), r#"{"subtitles":[]}"#);
        assert_eq!(serde_json::to_string(&MetaPreviewList::default()).unwrap(), r#"{"metas":[]}"#);
    }

    #[test]
    fn cache_hints_are_flattened_after_items() {
        let list = StreamList::new(Vec::new()).with_cache(CacheHints {
            cache_max_age: 3600,
            stale_revalidate: 0,
            stale_error: 86400,
        });
        assert_eq!(
            serde_json::to_string(&list).unwrap(),
            r#"{"streams":[],"cacheMaxAge":3600,"staleError":86400}"#
        );
    }

    #[test]
    fn meta_item_wraps_under_meta_key() {
        let item = MetaItem::new(Meta::new("pd:a", ContentType::Movie, "A")).with_cache(CacheHints::max_age(60));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["meta"]["id"], "pd:a");
        assert_eq!(json["cacheMaxAge"], 60);
    }

    #[test]
    fn meta_preview_list_round_trips() {
        let mut full = MetaPreview {
            id: "pd:metropolis".to_string(),
            content_type: ContentType::Movie,
            name: "Metropolis".to_string(),
            poster: "https://img.example.org/m.png".to_string(),
            poster_shape: Some(PosterShape::Landscape),
            genres: vec!["Drama".to_string(), "Sci-Fi".to_string()],
            imdb_rating: "8.3".to_string(),
            release_info: "1927".to_string(),
            director: vec!["Fritz Lang".to_string()],
            cast: vec!["Brigitte Helm".to_string()],
            links: vec![MetaLink {
                name: "Drama".to_string(),
                category: "genre".to_string(),
                url: "stremio:///discover".to_string(),
            }],
            description: "A futuristic city".to_string(),
            trailers: vec![Stream::from_youtube("Q0NzALRJifI")],
        };
        let sparse = MetaPreview {
            id: "pd:nosferatu".to_string(),
            content_type: ContentType::Movie,
            name: "Nosferatu".to_string(),
            poster: String::new(),
            poster_shape: None,
            genres: Vec::new(),
            imdb_rating: String::new(),
            release_info: String::new(),
            director: Vec::new(),
            cast: Vec::new(),
            links: Vec::new(),
            description: String::new(),
            trailers: Vec::new(),
        };
        let list = MetaPreviewList::new(vec![full.clone(), sparse.clone()])
            .with_cache(CacheHints::max_age(600));

        let encoded = serde_json::to_vec(&list).unwrap();
        let decoded: MetaPreviewList = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, list);

        // omitted optionals come back as their zero value
        full.description.clear();
        let encoded = serde_json::to_string(&MetaPreviewList::new(vec![full.clone()])).unwrap();
        assert!(!encoded.contains("description"));
        let decoded: MetaPreviewList = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.metas[0].description, "");
        assert_eq!(decoded.cache, CacheHints::default());
    }

    #[test]
    fn decodes_with_missing_optionals() {
        let decoded: SubtitlesList = serde_json::from_str(
            r#"{"subtitles":[{"id":"en-1","url":"https://subs.example.org/1.srt","lang":"eng"}]}"#,
        )
        .unwrap();
        assert_eq!(decoded.subtitles.len(), 1);
        assert!(decoded.cache.is_empty());
    }
}
