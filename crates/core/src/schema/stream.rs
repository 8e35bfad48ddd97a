//! Playable sources.

use serde::{Deserialize, Serialize};

use super::is_default;

/// A playable source. Exactly one of `url`, `yt_id`, `info_hash` or
/// `external_url` is the payload; everything else is presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    /// Direct URL, ideally an MP4 over https. Anything else needs `not_web_ready`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub yt_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info_hash: String,
    /// Index of the file inside the torrent; the largest file is picked when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_idx: Option<u32>,
    /// Opened in a browser rather than played.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_url: String,
    /// Usually the quality label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Extra peer sources: `tracker:<proto>://<host>:<port>` or `dht:<info_hash>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<StreamBehaviorHints>,
}

/// The substantive part of a [`Stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource<'a> {
    Url(&'a str),
    YouTube(&'a str),
    Torrent { info_hash: &'a str, file_idx: Option<u32> },
    External(&'a str),
}

impl Stream {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn from_youtube(yt_id: impl Into<String>) -> Self {
        Self {
            yt_id: yt_id.into(),
            ..Default::default()
        }
    }

    pub fn from_torrent(info_hash: impl Into<String>, file_idx: Option<u32>) -> Self {
        Self {
            info_hash: info_hash.into(),
            file_idx,
            ..Default::default()
        }
    }

    pub fn from_external(external_url: impl Into<String>) -> Self {
        Self {
            external_url: external_url.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The payload, or `None` unless exactly one source field is set.
    pub fn source(&self) -> Option<StreamSource<'_>> {
        let mut found = None;
        let candidates = [
            (!self.url.is_empty()).then(|| StreamSource::Url(&self.url)),
            (!self.yt_id.is_empty()).then(|| StreamSource::YouTube(&self.yt_id)),
            (!self.info_hash.is_empty()).then(|| StreamSource::Torrent {
                info_hash: &self.info_hash,
                file_idx: self.file_idx,
            }),
            (!self.external_url.is_empty()).then(|| StreamSource::External(&self.external_url)),
        ];
        for candidate in candidates.into_iter().flatten() {
            if found.is_some() {
                return None;
            }
            found = Some(candidate);
        }
        found
    }
}

/// Advisory flags for the client. The router never inspects them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamBehaviorHints {
    /// ISO 3166-1 alpha-3 codes, lowercase.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country_whitelist: Vec<String>,
    /// Set when the url is not https or not MP4.
    #[serde(default, skip_serializing_if = "is_default")]
    pub not_web_ready: bool,
    /// Streams sharing a group are picked automatically for binge watching.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub binge_group: String,
    /// OpenSubtitles hash, forwarded to subtitle addons.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub video_hash: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub video_size: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
    /// `{"request": {...}, "response": {...}}`; requires `not_web_ready`.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub proxy_headers: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_stream_serializes_compactly() {
        let stream = Stream::from_url("https://cdn.example.org/a.mp4").with_name("1080p");
        let json = serde_json::to_string(&stream).unwrap();
        assert_eq!(json, r#"{"url":"https://cdn.example.org/a.mp4","name":"1080p"}"#);
    }

    #[test]
    fn torrent_keeps_file_index_zero() {
        let stream = Stream::from_torrent("c9e15763f722f23e98a29decdfae341b98d53056", Some(0));
        let json = serde_json::to_value(&stream).unwrap();
        assert_eq!(json["fileIdx"], 0);
        assert_eq!(
            stream.source(),
            Some(StreamSource::Torrent {
                info_hash: "c9e15763f722f23e98a29decdfae341b98d53056",
                file_idx: Some(0)
            })
        );
    }

    #[test]
    fn source_requires_exactly_one_payload() {
        assert_eq!(Stream::default().source(), None);
        assert_eq!(
            Stream::from_youtube("dQw4w9WgXcQ").source(),
            Some(StreamSource::YouTube("dQw4w9WgXcQ"))
        );
        let mut both = Stream::from_url("https://cdn.example.org/a.mp4");
        both.external_url = "https://example.org/watch".to_string();
        assert_eq!(both.source(), None);
    }

    #[test]
    fn behavior_hints_omit_defaults_and_keep_proxy_headers() {
        let mut hints = StreamBehaviorHints {
            not_web_ready: true,
            binge_group: "films-720p".to_string(),
            ..Default::default()
        };
        hints.proxy_headers.insert(
            "request".to_string(),
            serde_json::json!({ "User-Agent": "addonkit" }),
        );
        let json = serde_json::to_value(&hints).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "notWebReady": true,
                "bingeGroup": "films-720p",
                "proxyHeaders": { "request": { "User-Agent": "addonkit" } }
            })
        );
    }
}
