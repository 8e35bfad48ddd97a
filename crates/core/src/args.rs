//! Resource addressing: `/{resource}/{type}/{id}[/{extra}].json`.
//!
//! `extra` is a URL-encoded `key=value&key=value` list, e.g.
//! `/catalog/movie/top/search=night%20of&skip=100.json`.

use percent_encoding::percent_decode_str;

use crate::error::PathError;
use crate::schema::{extra, ContentType, ResourceName};

const JSON_SUFFIX: &str = ".json";

/// Arguments of a resource request, decoded from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceArgs {
    pub resource: ResourceName,
    pub content_type: ContentType,
    pub id: String,
    /// Extra arguments in request order; a key may repeat.
    pub extra: Vec<(String, String)>,
}

impl ResourceArgs {
    /// Parse a resource path (token already stripped).
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let trimmed = path.trim_matches('/');
        let Some(without_suffix) = trimmed.strip_suffix(JSON_SUFFIX) else {
            return Err(PathError::MissingJsonSuffix(path.to_string()));
        };
        let segments: Vec<&str> = without_suffix.split('/').collect();
        let (resource, content_type, id, raw_extra) = match segments.as_slice() {
            [resource, content_type, id] => (*resource, *content_type, *id, None),
            [resource, content_type, id, extra] => (*resource, *content_type, *id, Some(*extra)),
            [_, _, _, _, ..] => return Err(PathError::TooManySegments(path.to_string())),
            _ => return Err(PathError::TooFewSegments(path.to_string())),
        };

        let resource =
            ResourceName::parse(resource).ok_or_else(|| PathError::UnknownResource(resource.to_string()))?;
        let content_type = ContentType::parse(content_type)
            .ok_or_else(|| PathError::UnknownContentType(content_type.to_string()))?;
        let id = decode(id)?;
        if id.is_empty() {
            return Err(PathError::TooFewSegments(path.to_string()));
        }
        let extra = match raw_extra {
            Some(raw) => parse_extra(raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            resource,
            content_type,
            id,
            extra,
        })
    }

    /// First value given for `name`.
    pub fn extra(&self, name: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value given for `name`, for extras with an options limit above one.
    pub fn extra_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.extra
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn search(&self) -> Option<&str> {
        self.extra(extra::SEARCH)
    }

    pub fn genre(&self) -> Option<&str> {
        self.extra(extra::GENRE)
    }

    /// Pagination offset; absent or non-numeric means zero.
    pub fn skip(&self) -> usize {
        self.extra(extra::SKIP)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}

fn parse_extra(raw: &str) -> Result<Vec<(String, String)>, PathError> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| PathError::MalformedExtra(pair.to_string()))?;
            if key.is_empty() {
                return Err(PathError::MalformedExtra(pair.to_string()));
            }
            Ok((decode(key)?, decode(value)?))
        })
        .collect()
}

fn decode(segment: &str) -> Result<String, PathError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| PathError::InvalidEncoding(segment.to_string()))
}
