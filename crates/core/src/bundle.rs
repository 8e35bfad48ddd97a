//! File-backed provider: serve a declarative addon bundle (TOML or JSON).
//!
//! A bundle holds the manifest, the metas behind every catalog, streams and
//! subtitles keyed by video id, default cache hints, an optional token
//! allow-list and an optional configure page.
//!
//! ```toml
//! tokens = ["letmein"]
//!
//! [manifest]
//! id = "org.example.films"
//! version = "1.0.0"
//! name = "Films"
//! description = "Public domain films"
//! resources = ["catalog", "meta", "stream"]
//! types = ["movie"]
//!
//! [[manifest.catalogs]]
//! id = "top"
//! type = "movie"
//! name = "Top"
//!
//! [[metas]]
//! id = "pd:nosferatu"
//! type = "movie"
//! name = "Nosferatu"
//!
//! [[streams."pd:nosferatu"]]
//! url = "https://cdn.example.org/nosferatu.mp4"
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use http::StatusCode;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::args::ResourceArgs;
use crate::error::BundleError;
use crate::exchange::AddonResponse;
use crate::provider::{Provider, Reply, RequestContext};
use crate::schema::{
    AddonManifest, CacheHints, Catalog, Meta, MetaItem, MetaPreviewList, Stream, StreamList, Subtitles,
    SubtitlesList,
};

/// Catalog page size, matching what clients expect when paging with `skip`.
pub const PAGE_SIZE: usize = 100;

/// Minimum Jaro-Winkler similarity for a fuzzy search hit.
pub const FUZZY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub manifest: AddonManifest,
    #[serde(default)]
    pub metas: Vec<Meta>,
    #[serde(default)]
    pub streams: BTreeMap<String, Vec<Stream>>,
    #[serde(default)]
    pub subtitles: BTreeMap<String, Vec<Subtitles>>,
    #[serde(default)]
    pub cache: CacheHints,
    /// Accepted access tokens. Non-empty makes the provider secured.
    #[serde(default)]
    pub tokens: Vec<String>,
    /// HTML served at `/configure`; a generated page is used when absent.
    #[serde(default)]
    pub configure_page: Option<String>,
}

impl Bundle {
    /// Load and validate a bundle. `.json` files are JSON, anything else TOML.
    pub fn load(path: &Path) -> Result<Self, BundleError> {
        let content = std::fs::read_to_string(path).map_err(|source| BundleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let bundle = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn from_toml(content: &str) -> Result<Self, BundleError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, BundleError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), BundleError> {
        self.manifest.validate()?;

        let mut ids = HashSet::new();
        for meta in &self.metas {
            if !ids.insert(meta.id.as_str()) {
                return Err(BundleError::DuplicateMeta(meta.id.clone()));
            }
        }

        for (video_id, streams) in &self.streams {
            if let Some(index) = streams.iter().position(|s| s.source().is_none()) {
                return Err(BundleError::InvalidStream {
                    video_id: video_id.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    pub fn is_secured(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Catalog page for `args`, or `None` when the catalog does not exist.
    pub fn catalog_page(&self, args: &ResourceArgs) -> Option<MetaPreviewList> {
        self.manifest.catalog(args.content_type, &args.id)?;

        let genres: Vec<String> = args.extra_all(crate::schema::extra::GENRE).map(fold).collect();
        let search = args.search().map(fold).filter(|q| !q.is_empty());

        let metas = self
            .metas
            .iter()
            .filter(|m| m.content_type == args.content_type)
            .filter(|m| genres.is_empty() || m.genres.iter().any(|g| genres.contains(&fold(g))))
            .filter(|m| search.as_deref().map_or(true, |q| matches_search(q, &m.name)))
            .skip(args.skip())
            .take(PAGE_SIZE)
            .map(Meta::preview)
            .collect();

        Some(MetaPreviewList::new(metas).with_cache(self.cache))
    }

    pub fn find_meta(&self, args: &ResourceArgs) -> Option<MetaItem> {
        self.metas
            .iter()
            .find(|m| m.id == args.id && m.content_type == args.content_type)
            .map(|m| MetaItem::new(m.clone()).with_cache(self.cache))
    }

    pub fn streams_for(&self, video_id: &str) -> StreamList {
        let streams = self.streams.get(video_id).cloned().unwrap_or_default();
        StreamList::new(streams).with_cache(self.cache)
    }

    pub fn subtitles_for(&self, video_id: &str) -> SubtitlesList {
        let subtitles = self.subtitles.get(video_id).cloned().unwrap_or_default();
        SubtitlesList::new(subtitles).with_cache(self.cache)
    }

    /// Whether the raw token segment, once percent-decoded, is on the allow-list.
    pub fn accepts_token(&self, raw: &str) -> bool {
        match percent_decode_str(raw).decode_utf8() {
            Ok(token) => self.tokens.iter().any(|t| t.as_str() == &*token),
            Err(_) => false,
        }
    }

    fn default_configure_page(&self) -> String {
        let m = &self.manifest;
        let token_field = if self.is_secured() {
            r#"<label>Access token <input id="token" required></label>"#
        } else {
            ""
        };
        format!(
            concat!(
                "<!doctype html><html><head><meta charset=\"utf-8\"><title>{name}</title></head>",
                "<body><h1>{name}</h1><p>{description}</p>",
                "<form onsubmit=\"var t=document.getElementById('token');",
                "location.href=(t?'/'+encodeURIComponent(t.value):'')+'/manifest.json';return false;\">",
                "{token_field}<button type=\"submit\">Install</button></form></body></html>"
            ),
            name = escape_html(&m.name),
            description = escape_html(&m.description),
            token_field = token_field,
        )
    }
}

/// Case- and accent-insensitive form used for search and genre matching.
fn fold(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Required extras are present, none is given more often than its options
/// limit, and values stay within the declared options (compared folded).
fn check_extras(catalog: &Catalog, args: &ResourceArgs) -> Result<(), String> {
    for declared in &catalog.extra {
        let values: Vec<&str> = args.extra_all(&declared.name).collect();
        if declared.is_required && values.is_empty() {
            return Err(format!("Missing required extra argument {:?}", declared.name));
        }
        let limit = declared.options_limit();
        if values.len() > limit as usize {
            return Err(format!(
                "Extra argument {:?} accepts at most {} value(s)",
                declared.name, limit
            ));
        }
        if declared.options.is_empty() {
            continue;
        }
        if let Some(value) = values
            .iter()
            .copied()
            .find(|v| !declared.options.iter().any(|o| fold(o) == fold(v)))
        {
            return Err(format!("{:?} is not an option of extra argument {:?}", value, declared.name));
        }
    }
    Ok(())
}

/// `query` must already be folded.
fn matches_search(query: &str, name: &str) -> bool {
    let name = fold(name);
    name.contains(query)
        || strsim::jaro_winkler(query, &name) >= FUZZY_THRESHOLD
        || name
            .split_whitespace()
            .any(|word| strsim::jaro_winkler(query, word) >= FUZZY_THRESHOLD)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Provider over a bundle, reloadable in place
// ---------------------------------------------------------------------------

pub struct BundleProvider {
    path: Option<PathBuf>,
    state: RwLock<Arc<Bundle>>,
}

impl BundleProvider {
    /// Serve an in-memory bundle. Call [`Bundle::validate`] first if it was built by hand.
    pub fn new(bundle: Bundle) -> Self {
        Self {
            path: None,
            state: RwLock::new(Arc::new(bundle)),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref().to_path_buf();
        let bundle = Bundle::load(&path)?;
        tracing::info!(
            path = %path.display(),
            id = %bundle.manifest.id,
            metas = bundle.metas.len(),
            secured = bundle.is_secured(),
            "loaded addon bundle"
        );
        Ok(Self {
            path: Some(path),
            state: RwLock::new(Arc::new(bundle)),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The bundle currently served. Reloads swap it without touching this copy.
    pub fn snapshot(&self) -> Arc<Bundle> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the bundle file. On error the previous bundle stays in place.
    pub fn reload(&self) -> Result<(), BundleError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bundle = Bundle::load(path)?;
        tracing::info!(path = %path.display(), metas = bundle.metas.len(), "reloaded addon bundle");
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(bundle);
        Ok(())
    }
}

impl Bundle {
    /// Checks the token; writes a 401 when it is not accepted.
    fn authorize(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> bool {
        if self.is_secured() && !self.accepts_token(ctx.token()) {
            tracing::warn!(path = %ctx.resource_path(), "rejected request with unknown access token");
            res.error(StatusCode::UNAUTHORIZED, "Unknown access token");
            return false;
        }
        true
    }

    /// Decoded arguments of an authorized request; writes the error response otherwise.
    fn resolve(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Option<ResourceArgs> {
        if !self.authorize(ctx, res) {
            return None;
        }
        match ctx.args() {
            Ok(args) => Some(args),
            Err(e) => {
                res.error(StatusCode::BAD_REQUEST, &e.to_string());
                None
            }
        }
    }
}

impl Provider for Bundle {
    fn manifest(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<AddonManifest> {
        if !self.authorize(ctx, res) {
            return Reply::NoContent;
        }
        Reply::Payload(self.manifest.clone())
    }

    fn catalog(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<MetaPreviewList> {
        let Some(args) = self.resolve(ctx, res) else {
            return Reply::NoContent;
        };
        let Some(catalog) = self.manifest.catalog(args.content_type, &args.id) else {
            res.error(StatusCode::NOT_FOUND, "Catalog not found");
            return Reply::NoContent;
        };
        if let Err(message) = check_extras(catalog, &args) {
            res.error(StatusCode::BAD_REQUEST, &message);
            return Reply::NoContent;
        }
        match self.catalog_page(&args) {
            Some(page) => Reply::Payload(page),
            None => Reply::NoContent,
        }
    }

    fn meta(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<MetaItem> {
        let Some(args) = self.resolve(ctx, res) else {
            return Reply::NoContent;
        };
        match self.find_meta(&args) {
            Some(item) => Reply::Payload(item),
            None => {
                res.error(StatusCode::NOT_FOUND, "Meta not found");
                Reply::NoContent
            }
        }
    }

    fn stream(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<StreamList> {
        match self.resolve(ctx, res) {
            Some(args) => Reply::Payload(self.streams_for(&args.id)),
            None => Reply::NoContent,
        }
    }

    fn subtitles(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<SubtitlesList> {
        match self.resolve(ctx, res) {
            Some(args) => Reply::Payload(self.subtitles_for(&args.id)),
            None => Reply::NoContent,
        }
    }

    fn render_configure_page(&self, _ctx: &RequestContext<'_>, res: &mut AddonResponse) {
        match &self.configure_page {
            Some(html) => res.html(html),
            None => res.html(&self.default_configure_page()),
        }
    }

    fn is_secured(&self) -> bool {
        Bundle::is_secured(self)
    }
}

/// Each request is served from the snapshot taken when it arrives; see
/// [`Provider::request_view`].
impl Provider for BundleProvider {
    fn manifest(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<AddonManifest> {
        self.snapshot().manifest(ctx, res)
    }

    fn catalog(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<MetaPreviewList> {
        self.snapshot().catalog(ctx, res)
    }

    fn meta(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<MetaItem> {
        self.snapshot().meta(ctx, res)
    }

    fn stream(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<StreamList> {
        self.snapshot().stream(ctx, res)
    }

    fn subtitles(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) -> Reply<SubtitlesList> {
        self.snapshot().subtitles(ctx, res)
    }

    fn render_configure_page(&self, ctx: &RequestContext<'_>, res: &mut AddonResponse) {
        self.snapshot().render_configure_page(ctx, res)
    }

    fn is_secured(&self) -> bool {
        self.snapshot().is_secured()
    }

    fn request_view(&self) -> Option<Arc<dyn Provider>> {
        let view: Arc<dyn Provider> = self.snapshot();
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::AddonRequest;
    use crate::router::route;
    use crate::schema::ContentType;
    use pretty_assertions::assert_eq;

    const BUNDLE: &str = r#"
[cache]
cacheMaxAge = 3600

[manifest]
id = "org.example.films"
version = "1.0.0"
name = "Films"
description = "Public domain films"
resources = ["catalog", "meta", "stream", { name = "subtitles", types = ["movie"] }]
types = ["movie", "series"]

[[manifest.catalogs]]
id = "top"
type = "movie"
name = "Top"
extra = [{ name = "search" }, { name = "genre", options = ["Drama", "Horror"] }, { name = "skip" }]

[[manifest.catalogs]]
id = "search"
type = "series"
name = "Series search"
extra = [{ name = "search", isRequired = true }]

[[metas]]
id = "pd:nosferatu"
type = "movie"
name = "Nosferatu"
genres = ["Horror"]

[[metas]]
id = "pd:metropolis"
type = "movie"
name = "Métropolis"
genres = ["Drama", "Sci-Fi"]
poster = "https://img.example.org/metropolis.png"

[[metas]]
id = "pd:caligari"
type = "movie"
name = "The Cabinet of Dr. Caligari"
genres = ["horror"]

[[metas]]
id = "pd:flash-gordon"
type = "series"
name = "Flash Gordon"

[[streams."pd:nosferatu"]]
url = "https://cdn.example.org/nosferatu.mp4"
name = "720p"

[[subtitles."pd:nosferatu"]]
id = "en-1"
url = "https://subs.example.org/nosferatu.srt"
lang = "eng"
"#;

    fn bundle() -> Bundle {
        let b = Bundle::from_toml(BUNDLE).unwrap();
        b.validate().unwrap();
        b
    }

    fn page(b: &Bundle, path: &str) -> Vec<String> {
        let args = ResourceArgs::parse(path).unwrap();
        b.catalog_page(&args)
            .unwrap()
            .metas
            .into_iter()
            .map(|m| m.id)
            .collect()
    }

    fn get(provider: &BundleProvider, target: &str) -> AddonResponse {
        route(&AddonRequest::get(target), provider)
    }

    #[test]
    fn parses_toml_bundle() {
        let b = bundle();
        assert_eq!(b.metas.len(), 4);
        assert_eq!(b.cache.cache_max_age, 3600);
        assert_eq!(b.manifest.resources[3].types, vec![ContentType::Movie]);
        assert!(!b.is_secured());
    }

    #[test]
    fn catalog_filters_by_type_and_keeps_order() {
        let b = bundle();
        assert_eq!(
            page(&b, "/catalog/movie/top.json"),
            vec!["pd:nosferatu", "pd:metropolis", "pd:caligari"]
        );
        assert_eq!(page(&b, "/catalog/series/search/search=flash.json"), vec!["pd:flash-gordon"]);
    }

    #[test]
    fn unknown_catalog_has_no_page() {
        let b = bundle();
        let args = ResourceArgs::parse("/catalog/movie/popular.json").unwrap();
        assert!(b.catalog_page(&args).is_none());
    }

    #[test]
    fn genre_filter_ignores_case() {
        let b = bundle();
        assert_eq!(page(&b, "/catalog/movie/top/genre=Horror.json"), vec!["pd:nosferatu", "pd:caligari"]);
    }

    #[test]
    fn search_folds_accents_and_tolerates_typos() {
        let b = bundle();
        assert_eq!(page(&b, "/catalog/movie/top/search=metropolis.json"), vec!["pd:metropolis"]);
        assert_eq!(page(&b, "/catalog/movie/top/search=CALIGARI.json"), vec!["pd:caligari"]);
        assert_eq!(page(&b, "/catalog/movie/top/search=nosferatou.json"), vec!["pd:nosferatu"]);
        assert!(page(&b, "/catalog/movie/top/search=zzzz.json").is_empty());
    }

    #[test]
    fn skip_paginates() {
        let b = bundle();
        assert_eq!(page(&b, "/catalog/movie/top/skip=2.json"), vec!["pd:caligari"]);
        assert!(page(&b, "/catalog/movie/top/skip=100.json").is_empty());
    }

    #[test]
    fn pages_are_capped() {
        let mut b = bundle();
        b.metas = (0..250)
            .map(|i| Meta::new(format!("pd:{i}"), ContentType::Movie, format!("Film {i}")))
            .collect();
        assert_eq!(page(&b, "/catalog/movie/top.json").len(), PAGE_SIZE);
        let last = page(&b, "/catalog/movie/top/skip=200.json");
        assert_eq!(last.len(), 50);
        assert_eq!(last[0], "pd:200");
    }

    #[test]
    fn validation_catches_duplicates_and_bad_streams() {
        let mut b = bundle();
        b.metas.push(b.metas[0].clone());
        assert!(matches!(b.validate(), Err(BundleError::DuplicateMeta(_))));

        let mut b = bundle();
        b.streams.insert("pd:x".to_string(), vec![Stream::default()]);
        assert!(matches!(b.validate(), Err(BundleError::InvalidStream { index: 0, .. })));
    }

    #[test]
    fn load_reads_json_and_toml_files() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("bundle.toml");
        std::fs::write(&toml_path, BUNDLE).unwrap();
        let from_toml = Bundle::load(&toml_path).unwrap();

        let json_path = dir.path().join("bundle.json");
        std::fs::write(&json_path, serde_json::to_string(&from_toml).unwrap()).unwrap();
        let from_json = Bundle::load(&json_path).unwrap();
        assert_eq!(from_json, from_toml);

        let err = Bundle::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, BundleError::Read { .. }));
    }

    #[test]
    fn provider_serves_resources_through_router() {
        let provider = BundleProvider::new(bundle());

        let res = get(&provider, "/meta/movie/pd:nosferatu.json");
        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["meta"]["name"], "Nosferatu");
        assert_eq!(json["cacheMaxAge"], 3600);

        let res = get(&provider, "/stream/movie/pd:nosferatu.json");
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["streams"][0]["name"], "720p");

        let res = get(&provider, "/stream/movie/pd:unknown.json");
        assert_eq!(res.body(), br#"{"streams":[],"cacheMaxAge":3600}"#);

        let res = get(&provider, "/subtitles/movie/pd:nosferatu.json");
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["subtitles"][0]["id"], "en-1");
    }

    #[test]
    fn provider_reports_missing_items_itself() {
        let provider = BundleProvider::new(bundle());

        let res = get(&provider, "/meta/movie/pd:unknown.json");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), b"Meta not found");

        let res = get(&provider, "/catalog/movie/popular.json");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = get(&provider, "/catalog/series/search.json");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = get(&provider, "/meta/anime/x.json");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn tokens_secure_the_provider() {
        let mut b = bundle();
        b.tokens = vec!["letmein".to_string()];
        let provider = BundleProvider::new(b);
        assert!(provider.is_secured());

        let res = get(&provider, "/letmein/manifest.json");
        assert_eq!(res.status(), StatusCode::OK);

        let res = get(&provider, "/wrong/manifest.json");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.header(http::header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let res = get(&provider, "/manifest.json");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn tokens_are_percent_decoded_before_comparison() {
        let mut b = bundle();
        b.tokens = vec!["my key".to_string(), "clé".to_string()];
        let provider = BundleProvider::new(b);

        assert_eq!(get(&provider, "/my%20key/manifest.json").status(), StatusCode::OK);
        assert_eq!(get(&provider, "/cl%C3%A9/stream/movie/pd:nosferatu.json").status(), StatusCode::OK);
        assert_eq!(get(&provider, "/my%20keys/manifest.json").status(), StatusCode::UNAUTHORIZED);
        // Not valid UTF-8 once decoded.
        assert_eq!(get(&provider, "/my%FFkey/manifest.json").status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn catalog_extras_are_checked_against_declaration() {
        let provider = BundleProvider::new(bundle());

        let res = get(&provider, "/catalog/movie/top/genre=horror.json");
        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["metas"].as_array().unwrap().len(), 2);

        let res = get(&provider, "/catalog/movie/top/genre=Western.json");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.body(), br#""Western" is not an option of extra argument "genre""#);

        let res = get(&provider, "/catalog/movie/top/genre=Drama&genre=Horror.json");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.body(), br#"Extra argument "genre" accepts at most 1 value(s)"#);

        let res = get(&provider, "/catalog/movie/top/search=a&search=b.json");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = get(&provider, "/catalog/series/search.json");
        assert_eq!(res.body(), br#"Missing required extra argument "search""#);
    }

    #[test]
    fn options_limit_allows_several_values() {
        let mut b = bundle();
        b.manifest.catalogs[0].extra[1].options_limit = 2;
        let provider = BundleProvider::new(b);
        let res = get(&provider, "/catalog/movie/top/genre=Drama&genre=Horror.json");
        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["metas"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn request_view_keeps_one_bundle_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.toml");
        std::fs::write(&path, BUNDLE).unwrap();
        let provider = BundleProvider::open(&path).unwrap();
        let view = provider.request_view().unwrap();

        std::fs::write(&path, format!("tokens = [\"letmein\"]\n{BUNDLE}")).unwrap();
        provider.reload().unwrap();
        assert!(provider.is_secured());
        assert!(!view.is_secured());

        // The request that took the view before the reload finishes unsecured.
        let res = route(&AddonRequest::get("/manifest.json"), view.as_ref());
        assert_eq!(res.status(), StatusCode::OK);
        // New requests see the reloaded bundle.
        assert_eq!(get(&provider, "/manifest.json").status(), StatusCode::BAD_REQUEST);
        assert_eq!(get(&provider, "/letmein/manifest.json").status(), StatusCode::OK);
    }

    #[test]
    fn configure_page_defaults_to_generated_form() {
        let mut b = bundle();
        b.manifest.name = "Films <&>".to_string();
        let provider = BundleProvider::new(b);
        let res = get(&provider, "/configure");
        let html = std::str::from_utf8(res.body()).unwrap();
        assert!(html.contains("<h1>Films &lt;&amp;&gt;</h1>"));
        assert!(!html.contains("id=\"token\""));

        let mut b = bundle();
        b.configure_page = Some("<p>custom</p>".to_string());
        let res = get(&BundleProvider::new(b), "/configure");
        assert_eq!(res.body(), b"<p>custom</p>");
    }

    #[test]
    fn reload_swaps_bundle_and_keeps_old_one_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.toml");
        std::fs::write(&path, BUNDLE).unwrap();
        let provider = BundleProvider::open(&path).unwrap();
        let before = provider.snapshot();

        std::fs::write(&path, BUNDLE.replace("name = \"Films\"", "name = \"Films v2\"")).unwrap();
        provider.reload().unwrap();
        assert_eq!(provider.snapshot().manifest.name, "Films v2");
        assert_eq!(before.manifest.name, "Films");

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(provider.reload().is_err());
        assert_eq!(provider.snapshot().manifest.name, "Films v2");
    }
}
