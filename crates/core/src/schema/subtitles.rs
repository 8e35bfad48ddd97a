use serde::{Deserialize, Serialize};

/// A subtitle track. `id` tells apart tracks sharing a language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitles {
    pub id: String,
    pub url: String,
    /// ISO 639-2 code; any other text is shown verbatim.
    pub lang: String,
}
