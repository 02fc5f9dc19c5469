//! Canonical registry records.
//!
//! Wire names follow the registry API (`edx_video_id`, `client_video_id`,
//! `encoded_videos`); struct fields follow the domain vocabulary.

use serde::{Deserialize, Serialize};

/// One delivery format of a video: a (profile, url) pair. Profile names are
/// an open-ended vocabulary, not a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedVariant {
    pub profile: String,
    pub url: String,
}

/// The registry's authoritative entry for one video asset. Records fetched
/// for a course form a read-only working set for that course's processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalVideoRecord {
    #[serde(rename = "edx_video_id")]
    pub canonical_id: String,
    /// Free-form legacy identifier supplied at ingestion time. May differ
    /// from `canonical_id`.
    #[serde(rename = "client_video_id", default)]
    pub client_id: String,
    #[serde(rename = "encoded_videos", default)]
    pub encoded_variants: Vec<EncodedVariant>,
}

impl CanonicalVideoRecord {
    /// URL of the `"youtube"` encoded variant, if present.
    pub fn youtube_url(&self) -> Option<&str> {
        self.encoded_variants
            .iter()
            .find(|variant| variant.profile == "youtube")
            .map(|variant| variant.url.as_str())
    }
}
