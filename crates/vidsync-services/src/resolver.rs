//! Identifier resolver.
//!
//! Resolves one video descriptor against the course's registry working set
//! through a fixed fallback chain. The chain trades strict correctness for
//! coverage: any plausible identifier beats leaving a video orphaned, and
//! every non-exact resolution is surfaced downstream as a finding.

use vidsync_core::models::{CanonicalVideoRecord, Resolution, VideoDescriptor};

/// Resolve a descriptor to a canonical identifier. Pure function of its
/// inputs; strategies are tried in strict order and the first success wins.
///
/// 1. Client-id match on `legacy_id`.
/// 2. Youtube match on the `"youtube"` variant URL.
/// 3. Client-id match on the token parsed from the first source URL.
/// 4. Malformed candidates from 1-3 are discarded, not returned.
/// 5. Client-id match on the source filename stem, then with `_` as `-`.
/// 6. A non-empty `legacy_id` is accepted verbatim as a last resort, even
///    when it matched nothing in the registry.
pub fn resolve(descriptor: &VideoDescriptor, records: &[CanonicalVideoRecord]) -> Resolution {
    let mut candidate = None;

    if !descriptor.legacy_id.is_empty() {
        candidate = find_by_client_id(records, &descriptor.legacy_id);
    }

    if candidate.is_none() {
        if let Some(youtube_id) = descriptor.youtube_id.as_deref() {
            candidate = find_by_youtube(records, youtube_id);
        }
    }

    // First non-empty alternate source in document order, else the primary.
    let source = descriptor
        .alternate_source_urls
        .iter()
        .find(|url| !url.is_empty())
        .map(String::as_str)
        .or(descriptor.primary_source_url.as_deref())
        .unwrap_or("");

    if candidate.is_none() && !source.is_empty() {
        candidate = find_by_client_id(records, &id_token_from_url(source));
    }

    match candidate {
        Some(id) if is_well_formed_id(&id) => {
            return Resolution::Resolved { canonical_id: id };
        }
        _ => {}
    }

    let stem = filename_stem(source);
    if let Some(id) = find_by_client_id(records, &stem)
        .or_else(|| find_by_client_id(records, &stem.replace('_', "-")))
    {
        return Resolution::Resolved { canonical_id: id };
    }

    if !descriptor.legacy_id.is_empty() {
        return Resolution::Resolved {
            canonical_id: descriptor.legacy_id.clone(),
        };
    }

    Resolution::Unresolved { tried_token: stem }
}

fn find_by_client_id(records: &[CanonicalVideoRecord], client_id: &str) -> Option<String> {
    if client_id.is_empty() {
        return None;
    }
    records
        .iter()
        .find(|record| record.client_id == client_id)
        .map(|record| record.canonical_id.clone())
}

fn find_by_youtube(records: &[CanonicalVideoRecord], youtube_id: &str) -> Option<String> {
    records
        .iter()
        .find(|record| {
            record
                .youtube_url()
                .map(|url| url.trim() == youtube_id)
                .unwrap_or(false)
        })
        .map(|record| record.canonical_id.clone())
}

/// Candidate token from a source URL: last path segment, prefix before the
/// first underscore.
pub fn id_token_from_url(url: &str) -> String {
    let segment = url.rsplit('/').next().unwrap_or(url);
    segment.split('_').next().unwrap_or(segment).to_string()
}

/// Trailing filename segment with the final extension stripped.
pub fn filename_stem(url: &str) -> String {
    let segment = url.rsplit('/').next().unwrap_or(url);
    match segment.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => segment.to_string(),
    }
}

/// A usable canonical id is exactly 20 or 36 characters with no `.`.
pub fn is_well_formed_id(id: &str) -> bool {
    (id.len() == 20 || id.len() == 36) && !id.contains('.')
}
