//! Discrepancy reporter.
//!
//! Pure, read-only checks comparing a resolved descriptor against the
//! registry. Everything here is observational: findings never abort the
//! transform.

use vidsync_core::models::{
    CanonicalVideoRecord, Finding, FindingKind, Severity, VideoDescriptor,
};
use vidsync_registry::{RegistryApi, RegistryError};

/// Profiles that count as baseline coverage. Anything else a record carries
/// is reported for review.
pub const EXPECTED_PROFILES: [&str; 5] = [
    "mobile_high",
    "mobile_low",
    "youtube",
    "desktop_mp4",
    "audio_mp3",
];

/// Legacy format no longer required; excluded from the coverage check.
const DEPRECATED_PROFILE: &str = "desktop_webm";

/// Compare a resolved identifier against the descriptor and the course's
/// registry working set.
pub fn evaluate(
    descriptor: &VideoDescriptor,
    canonical_id: &str,
    records: &[CanonicalVideoRecord],
    course_id: &str,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if descriptor.legacy_id.is_empty() {
        findings.push(Finding {
            severity: Severity::Info,
            course_id: course_id.to_string(),
            kind: FindingKind::IdentifierAssigned,
            message: format!(
                "assigned edx_video_id {} to {}",
                canonical_id, descriptor.url_name
            ),
        });
    } else if descriptor.legacy_id != canonical_id {
        findings.push(Finding {
            severity: Severity::Error,
            course_id: course_id.to_string(),
            kind: FindingKind::IdentityMismatch,
            message: format!(
                "mismatching edx_video_ids - archive: {} registry: {}",
                descriptor.legacy_id, canonical_id
            ),
        });
    }

    // The archive's youtube URL stays authoritative in the rewrite; registry
    // links may be stale relative to a freshly re-exported course.
    if let Some(youtube_id) = descriptor.youtube_id.as_deref() {
        if let Some(record) = records.iter().find(|r| r.canonical_id == canonical_id) {
            if let Some(url) = record.youtube_url() {
                if url.trim() != youtube_id {
                    findings.push(Finding {
                        severity: Severity::Error,
                        course_id: course_id.to_string(),
                        kind: FindingKind::YoutubeUrlMismatch,
                        message: format!(
                            "mismatching youtube URLs for edx_video_id: {} - archive: {} registry: {}",
                            canonical_id, youtube_id, url
                        ),
                    });
                }
            }
        }
    }

    findings
}

/// Look up the single registry record for `canonical_id` and report any
/// encoded profile outside the baseline coverage set. The deprecated
/// `desktop_webm` profile is ignored. Lookup failures are returned to the
/// caller, which treats them as non-fatal.
pub async fn check_profiles(
    registry: &dyn RegistryApi,
    course_id: &str,
    canonical_id: &str,
) -> Result<Option<Finding>, RegistryError> {
    let record = registry.get_video(canonical_id).await?;

    let mut unexpected: Vec<&str> = Vec::new();
    for variant in &record.encoded_variants {
        let profile = variant.profile.as_str();
        if profile == DEPRECATED_PROFILE {
            continue;
        }
        if !EXPECTED_PROFILES.contains(&profile) && !unexpected.contains(&profile) {
            unexpected.push(profile);
        }
    }

    if unexpected.is_empty() {
        return Ok(None);
    }
    Ok(Some(Finding {
        severity: Severity::Warning,
        course_id: course_id.to_string(),
        kind: FindingKind::MissingProfiles,
        message: format!(
            "video with edx_video_id {} has profiles outside baseline coverage: {}",
            canonical_id,
            unexpected.join(",")
        ),
    }))
}
