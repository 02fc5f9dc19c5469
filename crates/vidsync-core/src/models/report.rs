//! Reconciliation outcomes: per-video resolution results, findings, and the
//! per-course report.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Outcome of resolving one descriptor against the registry working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        canonical_id: String,
    },
    /// No strategy produced an identifier. Carries the best-effort token that
    /// was tried, for diagnostics.
    Unresolved {
        tried_token: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    IdentityMismatch,
    IdentifierAssigned,
    YoutubeUrlMismatch,
    MissingProfiles,
    ProfileLookupFailed,
    DescriptorUnreadable,
}

/// A structured, non-fatal observation emitted during reconciliation for
/// operator review. Findings never abort processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub course_id: String,
    pub kind: FindingKind,
    pub message: String,
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}: {}", self.severity, self.course_id, self.message)
    }
}

/// Triage fields for a video that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedVideo {
    pub url_name: String,
    pub youtube_id: Option<String>,
    pub display_name: String,
}

/// Per-course processing context: counters, the not-found list, and the
/// accumulated findings. Passed by mutable reference through the transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseReport {
    pub course_id: String,
    /// Total archive entries streamed, videos and pass-through alike.
    pub entries_total: usize,
    /// Count of video entries that were rewritten with a resolved identifier.
    pub videos_processed: usize,
    pub not_found: Vec<UnresolvedVideo>,
    pub findings: Vec<Finding>,
}

impl CourseReport {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            ..Self::default()
        }
    }

    /// Render the report as an append-friendly text block for the operator
    /// log: findings first, then the missing-video table, then the counts.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(70));
        for finding in &self.findings {
            let _ = writeln!(out, "{}", finding);
        }
        if !self.not_found.is_empty() {
            let _ = writeln!(
                out,
                "{}: {} Missing videos:",
                self.course_id,
                self.not_found.len()
            );
            for video in &self.not_found {
                let _ = writeln!(
                    out,
                    "\turl_name:\"{}\"\tyoutube_id:\"{}\"\tdisplay_name:\"{}\"",
                    video.url_name,
                    video.youtube_id.as_deref().unwrap_or(""),
                    video.display_name
                );
            }
        }
        let _ = writeln!(
            out,
            "{}: {} videos processed across {} entries",
            self.course_id, self.videos_processed, self.entries_total
        );
        out
    }
}
