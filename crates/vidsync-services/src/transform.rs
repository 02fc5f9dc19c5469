//! Archive transform engine.
//!
//! Streams a gzip-compressed course export entry by entry, rewrites video
//! descriptors with resolved identifiers, passes every other entry through
//! verbatim, and accumulates the per-course report. Entry count and order
//! are preserved; a failure on one video degrades to pass-through for that
//! entry only.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Component;
use std::sync::Arc;
use tar::{Archive, Builder};
use thiserror::Error;

use vidsync_core::models::{
    course_id_from_manifest, rewrite_video_id, CanonicalVideoRecord, CourseReport, Finding,
    FindingKind, Resolution, Severity, UnresolvedVideo, VideoDescriptor,
};
use vidsync_core::DescriptorError;
use vidsync_registry::{RegistryApi, RegistryError};

use crate::{reporter, resolver};

/// Path segment marking video descriptor entries.
const VIDEO_MARKER: &str = "/video/";

/// Transform operation errors. `CorruptArchive`, `Registry`, and `Manifest`
/// failures are fatal to the course being processed; the caller logs them and
/// moves on to the next course in a batch.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Corrupt archive: {source}")]
    CorruptArchive {
        #[source]
        source: io::Error,
    },

    #[error("No course.xml manifest in archive")]
    MissingManifest,

    #[error("Unreadable course manifest: {0}")]
    Manifest(#[from] DescriptorError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Archive I/O error: {0}")]
    Io(#[from] io::Error),
}

fn corrupt(source: io::Error) -> TransformError {
    TransformError::CorruptArchive { source }
}

/// One-course reconciliation pass over an exported archive.
pub struct CourseTransformer {
    registry: Arc<dyn RegistryApi>,
}

impl CourseTransformer {
    pub fn new(registry: Arc<dyn RegistryApi>) -> Self {
        Self { registry }
    }

    /// Transform an exported course archive.
    ///
    /// When no `course_hint` is given, a bounded first pass locates the
    /// `course.xml` manifest to derive the course identifier, then the input
    /// is rewound for the single transform pass. The rewritten archive is
    /// built in memory and returned together with the report; nothing is
    /// produced when a fatal error aborts the course.
    pub async fn transform<R: Read + Seek>(
        &self,
        mut input: R,
        course_hint: Option<&str>,
    ) -> Result<(Vec<u8>, CourseReport), TransformError> {
        let course_id = match course_hint {
            Some(id) => id.to_string(),
            None => {
                let id = course_id_from_archive(&mut input)?;
                input.seek(SeekFrom::Start(0))?;
                id
            }
        };
        tracing::info!(course_id = %course_id, "processing course");

        let records = self.registry.list_course_videos(&course_id).await?;
        let mut report = CourseReport::new(course_id.as_str());

        let mut archive = Archive::new(GzDecoder::new(input));
        let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

        for entry in archive.entries().map_err(corrupt)? {
            let mut entry = entry.map_err(corrupt)?;
            let path = entry.path().map_err(corrupt)?.into_owned();
            let mut header = entry.header().clone();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data).map_err(corrupt)?;
            report.entries_total += 1;

            let rewritten = if path.to_string_lossy().contains(VIDEO_MARKER) {
                self.process_video(
                    &path.to_string_lossy(),
                    &data,
                    &records,
                    &course_id,
                    &mut report,
                )
                .await
            } else {
                None
            };

            match rewritten {
                Some(new_data) => builder.append_data(&mut header, &path, new_data.as_slice())?,
                None => builder.append_data(&mut header, &path, data.as_slice())?,
            }
        }

        let output = builder.into_inner()?.finish()?;

        if !report.not_found.is_empty() {
            tracing::warn!(
                course_id = %course_id,
                missing = report.not_found.len(),
                "videos missing from the registry"
            );
        }
        tracing::info!(
            course_id = %course_id,
            videos = report.videos_processed,
            entries = report.entries_total,
            "course processed"
        );

        Ok((output, report))
    }

    /// Resolve, evaluate, and rewrite one video entry. Returns the new
    /// payload, or `None` when the entry must pass through unchanged.
    async fn process_video(
        &self,
        name: &str,
        data: &[u8],
        records: &[CanonicalVideoRecord],
        course_id: &str,
        report: &mut CourseReport,
    ) -> Option<Vec<u8>> {
        let descriptor = match VideoDescriptor::parse(data) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                tracing::warn!(entry = name, error = %err, "unreadable video descriptor");
                report.findings.push(Finding {
                    severity: Severity::Warning,
                    course_id: course_id.to_string(),
                    kind: FindingKind::DescriptorUnreadable,
                    message: format!("could not parse video descriptor {}: {}", name, err),
                });
                return None;
            }
        };

        match resolver::resolve(&descriptor, records) {
            Resolution::Unresolved { tried_token } => {
                tracing::warn!(
                    url_name = %descriptor.url_name,
                    tried_token = %tried_token,
                    "no edx_video_id found"
                );
                report.not_found.push(UnresolvedVideo {
                    url_name: descriptor.url_name,
                    youtube_id: descriptor.youtube_id,
                    display_name: descriptor.display_name,
                });
                None
            }
            Resolution::Resolved { canonical_id } => {
                report
                    .findings
                    .extend(reporter::evaluate(&descriptor, &canonical_id, records, course_id));

                match reporter::check_profiles(self.registry.as_ref(), course_id, &canonical_id)
                    .await
                {
                    Ok(Some(finding)) => report.findings.push(finding),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(
                            edx_video_id = %canonical_id,
                            error = %err,
                            "profile lookup failed"
                        );
                        report.findings.push(Finding {
                            severity: Severity::Warning,
                            course_id: course_id.to_string(),
                            kind: FindingKind::ProfileLookupFailed,
                            message: format!(
                                "profile lookup failed for {}: {}",
                                canonical_id, err
                            ),
                        });
                    }
                }

                match rewrite_video_id(data, &canonical_id) {
                    Ok(new_xml) => {
                        report.videos_processed += 1;
                        Some(new_xml)
                    }
                    Err(err) => {
                        report.findings.push(Finding {
                            severity: Severity::Warning,
                            course_id: course_id.to_string(),
                            kind: FindingKind::DescriptorUnreadable,
                            message: format!(
                                "could not rewrite video descriptor {}: {}",
                                name, err
                            ),
                        });
                        None
                    }
                }
            }
        }
    }
}

/// Re-archive an export verbatim, entry for entry. Used to snapshot a course
/// before conversion.
pub fn copy_archive<R: Read>(input: R) -> Result<Vec<u8>, TransformError> {
    let mut archive = Archive::new(GzDecoder::new(input));
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let path = entry.path().map_err(corrupt)?.into_owned();
        let mut header = entry.header().clone();
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data).map_err(corrupt)?;
        builder.append_data(&mut header, &path, data.as_slice())?;
    }

    Ok(builder.into_inner()?.finish()?)
}

/// Derive the course identifier from `<first top-level dir>/course.xml`.
fn course_id_from_archive<R: Read>(input: &mut R) -> Result<String, TransformError> {
    let mut archive = Archive::new(GzDecoder::new(input));
    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let is_manifest = {
            let path = entry.path().map_err(corrupt)?;
            let mut components = path.components();
            matches!(
                (components.next(), components.next(), components.next()),
                (Some(Component::Normal(_)), Some(Component::Normal(name)), None)
                    if name.to_str() == Some("course.xml")
            )
        };
        if is_manifest {
            let mut xml = Vec::new();
            entry.read_to_end(&mut xml).map_err(corrupt)?;
            return Ok(course_id_from_manifest(&xml)?);
        }
    }
    Err(TransformError::MissingManifest)
}
