//! Vidsync Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all vidsync components: video descriptors parsed from course
//! archives, canonical registry records, and the per-course reconciliation
//! report.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::RegistryConfig;
pub use error::DescriptorError;
pub use models::{
    course_id_from_manifest, rewrite_video_id, CanonicalVideoRecord, CourseReport, EncodedVariant,
    Finding, FindingKind, Resolution, Severity, UnresolvedVideo, VideoDescriptor,
};
