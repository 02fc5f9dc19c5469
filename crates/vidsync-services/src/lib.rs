//! Vidsync reconciliation services
//!
//! The identifier resolver, the discrepancy reporter, and the archive
//! transform engine that streams a course export, rewrites resolved video
//! descriptors, and accumulates the per-course report.

pub mod reporter;
pub mod resolver;
pub mod transform;

pub use transform::{copy_archive, CourseTransformer, TransformError};
