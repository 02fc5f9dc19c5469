//! Registry API abstraction
//!
//! This crate defines the `RegistryApi` trait the reconciliation services
//! depend on, its typed errors, and the HTTP implementation backed by the
//! external video registry.

pub mod client;

use async_trait::async_trait;
use thiserror::Error;
use vidsync_core::models::CanonicalVideoRecord;

pub use client::RegistryClient;

/// Registry operation errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry refused access. Fatal when raised by the bulk fetch; no
    /// safe fallback exists without registry data.
    #[error("Permission denied by the registry")]
    PermissionDenied,

    #[error("Registry unavailable (status {status})")]
    Unavailable { status: u16 },

    #[error("Video {0} not found in the registry")]
    RecordNotFound(String),

    #[error("Registry lookup failed (status {status})")]
    LookupFailed { status: u16 },

    #[error("Registry request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected registry response: {0}")]
    InvalidResponse(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry abstraction trait
///
/// The reconciliation services work against this seam so tests can substitute
/// an in-memory registry. All lookups are read-only and side-effect free.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Fetch every canonical record for a course, following pagination until
    /// exhausted. Page order is preserved so logs stay reproducible. Zero
    /// records is a valid outcome, not an error.
    async fn list_course_videos(
        &self,
        course_id: &str,
    ) -> RegistryResult<Vec<CanonicalVideoRecord>>;

    /// Fetch the single record for a canonical identifier.
    async fn get_video(&self, canonical_id: &str) -> RegistryResult<CanonicalVideoRecord>;
}
