pub mod course;
pub mod descriptor;
pub mod registry;
pub mod report;

pub use course::course_id_from_manifest;
pub use descriptor::{rewrite_video_id, VideoDescriptor};
pub use registry::{CanonicalVideoRecord, EncodedVariant};
pub use report::{
    CourseReport, Finding, FindingKind, Resolution, Severity, UnresolvedVideo,
};
