//! Error types for descriptor and manifest XML handling.

/// Errors raised while parsing or rewriting archive XML entries.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No <video> element found")]
    NotAVideo,

    #[error("Course manifest is missing the {0} attribute")]
    MissingAttribute(&'static str),
}
