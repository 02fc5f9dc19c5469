//! Video descriptor parsing and rewriting.
//!
//! A video descriptor is one UTF-8 XML entry in a course archive, rooted at a
//! `<video>` element. The identifying attributes are `edx_video_id`,
//! `youtube_id_1_0`, `source`, `display_name`, and `url_name`; zero or more
//! child `<source src="...">` elements carry alternate delivery URLs.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::DescriptorError;

/// Parsed identity metadata for one video entry. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDescriptor {
    /// Stable slug, identity of the video within its course.
    pub url_name: String,
    pub display_name: String,
    /// Identifier already embedded in the archive. Empty when absent.
    pub legacy_id: String,
    pub youtube_id: Option<String>,
    /// The `source` attribute of the root element.
    pub primary_source_url: Option<String>,
    /// `src` attributes of child `<source>` elements, in document order.
    pub alternate_source_urls: Vec<String>,
}

impl VideoDescriptor {
    /// Parse a descriptor from raw entry bytes. Unknown attributes and
    /// children are ignored. Empty `youtube_id_1_0` and `source` attributes
    /// collapse to `None`.
    pub fn parse(xml: &[u8]) -> Result<Self, DescriptorError> {
        let mut reader = Reader::from_reader(xml);

        let mut url_name = String::new();
        let mut display_name = String::new();
        let mut legacy_id = String::new();
        let mut youtube_id = None;
        let mut primary_source_url = None;
        let mut alternate_source_urls = Vec::new();
        let mut saw_video = false;
        let mut depth = 0usize;

        loop {
            let event = reader.read_event()?;
            match event {
                Event::Start(ref element) | Event::Empty(ref element) => {
                    if !saw_video && depth == 0 && element.name().as_ref() == b"video" {
                        saw_video = true;
                        for attr in element.attributes() {
                            let attr = attr?;
                            let value = attr.unescape_value()?.into_owned();
                            match attr.key.as_ref() {
                                b"url_name" => url_name = value,
                                b"display_name" => display_name = value,
                                b"edx_video_id" => legacy_id = value,
                                b"youtube_id_1_0" if !value.is_empty() => {
                                    youtube_id = Some(value);
                                }
                                b"source" if !value.is_empty() => {
                                    primary_source_url = Some(value);
                                }
                                _ => {}
                            }
                        }
                    } else if saw_video && depth == 1 && element.name().as_ref() == b"source" {
                        for attr in element.attributes() {
                            let attr = attr?;
                            if attr.key.as_ref() == b"src" {
                                let value = attr.unescape_value()?.into_owned();
                                if !value.is_empty() {
                                    alternate_source_urls.push(value);
                                }
                            }
                        }
                    }
                    if matches!(event, Event::Start(_)) {
                        depth += 1;
                    }
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_video {
            return Err(DescriptorError::NotAVideo);
        }

        Ok(Self {
            url_name,
            display_name,
            legacy_id,
            youtube_id,
            primary_source_url,
            alternate_source_urls,
        })
    }
}

/// Re-serialize a descriptor with its `edx_video_id` attribute set to `id`.
///
/// Streaming event rewrite: every event other than the root `<video>` start
/// tag is copied through unchanged, so children (transcripts, alternate
/// sources) and text survive intact. The only semantic delta in the output is
/// the identifier attribute.
pub fn rewrite_video_id(xml: &[u8], id: &str) -> Result<Vec<u8>, DescriptorError> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::new());
    let mut rewritten = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if !rewritten && depth == 0 && element.name().as_ref() == b"video" {
                    writer.write_event(Event::Start(with_video_id(&element, id)?))?;
                    rewritten = true;
                } else {
                    writer.write_event(Event::Start(element))?;
                }
                depth += 1;
            }
            Event::Empty(element) => {
                if !rewritten && depth == 0 && element.name().as_ref() == b"video" {
                    writer.write_event(Event::Empty(with_video_id(&element, id)?))?;
                    rewritten = true;
                } else {
                    writer.write_event(Event::Empty(element))?;
                }
            }
            Event::End(element) => {
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(element))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    if !rewritten {
        return Err(DescriptorError::NotAVideo);
    }

    Ok(writer.into_inner())
}

/// Copy a `<video>` start tag, replacing any existing `edx_video_id`.
fn with_video_id(
    element: &BytesStart<'_>,
    id: &str,
) -> Result<BytesStart<'static>, DescriptorError> {
    let mut out = BytesStart::new("video");
    for attr in element.attributes() {
        let attr: Attribute<'_> = attr?;
        if attr.key.as_ref() != b"edx_video_id" {
            out.push_attribute(attr);
        }
    }
    out.push_attribute(("edx_video_id", id));
    Ok(out.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_VIDEO: &[u8] = br#"<video url_name="intro" display_name="Intro Lecture" edx_video_id="legacy-1" youtube_id_1_0="dQw4w9WgXcQ" source="https://cdn.example.org/videos/abc_mobile.mp4">
  <source src="https://cdn.example.org/videos/abc_desktop.mp4"/>
  <source src="https://cdn.example.org/videos/abc_mobile_low.mp4"/>
</video>"#;

    #[test]
    fn parse_full_descriptor() {
        let descriptor = VideoDescriptor::parse(FULL_VIDEO).unwrap();
        assert_eq!(descriptor.url_name, "intro");
        assert_eq!(descriptor.display_name, "Intro Lecture");
        assert_eq!(descriptor.legacy_id, "legacy-1");
        assert_eq!(descriptor.youtube_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            descriptor.primary_source_url.as_deref(),
            Some("https://cdn.example.org/videos/abc_mobile.mp4")
        );
        assert_eq!(
            descriptor.alternate_source_urls,
            vec![
                "https://cdn.example.org/videos/abc_desktop.mp4",
                "https://cdn.example.org/videos/abc_mobile_low.mp4",
            ]
        );
    }

    #[test]
    fn parse_collapses_empty_optionals() {
        let xml = br#"<video url_name="a" display_name="A" edx_video_id="" youtube_id_1_0="" source=""/>"#;
        let descriptor = VideoDescriptor::parse(xml).unwrap();
        assert_eq!(descriptor.legacy_id, "");
        assert_eq!(descriptor.youtube_id, None);
        assert_eq!(descriptor.primary_source_url, None);
        assert!(descriptor.alternate_source_urls.is_empty());
    }

    #[test]
    fn parse_rejects_non_video_root() {
        let xml = br#"<chapter url_name="week1"/>"#;
        assert!(matches!(
            VideoDescriptor::parse(xml),
            Err(DescriptorError::NotAVideo)
        ));
    }

    #[test]
    fn parse_ignores_nested_video_elements() {
        let xml = br#"<video url_name="outer"><video url_name="inner"/></video>"#;
        let descriptor = VideoDescriptor::parse(xml).unwrap();
        assert_eq!(descriptor.url_name, "outer");
    }

    #[test]
    fn rewrite_sets_identifier_and_keeps_children() {
        let id = "a".repeat(20);
        let rewritten = rewrite_video_id(FULL_VIDEO, &id).unwrap();
        let descriptor = VideoDescriptor::parse(&rewritten).unwrap();
        assert_eq!(descriptor.legacy_id, id);
        assert_eq!(descriptor.url_name, "intro");
        assert_eq!(descriptor.youtube_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(descriptor.alternate_source_urls.len(), 2);
    }

    #[test]
    fn rewrite_adds_identifier_when_absent() {
        let xml = br#"<video url_name="a" display_name="A"/>"#;
        let rewritten = rewrite_video_id(xml, "b").unwrap();
        let descriptor = VideoDescriptor::parse(&rewritten).unwrap();
        assert_eq!(descriptor.legacy_id, "b");
    }

    #[test]
    fn rewrite_is_stable_on_reapplication() {
        let id = "a".repeat(20);
        let once = rewrite_video_id(FULL_VIDEO, &id).unwrap();
        let twice = rewrite_video_id(&once, &id).unwrap();
        assert_eq!(once, twice);
    }
}
