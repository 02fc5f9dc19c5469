//! Course manifest parsing.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DescriptorError;

/// Derive the course identifier `org/course/url_name` from the root element
/// attributes of a `course.xml` manifest.
pub fn course_id_from_manifest(xml: &[u8]) -> Result<String, DescriptorError> {
    let mut reader = Reader::from_reader(xml);

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                let mut org = None;
                let mut course = None;
                let mut url_name = None;
                for attr in element.attributes() {
                    let attr = attr?;
                    let value = attr.unescape_value()?.into_owned();
                    match attr.key.as_ref() {
                        b"org" => org = Some(value),
                        b"course" => course = Some(value),
                        b"url_name" => url_name = Some(value),
                        _ => {}
                    }
                }
                let org = org.ok_or(DescriptorError::MissingAttribute("org"))?;
                let course = course.ok_or(DescriptorError::MissingAttribute("course"))?;
                let url_name = url_name.ok_or(DescriptorError::MissingAttribute("url_name"))?;
                return Ok(format!("{}/{}/{}", org, course, url_name));
            }
            Event::Eof => return Err(DescriptorError::MissingAttribute("org")),
            _ => {}
        }
    }
}
