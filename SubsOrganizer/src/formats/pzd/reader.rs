//! PZD XML reading

use super::{
    ATTR_CHARACTER, ATTR_ID, ATTR_SUBTYPE, CONTAINER_ELEMENT, ENTRY_ELEMENT, Field, MessageEntry,
    attribute_value,
};
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;

/// Element depth of the container (root is 1)
const CONTAINER_DEPTH: usize = 2;
/// Element depth of entries
const ENTRY_DEPTH: usize = 3;

/// Read a PZD XML file from disk
///
/// # Errors
/// Returns an error if the file cannot be read, is not well-formed XML, or
/// has no `TextContents` container.
pub fn read_pzd<P: AsRef<Path>>(path: P) -> Result<Vec<MessageEntry>> {
    let content = fs::read_to_string(path)?;
    parse_pzd(&content)
}

/// Parse entries from PZD XML text
///
/// Only the first `TextContents` directly under the root is read, and only
/// `TextContent` elements directly inside it. The first `Message` child of
/// each entry supplies its text.
///
/// # Errors
/// Returns [`Error::XmlError`] on malformed XML and [`Error::MissingContainer`]
/// when the container element is absent.
pub fn parse_pzd(content: &str) -> Result<Vec<MessageEntry>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    // Message whitespace is trimmed per entry, not per event
    reader.trim_text(false);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut container_seen = false;
    let mut in_container = false;
    let mut current: Option<MessageEntry> = None;
    let mut message_seen = false;
    let mut in_message = false;
    let mut message = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = e.name();
                match depth {
                    CONTAINER_DEPTH if !container_seen && name.as_ref() == CONTAINER_ELEMENT.as_bytes() => {
                        container_seen = true;
                        in_container = true;
                    }
                    ENTRY_DEPTH if in_container && name.as_ref() == ENTRY_ELEMENT.as_bytes() => {
                        current = Some(entry_from_attributes(&e)?);
                        message_seen = false;
                    }
                    d if d == ENTRY_DEPTH + 1
                        && current.is_some()
                        && !message_seen
                        && Field::from_element_name(name.as_ref()) == Some(Field::Message) =>
                    {
                        message_seen = true;
                        in_message = true;
                        message.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                match depth + 1 {
                    CONTAINER_DEPTH if !container_seen && name.as_ref() == CONTAINER_ELEMENT.as_bytes() => {
                        container_seen = true;
                    }
                    ENTRY_DEPTH if in_container && name.as_ref() == ENTRY_ELEMENT.as_bytes() => {
                        entries.push(entry_from_attributes(&e)?);
                    }
                    d if d == ENTRY_DEPTH + 1
                        && current.is_some()
                        && Field::from_element_name(name.as_ref()) == Some(Field::Message) =>
                    {
                        // <Message/> holds no text
                        message_seen = true;
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_message {
                    message.push_str(&e.unescape().map_err(Error::XmlError)?);
                }
            }
            Ok(Event::CData(e)) => {
                if in_message {
                    message.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                match depth {
                    d if d == ENTRY_DEPTH + 1 && in_message => {
                        in_message = false;
                        if let Some(entry) = current.as_mut() {
                            entry.text = message.trim().to_string();
                        }
                    }
                    ENTRY_DEPTH => {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                    }
                    CONTAINER_DEPTH => in_container = false,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if !container_seen {
        return Err(Error::MissingContainer);
    }
    Ok(entries)
}

fn entry_from_attributes(e: &BytesStart<'_>) -> Result<MessageEntry> {
    let mut entry = MessageEntry::default();
    for attr in e.attributes() {
        let attr = attr?;
        let target = match attr.key.as_ref() {
            k if k == ATTR_ID.as_bytes() => &mut entry.id,
            k if k == ATTR_CHARACTER.as_bytes() => &mut entry.character_id,
            k if k == ATTR_SUBTYPE.as_bytes() => &mut entry.subtype,
            _ => continue,
        };
        *target = attribute_value(&attr)?;
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-16"?>
<PzdFile>
  <TextContents>
    <TextContent ID="1" Unknown2="90010001" Unknown3="0">
      <Message>  Hi  </Message>
      <Voice />
    </TextContent>
    <TextContent ID="2" Unknown2="" Unknown3="1">
      <Message>(cough) &amp; sneeze</Message>
    </TextContent>
    <TextContent ID="3" Unknown3="2" />
  </TextContents>
</PzdFile>"#;

    #[test]
    fn test_parse_entries_in_order() {
        let entries = parse_pzd(SAMPLE).unwrap();
        assert_eq!(
            entries,
            vec![
                MessageEntry {
                    id: "1".into(),
                    character_id: "90010001".into(),
                    subtype: "0".into(),
                    text: "Hi".into(),
                },
                MessageEntry {
                    id: "2".into(),
                    character_id: String::new(),
                    subtype: "1".into(),
                    text: "(cough) & sneeze".into(),
                },
                MessageEntry {
                    id: "3".into(),
                    character_id: String::new(),
                    subtype: "2".into(),
                    text: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_container() {
        let err = parse_pzd("<PzdFile><Other/></PzdFile>").unwrap_err();
        assert!(matches!(err, Error::MissingContainer));
    }

    #[test]
    fn test_empty_container() {
        assert!(parse_pzd("<PzdFile><TextContents/></PzdFile>").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        assert!(parse_pzd("<PzdFile><TextContents></PzdFile>").is_err());
    }

    #[test]
    fn test_bom_and_cdata() {
        let xml = "\u{feff}<PzdFile><TextContents><TextContent ID=\"7\"><Message><![CDATA[<b>]]></Message></TextContent></TextContents></PzdFile>";
        let entries = parse_pzd(xml).unwrap();
        assert_eq!(entries[0].text, "<b>");
    }

    #[test]
    fn test_nested_entries_ignored() {
        let xml = "<PzdFile><Other><TextContents><TextContent ID=\"x\"/></TextContents></Other><TextContents><TextContent ID=\"y\"/></TextContents></PzdFile>";
        let entries = parse_pzd(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "y");
    }

    #[test]
    fn test_escaped_attribute_values() {
        let xml = "<PzdFile><TextContents><TextContent ID=\"a&amp;b\" Unknown2=\"&#57;0\" Unknown3=\"1\"/></TextContents></PzdFile>";
        let entries = parse_pzd(xml).unwrap();
        assert_eq!(entries[0].id, "a&b");
        assert_eq!(entries[0].character_id, "90");
    }
}
