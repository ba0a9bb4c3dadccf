//! PZD XML rewriting
//!
//! Rewrites a document event by event. Everything is re-emitted as read
//! except:
//! - the declaration, replaced by `<?xml version="1.0" encoding="utf-16"?>\r\n`
//!   (the bytes stay UTF-8; the converter wants this exact pairing)
//! - the root `PzdFile` element, which gains `xmlns:xsi` / `xmlns:xsd` if absent
//! - entry fields: missing `Message`/`Voice`/`String` children are appended
//!   empty and self-closing ones are expanded, so none is ever null
//! - the `Message` of the first entry whose `ID` matches the edit
//!
//! Anything before or after the root element is dropped.

use super::{
    ATTR_ID, CONTAINER_ELEMENT, DECLARED_ENCODING, ENTRY_ELEMENT, Field, ROOT_ELEMENT,
    XSD_NAMESPACE, XSI_NAMESPACE, attribute_value,
};
use crate::error::{Error, Result};
use crate::utils::fs::write_atomic;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// A replacement message for one content id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryEdit {
    /// Content id to look for
    pub id: String,
    /// New message text (already unescaped)
    pub text: String,
}

impl EntryEdit {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// What happened to the edited entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Message text replaced
    Applied {
        /// Text before the edit
        previous: String,
    },
    /// Message already held the new text
    Unchanged,
    /// No entry carries the content id
    NotFound,
}

/// Rewrite a document, applying `edit` to the first matching entry
///
/// # Errors
/// Returns [`Error::XmlError`] on malformed XML and [`Error::MissingContainer`]
/// if the document has no root element.
pub fn rewrite_pzd(content: &str, edit: &EntryEdit) -> Result<(Vec<u8>, EditOutcome)> {
    rewrite(content, Some(edit))
}

/// Rewrite a document applying field normalization only
///
/// # Errors
/// Same as [`rewrite_pzd`].
pub fn normalize_pzd(content: &str) -> Result<Vec<u8>> {
    rewrite(content, None).map(|(bytes, _)| bytes)
}

/// Apply `edit` to the file at `path` and replace it atomically
///
/// The file is rewritten even when the outcome is [`EditOutcome::Unchanged`]
/// or [`EditOutcome::NotFound`], since normalization may still alter it.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or replaced.
pub fn update_pzd_file<P: AsRef<Path>>(path: P, edit: &EntryEdit) -> Result<EditOutcome> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let (bytes, outcome) = rewrite_pzd(&content, edit)?;
    write_atomic(path, &bytes)?;
    Ok(outcome)
}

fn declaration() -> String {
    format!("<?xml version=\"1.0\" encoding=\"{DECLARED_ENCODING}\"?>\r\n")
}

fn rewrite(content: &str, edit: Option<&EntryEdit>) -> Result<(Vec<u8>, EditOutcome)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    reader.trim_text(false);

    let mut writer = Writer::new(Vec::with_capacity(content.len() + 64));
    let mut state = RewriteState::new(edit);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(event) => state.handle(&mut writer, event.into_owned())?,
            Err(e) => return Err(Error::XmlError(e)),
        }
        buf.clear();
    }

    if !state.root_seen {
        return Err(Error::MissingContainer);
    }

    let mut output = declaration().into_bytes();
    output.extend_from_slice(&writer.into_inner());
    Ok((output, state.outcome))
}

/// Per-entry bookkeeping while inside a `TextContent`
struct EntryState {
    is_target: bool,
    seen: [bool; 3],
}

impl EntryState {
    fn new(is_target: bool) -> Self {
        Self {
            is_target,
            seen: [false; 3],
        }
    }

    /// Mark `field` as present, returning whether it was the first of its kind
    fn mark(&mut self, field: Field) -> bool {
        let slot = &mut self.seen[field_index(field)];
        let first = !*slot;
        *slot = true;
        first
    }
}

fn field_index(field: Field) -> usize {
    match field {
        Field::Message => 0,
        Field::Voice => 1,
        Field::String => 2,
    }
}

/// A field element buffered until its end tag
struct FieldCapture {
    start: BytesStart<'static>,
    inner: Vec<Event<'static>>,
    nested: usize,
    apply_edit: bool,
}

struct RewriteState<'a> {
    edit: Option<&'a EntryEdit>,
    depth: usize,
    root_seen: bool,
    root_closed: bool,
    container_seen: bool,
    in_container: bool,
    target_claimed: bool,
    entry: Option<EntryState>,
    field: Option<FieldCapture>,
    outcome: EditOutcome,
}

impl<'a> RewriteState<'a> {
    fn new(edit: Option<&'a EntryEdit>) -> Self {
        Self {
            edit,
            depth: 0,
            root_seen: false,
            root_closed: false,
            container_seen: false,
            in_container: false,
            target_claimed: false,
            entry: None,
            field: None,
            outcome: EditOutcome::NotFound,
        }
    }

    fn handle(&mut self, writer: &mut Writer<Vec<u8>>, event: Event<'static>) -> Result<()> {
        if self.root_closed {
            return Ok(());
        }
        if self.field.is_some() {
            return self.handle_field_event(writer, event);
        }

        match event {
            Event::Start(e) => self.open(writer, e, false),
            Event::Empty(e) => self.open(writer, e, true),
            Event::End(e) => self.close(writer, e),
            // Prolog: declaration, doctype, comments, whitespace
            _ if self.depth == 0 => Ok(()),
            other => {
                writer.write_event(other)?;
                Ok(())
            }
        }
    }

    fn handle_field_event(
        &mut self,
        writer: &mut Writer<Vec<u8>>,
        event: Event<'static>,
    ) -> Result<()> {
        let Some(capture) = self.field.as_mut() else {
            return Ok(());
        };

        match event {
            Event::End(_) if capture.nested == 0 => {
                if let Some(capture) = self.field.take() {
                    self.finish_field(writer, capture)?;
                }
            }
            Event::Start(_) => {
                capture.nested += 1;
                capture.inner.push(event);
            }
            Event::End(_) => {
                capture.nested -= 1;
                capture.inner.push(event);
            }
            other => capture.inner.push(other),
        }
        Ok(())
    }

    fn open(
        &mut self,
        writer: &mut Writer<Vec<u8>>,
        e: BytesStart<'static>,
        empty: bool,
    ) -> Result<()> {
        match self.depth {
            0 => {
                self.root_seen = true;
                let e = prepare_root(e)?;
                if empty {
                    writer.write_event(Event::Empty(e))?;
                    self.root_closed = true;
                } else {
                    writer.write_event(Event::Start(e))?;
                    self.depth = 1;
                }
            }
            1 => {
                if !self.container_seen && e.name().as_ref() == CONTAINER_ELEMENT.as_bytes() {
                    self.container_seen = true;
                    self.in_container = !empty;
                }
                self.write_open(writer, e, empty)?;
            }
            2 if self.in_container && e.name().as_ref() == ENTRY_ELEMENT.as_bytes() => {
                let is_target = self.claim_target(&e)?;
                if empty {
                    let e = expand_empty(e);
                    let end = end_for(&e);
                    writer.write_event(Event::Start(e))?;
                    self.write_missing_fields(writer, &EntryState::new(is_target))?;
                    writer.write_event(Event::End(end))?;
                } else {
                    writer.write_event(Event::Start(e))?;
                    self.entry = Some(EntryState::new(is_target));
                    self.depth = 3;
                }
            }
            3 => {
                let field = Field::from_element_name(e.name().as_ref());
                match (self.entry.as_mut(), field) {
                    (Some(entry), Some(field)) => {
                        let first = entry.mark(field);
                        let capture = FieldCapture {
                            start: expand_empty(e),
                            inner: Vec::new(),
                            nested: 0,
                            apply_edit: first && field == Field::Message && entry.is_target,
                        };
                        if empty {
                            self.finish_field(writer, capture)?;
                        } else {
                            self.field = Some(capture);
                        }
                    }
                    _ => self.write_open(writer, e, empty)?,
                }
            }
            _ => self.write_open(writer, e, empty)?,
        }
        Ok(())
    }

    fn write_open(
        &mut self,
        writer: &mut Writer<Vec<u8>>,
        e: BytesStart<'static>,
        empty: bool,
    ) -> Result<()> {
        if empty {
            writer.write_event(Event::Empty(e))?;
        } else {
            writer.write_event(Event::Start(e))?;
            self.depth += 1;
        }
        Ok(())
    }

    fn close(&mut self, writer: &mut Writer<Vec<u8>>, e: BytesEnd<'static>) -> Result<()> {
        match self.depth {
            3 => {
                if let Some(entry) = self.entry.take() {
                    self.write_missing_fields(writer, &entry)?;
                }
            }
            2 => self.in_container = false,
            1 => self.root_closed = true,
            _ => {}
        }
        writer.write_event(Event::End(e))?;
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    /// First entry with the edited id wins; later duplicates are left alone
    fn claim_target(&mut self, e: &BytesStart<'_>) -> Result<bool> {
        let Some(edit) = self.edit else {
            return Ok(false);
        };
        if self.target_claimed {
            return Ok(false);
        }

        let id = match e.try_get_attribute(ATTR_ID)? {
            Some(attr) => attribute_value(&attr)?,
            None => String::new(),
        };
        self.target_claimed = id == edit.id;
        Ok(self.target_claimed)
    }

    fn finish_field(&mut self, writer: &mut Writer<Vec<u8>>, capture: FieldCapture) -> Result<()> {
        let end = end_for(&capture.start);

        if capture.apply_edit
            && let Some(edit) = self.edit
        {
            let previous = collect_text(&capture.inner)?;
            if previous == edit.text {
                self.outcome = EditOutcome::Unchanged;
            } else {
                self.outcome = EditOutcome::Applied { previous };
                writer.write_event(Event::Start(capture.start))?;
                write_text(writer, &edit.text)?;
                writer.write_event(Event::End(end))?;
                return Ok(());
            }
        }

        writer.write_event(Event::Start(capture.start))?;
        for event in capture.inner {
            writer.write_event(event)?;
        }
        writer.write_event(Event::End(end))?;
        Ok(())
    }

    fn write_missing_fields(&mut self, writer: &mut Writer<Vec<u8>>, entry: &EntryState) -> Result<()> {
        for field in Field::ALL {
            if entry.seen[field_index(field)] {
                continue;
            }
            let name = field.element_name();
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            if field == Field::Message
                && entry.is_target
                && let Some(edit) = self.edit
            {
                write_text(writer, &edit.text)?;
                self.outcome = EditOutcome::Applied {
                    previous: String::new(),
                };
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }
}

fn prepare_root(mut e: BytesStart<'static>) -> Result<BytesStart<'static>> {
    if e.name().as_ref() != ROOT_ELEMENT.as_bytes() {
        return Ok(e);
    }
    if e.try_get_attribute("xmlns:xsi")?.is_none() {
        e.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    }
    if e.try_get_attribute("xmlns:xsd")?.is_none() {
        e.push_attribute(("xmlns:xsd", XSD_NAMESPACE));
    }
    Ok(e)
}

/// Drop the whitespace left before `/>` so `<Voice />` expands to `<Voice>`
fn expand_empty(e: BytesStart<'static>) -> BytesStart<'static> {
    let name_len = e.name().as_ref().len();
    let content = String::from_utf8_lossy(&e).trim_end().to_string();
    BytesStart::from_content(content, name_len)
}

fn end_for(start: &BytesStart<'_>) -> BytesEnd<'static> {
    BytesEnd::new(String::from_utf8_lossy(start.name().as_ref()).into_owned())
}

fn collect_text(events: &[Event<'_>]) -> Result<String> {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(c)),
            _ => {}
        }
    }
    Ok(text)
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    Ok(())
}

/// Escape the characters that matter in element text; quotes stay literal.
fn escape_text(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>']) {
        Cow::Owned(s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;"))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::pzd::parse_pzd;
    use pretty_assertions::assert_eq;

    fn rewrite_str(content: &str, edit: &EntryEdit) -> (String, EditOutcome) {
        let (bytes, outcome) = rewrite_pzd(content, edit).unwrap();
        (String::from_utf8(bytes).unwrap(), outcome)
    }

    #[test]
    fn test_declaration_and_namespaces() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-16\"?>\n<PzdFile><TextContents /></PzdFile>\n";
        let out = String::from_utf8(normalize_pzd(xml).unwrap()).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"utf-16\"?>\r\n<PzdFile xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\"><TextContents /></PzdFile>"
        );
    }

    #[test]
    fn test_existing_namespaces_kept() {
        let xml = "<PzdFile xmlns:xsd=\"x\" xmlns:xsi=\"y\"><TextContents/></PzdFile>";
        let out = String::from_utf8(normalize_pzd(xml).unwrap()).unwrap();
        assert!(out.ends_with("<PzdFile xmlns:xsd=\"x\" xmlns:xsi=\"y\"><TextContents/></PzdFile>"));
    }

    #[test]
    fn test_apply_edit() {
        let xml = "<PzdFile><TextContents><TextContent ID=\"1\"><Message>Hi</Message><Voice>v</Voice><String>s</String></TextContent></TextContents></PzdFile>";
        let (out, outcome) = rewrite_str(xml, &EntryEdit::new("1", "Hello & <bye>"));

        assert_eq!(
            outcome,
            EditOutcome::Applied {
                previous: "Hi".into()
            }
        );
        assert!(out.contains("<Message>Hello &amp; &lt;bye&gt;</Message><Voice>v</Voice><String>s</String>"));
        assert_eq!(parse_pzd(&out).unwrap()[0].text, "Hello & <bye>");
    }

    #[test]
    fn test_unchanged_text_is_noop() {
        let xml = "<PzdFile><TextContents><TextContent ID=\"1\"><Message>Tom &amp; Jerry</Message><Voice></Voice><String></String></TextContent></TextContents></PzdFile>";
        let (out, outcome) = rewrite_str(xml, &EntryEdit::new("1", "Tom & Jerry"));

        assert_eq!(outcome, EditOutcome::Unchanged);
        assert!(out.contains("<Message>Tom &amp; Jerry</Message>"));
    }

    #[test]
    fn test_first_match_wins() {
        let xml = "<PzdFile><TextContents>\
            <TextContent ID=\"5\"><Message>one</Message></TextContent>\
            <TextContent ID=\"5\"><Message>two</Message></TextContent>\
            </TextContents></PzdFile>";
        let (out, outcome) = rewrite_str(xml, &EntryEdit::new("5", "new"));

        assert_eq!(
            outcome,
            EditOutcome::Applied {
                previous: "one".into()
            }
        );
        let entries = parse_pzd(&out).unwrap();
        assert_eq!(entries[0].text, "new");
        assert_eq!(entries[1].text, "two");
    }

    #[test]
    fn test_escaped_id_matches_edit() {
        let xml = "<PzdFile><TextContents><TextContent ID=\"q&amp;a\"><Message>old</Message></TextContent></TextContents></PzdFile>";
        let (out, outcome) = rewrite_str(xml, &EntryEdit::new("q&a", "new"));

        assert_eq!(
            outcome,
            EditOutcome::Applied {
                previous: "old".into()
            }
        );
        assert_eq!(parse_pzd(&out).unwrap()[0].text, "new");
    }

    #[test]
    fn test_missing_fields_appended() {
        let xml = "<PzdFile><TextContents><TextContent ID=\"1\"><Message>a</Message></TextContent><TextContent ID=\"2\" /></TextContents></PzdFile>";
        let (out, outcome) = rewrite_str(xml, &EntryEdit::new("9", "x"));

        assert_eq!(outcome, EditOutcome::NotFound);
        assert!(out.contains(
            "<TextContent ID=\"1\"><Message>a</Message><Voice></Voice><String></String></TextContent>"
        ));
        assert!(out.contains(
            "<TextContent ID=\"2\"><Message></Message><Voice></Voice><String></String></TextContent>"
        ));
    }

    #[test]
    fn test_self_closing_fields_expanded() {
        let xml = "<PzdFile><TextContents><TextContent ID=\"1\"><Message/><Voice /><String/></TextContent></TextContents></PzdFile>";
        let out = String::from_utf8(normalize_pzd(xml).unwrap()).unwrap();
        assert!(out.contains("<Message></Message><Voice></Voice><String></String></TextContent>"));
    }

    #[test]
    fn test_edit_creates_missing_message() {
        let xml = "<PzdFile><TextContents><TextContent ID=\"1\"><Voice>v</Voice></TextContent></TextContents></PzdFile>";
        let (out, outcome) = rewrite_str(xml, &EntryEdit::new("1", "new"));

        assert_eq!(
            outcome,
            EditOutcome::Applied {
                previous: String::new()
            }
        );
        assert!(out.contains("<Voice>v</Voice><Message>new</Message><String></String>"));
    }

    #[test]
    fn test_unrelated_content_preserved() {
        let xml = "<PzdFile>\n  <Header kind='x'>keep &amp; me</Header>\n  <TextContents>\n    <TextContent ID=\"1\" Unknown2=\"\" Unknown3=\"0\">\n      <Message>a</Message>\n      <Voice>v</Voice>\n      <String>s</String>\n    </TextContent>\n  </TextContents>\n</PzdFile>";
        let out = String::from_utf8(normalize_pzd(xml).unwrap()).unwrap();
        let body = out.split_once("\r\n").unwrap().1;
        let expected = xml.replacen(
            "<PzdFile>",
            "<PzdFile xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">",
            1,
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn test_no_root_is_error() {
        assert!(matches!(normalize_pzd("   "), Err(Error::MissingContainer)));
    }
}
