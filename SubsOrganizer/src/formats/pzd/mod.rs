//! PZD message files (XML projection)
//!
//! The game's binary `.pzd` subtitle files are converted to XML by an external
//! tool. Each document looks like:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-16"?>
//! <PzdFile xmlns:xsi="..." xmlns:xsd="...">
//!   <TextContents>
//!     <TextContent ID="1" Unknown2="90010001" Unknown3="0">
//!       <Message>Hi</Message>
//!       <Voice></Voice>
//!       <String></String>
//!     </TextContent>
//!   </TextContents>
//! </PzdFile>
//! ```
//!
//! Entry order is significant: cross-locale pairing is positional.

mod reader;
mod writer;

use std::path::PathBuf;

use quick_xml::events::attributes::Attribute;

use crate::error::Result;

pub use reader::{parse_pzd, read_pzd};
pub use writer::{EditOutcome, EntryEdit, normalize_pzd, rewrite_pzd, update_pzd_file};

/// Root element name
pub const ROOT_ELEMENT: &str = "PzdFile";
/// Container holding all entries
pub const CONTAINER_ELEMENT: &str = "TextContents";
/// One message entry
pub const ENTRY_ELEMENT: &str = "TextContent";

/// Content id attribute
pub const ATTR_ID: &str = "ID";
/// Character id attribute
pub const ATTR_CHARACTER: &str = "Unknown2";
/// Subtype code attribute
pub const ATTR_SUBTYPE: &str = "Unknown3";

/// Encoding label written into the declaration of rewritten files.
///
/// The bytes that follow are UTF-8 regardless; the downstream converter
/// expects exactly this pairing.
pub const DECLARED_ENCODING: &str = "utf-16";

/// `xmlns:xsi` value added to the root element
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// `xmlns:xsd` value added to the root element
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Suffix between the file stem and `.xml`
pub const KNOWN_SUFFIX: &str = ".pzd";
/// Structured file extension
pub const XML_EXTENSION: &str = "xml";

/// Child fields every entry must carry after a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Displayed subtitle text
    Message,
    /// Voice reference
    Voice,
    /// Raw string
    String,
}

impl Field {
    /// All fields, in the order missing ones are appended
    pub const ALL: [Field; 3] = [Field::Message, Field::Voice, Field::String];

    #[must_use]
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Message => "Message",
            Self::Voice => "Voice",
            Self::String => "String",
        }
    }

    #[must_use]
    pub fn from_element_name(name: &[u8]) -> Option<Self> {
        match name {
            b"Message" => Some(Self::Message),
            b"Voice" => Some(Self::Voice),
            b"String" => Some(Self::String),
            _ => None,
        }
    }
}

/// A single subtitle entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageEntry {
    /// Content id, expected unique within the file
    pub id: String,
    /// Character id (may be empty)
    pub character_id: String,
    /// Subtype code
    pub subtype: String,
    /// Message text, trimmed; empty when absent
    pub text: String,
}

/// A parsed message file
#[derive(Debug, Clone, Default)]
pub struct MessageFile {
    /// Directory relative to the locale root, `/`-separated, empty at the root
    pub folder: String,
    /// File name with `.xml` and `.pzd` stripped
    pub name: String,
    /// Location on disk
    pub path: PathBuf,
    /// Entries in document order
    pub entries: Vec<MessageEntry>,
}

/// First `/`-separated segment of a folder path
#[must_use]
pub fn top_level_folder(folder: &str) -> &str {
    folder.split('/').next().unwrap_or_default()
}

/// Attribute value with character and entity references resolved
pub(crate) fn attribute_value(attr: &Attribute<'_>) -> Result<String> {
    let raw = String::from_utf8_lossy(&attr.value);
    let value = quick_xml::escape::unescape(&raw).map_err(quick_xml::Error::from)?;
    Ok(value.into_owned())
}

/// Display name for a file name: `a.pzd.xml` → `a`
#[must_use]
pub fn display_name(file_name: &str) -> &str {
    let stem = match file_name.len().checked_sub(XML_EXTENSION.len() + 1) {
        Some(cut)
            if file_name
                .get(cut..)
                .is_some_and(|ext| ext.eq_ignore_ascii_case(".xml")) =>
        {
            &file_name[..cut]
        }
        _ => file_name,
    };
    stem.strip_suffix(KNOWN_SUFFIX).unwrap_or(stem)
}

/// File name for a display name: `a` → `a.pzd.xml`
#[must_use]
pub fn file_name_for(name: &str) -> String {
    format!("{name}{KNOWN_SUFFIX}.{XML_EXTENSION}")
}
