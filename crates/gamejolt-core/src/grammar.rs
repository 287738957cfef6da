//! Decoders for the service's plain-text response formats.
//!
//! Three shapes come back from the API:
//!
//! * flat properties: `key:"value"` lines, e.g. `success:"true"`;
//! * blocks: a header of properties followed by fixed-width groups of
//!   `key:"value"` lines, one group per listed entity;
//! * a status line: `SUCCESS` or `FAILURE` on the first line, the raw stored
//!   value on everything after it.
//!
//! All decoders accept `\n` or `\r\n` line endings and skip blank lines that
//! precede the first meaningful line. Running out of lines ends a listing; it
//! is never an error.

use crate::properties::PropertyRecord;

/// How a listing signals its end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminator {
    /// Stop at the first group whose id is missing, blank or `0`.
    ZeroOrMissing,
    /// Stop at the first group whose id is missing or blank.
    Blank,
}

/// Shape of a block listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    /// Lines before the first group, parsed as the listing header.
    pub header_lines: usize,
    /// Lines per group.
    pub width: usize,
    /// Key that identifies a group and drives termination.
    pub id_field: &'static str,
    pub terminator: Terminator,
}

/// `id`, `title`, `difficulty`, `description`, `image_url`, `achieved`.
pub const TROPHY_LAYOUT: BlockLayout = BlockLayout {
    header_lines: 1,
    width: 6,
    id_field: "id",
    terminator: Terminator::ZeroOrMissing,
};

/// One `key:"..."` line per stored key.
pub const KEY_LISTING_LAYOUT: BlockLayout = BlockLayout {
    header_lines: 1,
    width: 1,
    id_field: "key",
    terminator: Terminator::Blank,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockListing {
    pub header: PropertyRecord,
    pub records: Vec<PropertyRecord>,
}

impl BlockListing {
    /// The header's `success` flag.
    pub fn is_success(&self) -> bool {
        self.header.get_bool("success")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub status: String,
    pub payload: String,
}

impl StatusLine {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    /// The payload on success, `None` for any other status.
    pub fn into_value(self) -> Option<String> {
        if self.is_success() {
            Some(self.payload)
        } else {
            None
        }
    }
}

/// Selects a decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grammar {
    Properties,
    Blocks(BlockLayout),
    StatusLine,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Properties(PropertyRecord),
    Blocks(BlockListing),
    StatusLine(StatusLine),
}

impl Grammar {
    pub fn decode(self, text: &str) -> Decoded {
        match self {
            Grammar::Properties => Decoded::Properties(decode_properties(text)),
            Grammar::Blocks(layout) => Decoded::Blocks(decode_blocks(text, &layout)),
            Grammar::StatusLine => Decoded::StatusLine(decode_status_line(text)),
        }
    }
}

pub fn decode_properties(text: &str) -> PropertyRecord {
    PropertyRecord::parse(text)
}

pub fn decode_blocks(text: &str, layout: &BlockLayout) -> BlockListing {
    let lines: Vec<&str> = significant_lines(text).collect();
    let header_end = layout.header_lines.min(lines.len());
    let mut listing = BlockListing {
        header: record_from(&lines[..header_end]),
        records: Vec::new(),
    };
    if layout.width == 0 {
        return listing;
    }

    for group in lines[header_end..].chunks_exact(layout.width) {
        let record = record_from(group);
        if is_terminal(&record, layout) {
            break;
        }
        listing.records.push(record);
    }
    listing
}

pub fn decode_status_line(text: &str) -> StatusLine {
    let text = text.trim_start_matches(|c: char| c == '\r' || c == '\n');
    let (status, payload) = text.split_once('\n').unwrap_or((text, ""));
    StatusLine {
        status: status.trim().to_string(),
        payload: payload.to_string(),
    }
}

/// Lines with `\r` stripped, starting at the first non-blank one.
fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .skip_while(|line| line.trim().is_empty())
}

fn record_from(lines: &[&str]) -> PropertyRecord {
    let mut record = PropertyRecord::new();
    for line in lines {
        if let Some((key, value)) = crate::properties::parse_line(line) {
            record.put(key, value);
        }
    }
    record
}

fn is_terminal(record: &PropertyRecord, layout: &BlockLayout) -> bool {
    match layout.terminator {
        Terminator::Blank => record.is_blank(layout.id_field),
        Terminator::ZeroOrMissing => {
            record.is_blank(layout.id_field)
                || record.get(layout.id_field).map(str::trim) == Some("0")
        }
    }
}
