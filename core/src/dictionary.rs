//! The data dictionary abstraction:
//! mapping attribute names to tags and canonical value representations.

use crate::header::{Tag, VR};
use std::fmt::Debug;

/// A dictionary entry for a single attribute,
/// with borrowed string data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntryRef<'a> {
    /// The tag (or tag pattern) of the attribute.
    pub tag: TagRange,
    /// The attribute's keyword, such as `PatientName`.
    pub alias: &'a str,
    /// The canonical value representation.
    pub vr: VR,
}

/// A tag or a pattern of tags,
/// as some attributes repeat over a range of groups or elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRange {
    /// A single, fixed tag.
    Single(Tag),
    /// The attribute repeats over groups `GG00..=GGFF`
    /// (e.g. overlay data); the stored tag has the `xx` portion zeroed.
    Group100(Tag),
    /// The attribute repeats over elements `EE00..=EEFF`;
    /// the stored tag has the `xx` portion zeroed.
    Element100(Tag),
    /// Group length elements (`element == 0x0000`).
    GroupLength,
    /// Private creator elements (`odd group, 0x0010..=0x00FF`).
    PrivateCreator,
}

impl TagRange {
    /// Retrieve the representative tag of this range.
    pub fn inner(self) -> Tag {
        match self {
            TagRange::Single(tag) | TagRange::Group100(tag) | TagRange::Element100(tag) => tag,
            TagRange::GroupLength => Tag(0xFFFF, 0x0000),
            TagRange::PrivateCreator => Tag(0xFFFF, 0x0010),
        }
    }
}

/// An attribute dictionary: a look-up from attribute keywords and tags
/// to dictionary entries.
///
/// Implementations are read-only once constructed
/// and cheap to copy around (usually unit types backed by a static
/// registry).
pub trait DataDictionary: Debug {
    /// The type of the dictionary entry.
    type Entry: 'static;

    /// Fetch an entry by its attribute keyword.
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;

    /// Fetch an entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;
}

/// Access to the properties of a dictionary entry.
pub trait DictionaryEntry {
    /// The tag range of the attribute.
    fn tag_range(&self) -> TagRange;
    /// The attribute keyword.
    fn alias(&self) -> &str;
    /// The canonical value representation.
    fn vr(&self) -> VR;
}

impl DictionaryEntry for DictionaryEntryRef<'_> {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn vr(&self) -> VR {
        self.vr
    }
}

/// Parse a single tag expression against a dictionary:
/// either an attribute keyword
/// or a numeric form accepted by [`Tag::from_str`](crate::header::Tag)
/// (`00100020`, `100020`, `0010,0020`, `10,20`,
/// optionally in parentheses or square brackets).
///
/// Returns `None` when the expression matches neither form.
pub fn parse_tag<D>(dict: &D, expr: &str) -> Option<Tag>
where
    D: DataDictionary,
    D::Entry: DictionaryEntry,
{
    let expr = expr.trim();
    if let Some(e) = dict.by_name(expr) {
        return Some(e.tag_range().inner());
    }
    expr.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TinyDict;

    static PATIENT_ID: DictionaryEntryRef<'static> = DictionaryEntryRef {
        tag: TagRange::Single(Tag(0x0010, 0x0020)),
        alias: "PatientID",
        vr: VR::LO,
    };

    impl DataDictionary for TinyDict {
        type Entry = DictionaryEntryRef<'static>;
        fn by_name(&self, name: &str) -> Option<&Self::Entry> {
            (name == "PatientID").then_some(&PATIENT_ID)
        }
        fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
            (tag == Tag(0x0010, 0x0020)).then_some(&PATIENT_ID)
        }
    }

    #[test]
    fn parse_tag_forms_are_equivalent() {
        let expected = Some(Tag(0x0010, 0x0020));
        assert_eq!(parse_tag(&TinyDict, "PatientID"), expected);
        assert_eq!(parse_tag(&TinyDict, "0010,0020"), expected);
        assert_eq!(parse_tag(&TinyDict, "(0010,0020)"), expected);
        assert_eq!(parse_tag(&TinyDict, "00100020"), expected);
        assert_eq!(parse_tag(&TinyDict, "[10,20]"), expected);
        assert_eq!(parse_tag(&TinyDict, "NoSuchAttribute"), None);
    }
}
