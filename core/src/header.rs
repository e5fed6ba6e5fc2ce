//! Core types for interpreting DICOM data elements:
//! the attribute tag, the value length, value representations,
//! and the element and sequence item headers.

use snafu::{Backtrace, Snafu};
use std::fmt;
use std::str::{from_utf8, FromStr};

/// Error type for issues constructing a sequence item header.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum SequenceItemHeaderError {
    /// Unexpected header tag.
    /// Only Item (FFFE,E000),
    /// Item Delimiter (FFFE,E00D),
    /// or Sequence Delimiter (FFFE,E0DD)
    /// are admitted.
    #[snafu(display("Unexpected tag {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },
    /// Unexpected delimiter value length.
    /// Must be zero for delimiters.
    #[snafu(display("Unexpected delimiter length {}", len))]
    UnexpectedDelimiterLength { len: Length, backtrace: Backtrace },
}

type Result<T, E = SequenceItemHeaderError> = std::result::Result<T, E>;

/// The data element tag,
/// a pair of 16-bit unsigned integers for the group and element numbers.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag(pub u16, pub u16);

impl Tag {
    /// Retrieve the tag's group number.
    #[inline]
    pub fn group(self) -> u16 {
        self.0
    }

    /// Retrieve the tag's element number.
    #[inline]
    pub fn element(self) -> u16 {
        self.1
    }

    /// Build a tag from its single 32-bit form (`0xGGGG_EEEE`).
    #[inline]
    pub fn from_u32(v: u32) -> Tag {
        Tag((v >> 16) as u16, (v & 0xFFFF) as u16)
    }

    /// Obtain the single 32-bit form of the tag (`0xGGGG_EEEE`).
    #[inline]
    pub fn as_u32(self) -> u32 {
        (u32::from(self.0) << 16) | u32::from(self.1)
    }

    /// Whether the tag lies in an odd (private) group.
    #[inline]
    pub fn is_private(self) -> bool {
        self.0 & 1 == 1
    }

    /// Whether this is a private creator tag,
    /// `(odd group, 0x0010..=0x00FF)`.
    #[inline]
    pub fn is_private_creator(self) -> bool {
        self.is_private() && (0x0010..=0x00FF).contains(&self.1)
    }

    /// For a private data element tag,
    /// obtain the tag of the private creator element
    /// which claims its block.
    ///
    /// Returns `None` if the tag is not in a private block
    /// (not private, or element number below 0x0100).
    pub fn private_creator(self) -> Option<Tag> {
        if self.is_private() && self.1 & 0xFF00 != 0 {
            Some(Tag(self.0, 0x0010 | (self.1 >> 8)))
        } else {
            None
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag(0x{:04X}, 0x{:04X})", self.0, self.1)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

impl From<(u16, u16)> for Tag {
    #[inline]
    fn from((g, e): (u16, u16)) -> Tag {
        Tag(g, e)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

/// An error which may occur when parsing a tag from its text form.
#[derive(Debug, Snafu)]
#[snafu(display("Could not parse tag expression"))]
pub struct ParseTagError;

impl FromStr for Tag {
    type Err = ParseTagError;

    /// Parse a tag in one of the forms
    /// `00100020`, `100020`, `0010,0020`, `10,20`,
    /// optionally enclosed in `(...)` or `[...]`.
    fn from_str(s: &str) -> Result<Tag, ParseTagError> {
        let s = s.trim();
        let s = if (s.starts_with('(') && s.ends_with(')'))
            || (s.starts_with('[') && s.ends_with(']'))
        {
            s[1..s.len() - 1].trim()
        } else {
            s
        };
        if let Some((g, e)) = s.split_once(',') {
            let (g, e) = (g.trim(), e.trim());
            if g.len() > 4 || e.is_empty() || e.len() > 4 {
                return Err(ParseTagError);
            }
            let group = if g.is_empty() {
                0
            } else {
                u16::from_str_radix(g, 16).map_err(|_| ParseTagError)?
            };
            let element = u16::from_str_radix(e, 16).map_err(|_| ParseTagError)?;
            Ok(Tag(group, element))
        } else {
            if s.is_empty() || s.len() > 8 || !s.bytes().all(|c| c.is_ascii_hexdigit()) {
                return Err(ParseTagError);
            }
            let v = u32::from_str_radix(s, 16).map_err(|_| ParseTagError)?;
            Ok(Tag::from_u32(v))
        }
    }
}

/// The length of a DICOM element or item in bytes.
/// The all-ones value (`0xFFFF_FFFF`) stands for an undefined length.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Length(pub u32);

const UNDEFINED_LEN: u32 = 0xFFFF_FFFF;

impl Length {
    /// An undefined length.
    pub const UNDEFINED: Length = Length(UNDEFINED_LEN);

    /// A length of zero bytes.
    pub const ZERO: Length = Length(0);

    /// Create a length with the given number of bytes.
    #[inline]
    pub fn defined(len: u32) -> Length {
        debug_assert_ne!(len, UNDEFINED_LEN);
        Length(len)
    }

    /// Check whether this length is undefined.
    #[inline]
    pub fn is_undefined(self) -> bool {
        self.0 == UNDEFINED_LEN
    }

    /// Check whether this length is well defined.
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Fetch the concrete length value, if defined.
    #[inline]
    pub fn get(self) -> Option<u32> {
        if self.is_undefined() {
            None
        } else {
            Some(self.0)
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_undefined() {
            f.write_str("Length(Undefined)")
        } else {
            write!(f, "Length({})", self.0)
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_undefined() {
            f.write_str("U/L")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An enum type for a DICOM value representation.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum VR {
    /// Application Entity
    AE,
    /// Age String
    AS,
    /// Attribute Tag
    AT,
    /// Code String
    CS,
    /// Date
    DA,
    /// Decimal String
    DS,
    /// Date Time
    DT,
    /// Floating Point Single
    FL,
    /// Floating Point Double
    FD,
    /// Integer String
    IS,
    /// Long String
    LO,
    /// Long Text
    LT,
    /// Other Byte
    OB,
    /// Other Double
    OD,
    /// Other Float
    OF,
    /// Other Long
    OL,
    /// Other Word
    OW,
    /// Person Name
    PN,
    /// Short String
    SH,
    /// Signed Long
    SL,
    /// Sequence of Items
    SQ,
    /// Signed Short
    SS,
    /// Short Text
    ST,
    /// Time
    TM,
    /// Unlimited Characters
    UC,
    /// Unique Identifier
    UI,
    /// Unsigned Long
    UL,
    /// Unknown
    UN,
    /// Universal Resource Identifier
    UR,
    /// Unsigned Short
    US,
    /// Unlimited Text
    UT,
}

impl VR {
    /// Obtain the value representation corresponding to the given two bytes.
    /// Each byte should represent an alphabetic character in upper case.
    pub fn from_binary(chars: [u8; 2]) -> Option<VR> {
        from_utf8(chars.as_ref()).ok().and_then(VR::from_code)
    }

    /// Obtain the value representation corresponding to the given string.
    /// The string should hold exactly two UTF-8 encoded alphabetic characters
    /// in upper case.
    pub fn from_code(code: &str) -> Option<VR> {
        use VR::*;
        match code {
            "AE" => Some(AE),
            "AS" => Some(AS),
            "AT" => Some(AT),
            "CS" => Some(CS),
            "DA" => Some(DA),
            "DS" => Some(DS),
            "DT" => Some(DT),
            "FL" => Some(FL),
            "FD" => Some(FD),
            "IS" => Some(IS),
            "LO" => Some(LO),
            "LT" => Some(LT),
            "OB" => Some(OB),
            "OD" => Some(OD),
            "OF" => Some(OF),
            "OL" => Some(OL),
            "OW" => Some(OW),
            "PN" => Some(PN),
            "SH" => Some(SH),
            "SL" => Some(SL),
            "SQ" => Some(SQ),
            "SS" => Some(SS),
            "ST" => Some(ST),
            "TM" => Some(TM),
            "UC" => Some(UC),
            "UI" => Some(UI),
            "UL" => Some(UL),
            "UN" => Some(UN),
            "UR" => Some(UR),
            "US" => Some(US),
            "UT" => Some(UT),
            _ => None,
        }
    }

    /// Retrieve a copy of this VR's byte representation.
    /// The function returns two alphabetic characters in upper case.
    pub fn to_bytes(self) -> [u8; 2] {
        let bytes = self.to_string().as_bytes();
        [bytes[0], bytes[1]]
    }

    /// Retrieve a string representation of this VR.
    pub fn to_string(self) -> &'static str {
        use VR::*;
        match self {
            AE => "AE",
            AS => "AS",
            AT => "AT",
            CS => "CS",
            DA => "DA",
            DS => "DS",
            DT => "DT",
            FL => "FL",
            FD => "FD",
            IS => "IS",
            LO => "LO",
            LT => "LT",
            OB => "OB",
            OD => "OD",
            OF => "OF",
            OL => "OL",
            OW => "OW",
            PN => "PN",
            SH => "SH",
            SL => "SL",
            SQ => "SQ",
            SS => "SS",
            ST => "ST",
            TM => "TM",
            UC => "UC",
            UI => "UI",
            UL => "UL",
            UN => "UN",
            UR => "UR",
            US => "US",
            UT => "UT",
        }
    }

    /// Whether an explicit VR element header uses the long form for
    /// this VR: two reserved bytes followed by a 32-bit length field.
    /// Headers of all other VRs carry a 16-bit length directly after
    /// the VR code.
    pub fn uses_long_header(self) -> bool {
        use VR::*;
        matches!(self, OB | OD | OF | OL | OW | SQ | UC | UN | UR | UT)
    }

    /// Whether values of this VR are decoded through the active character
    /// set into one or more strings,
    /// with the backslash as the value delimiter.
    pub fn is_multi_string(self) -> bool {
        use VR::*;
        matches!(
            self,
            AE | AS | CS | DA | DS | DT | IS | LO | PN | SH | TM | UC | UI
        )
    }

    /// Whether values of this VR are decoded into a single text value
    /// with no value splitting.
    pub fn is_text(self) -> bool {
        use VR::*;
        matches!(self, LT | ST | UR | UT)
    }

    /// Whether values of this VR are kept as decoded strings in memory.
    pub fn is_string_class(self) -> bool {
        self.is_multi_string() || self.is_text()
    }

    /// The byte used to pad values of this VR to an even length:
    /// a NUL byte for unique identifiers, a space for the other string VRs.
    pub fn padding_byte(self) -> u8 {
        match self {
            VR::UI => 0,
            _ => b' ',
        }
    }

    /// The width in bytes of a single binary value of this VR,
    /// used when swapping value data between byte orders.
    /// VRs without a fixed word width report 1 (no swapping).
    pub fn unit_width(self) -> usize {
        use VR::*;
        match self {
            AT | OW | SS | US => 2,
            FL | OF | OL | SL | UL => 4,
            FD | OD => 8,
            _ => 1,
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(VR::to_string(*self))
    }
}

/// Trait for any DICOM entity (element or item) which may have a length.
pub trait HasLength {
    /// Retrieve the value data's length as specified by the data element or
    /// item, in bytes.
    fn length(&self) -> Length;

    /// Check whether the value is empty (0 length).
    fn is_empty(&self) -> bool {
        self.length() == Length(0)
    }
}

/// A trait for a data type containing a DICOM header.
pub trait Header: HasLength {
    /// Retrieve the element's tag.
    fn tag(&self) -> Tag;

    /// Check whether this is the header of an item.
    fn is_item(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE000)
    }

    /// Check whether this is the header of an item delimiter.
    fn is_item_delimiter(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE00D)
    }

    /// Check whether this is the header of a sequence delimiter.
    fn is_sequence_delimiter(&self) -> bool {
        self.tag() == Tag(0xFFFE, 0xE0DD)
    }

    /// Check whether this is the header of an encapsulated pixel data
    /// element.
    fn is_encapsulated_pixeldata(&self) -> bool {
        self.tag() == Tag(0x7FE0, 0x0010) && self.length().is_undefined()
    }
}

/// A possible data element type, according to its source context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataElementHeader {
    /// DICOM tag
    pub tag: Tag,
    /// Value Representation
    pub vr: VR,
    /// Element length
    pub len: Length,
}

impl DataElementHeader {
    /// Create a new data element header with the given properties.
    #[inline]
    pub fn new<T: Into<Tag>>(tag: T, vr: VR, len: Length) -> DataElementHeader {
        DataElementHeader {
            tag: tag.into(),
            vr,
            len,
        }
    }

    /// Retrieve the value representation of the header.
    #[inline]
    pub fn vr(&self) -> VR {
        self.vr
    }
}

impl HasLength for DataElementHeader {
    #[inline]
    fn length(&self) -> Length {
        self.len
    }
}

impl Header for DataElementHeader {
    #[inline]
    fn tag(&self) -> Tag {
        self.tag
    }
}

/// A data type that represents and owns a DICOM data element.
///
/// This type is capable of representing any data element fully in memory,
/// whether it be a primitive value
/// or a nested data set (where each item is an object of type `I`).
#[derive(Debug, Clone, PartialEq)]
pub struct DataElement<I> {
    header: DataElementHeader,
    value: crate::value::Value<I>,
}

impl<I> DataElement<I> {
    /// Create a data element from the given parts,
    /// inferring the length from the value's byte length.
    pub fn new<T>(tag: Tag, vr: VR, value: T) -> Self
    where
        T: Into<crate::value::Value<I>>,
    {
        let value = value.into();
        DataElement {
            header: DataElementHeader {
                tag,
                vr,
                len: value.length(),
            },
            value,
        }
    }

    /// Create a data element from the given parts.
    ///
    /// This method will not check
    /// whether the length accurately represents the given value's byte
    /// length.
    pub fn new_with_len<T>(tag: Tag, vr: VR, len: Length, value: T) -> Self
    where
        T: Into<crate::value::Value<I>>,
    {
        DataElement {
            header: DataElementHeader { tag, vr, len },
            value: value.into(),
        }
    }

    /// Create an empty data element.
    pub fn empty(tag: Tag, vr: VR) -> Self {
        DataElement {
            header: DataElementHeader {
                tag,
                vr,
                len: Length(0),
            },
            value: crate::value::Value::empty(),
        }
    }

    /// Retrieve the element header.
    pub fn header(&self) -> &DataElementHeader {
        &self.header
    }

    /// Retrieve the value representation.
    pub fn vr(&self) -> VR {
        self.header.vr()
    }

    /// Retrieve the data value.
    pub fn value(&self) -> &crate::value::Value<I> {
        &self.value
    }

    /// Move the data value out of the element, discarding the rest.
    pub fn into_value(self) -> crate::value::Value<I> {
        self.value
    }
}

impl<I> HasLength for DataElement<I> {
    #[inline]
    fn length(&self) -> Length {
        self.header.length()
    }
}

impl<I> Header for DataElement<I> {
    #[inline]
    fn tag(&self) -> Tag {
        self.header.tag()
    }
}

/// Data type for describing a sequence item data element.
/// If the element represents an item, it will also contain
/// the specified length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceItemHeader {
    /// The cursor contains an item.
    Item {
        /// the length of the item in bytes (can be undefined)
        len: Length,
    },
    /// The cursor read an item delimiter.
    /// The element ends here.
    ItemDelimiter,
    /// The cursor read a sequence delimiter.
    /// The sequence ends here.
    SequenceDelimiter,
}

impl SequenceItemHeader {
    /// Create a sequence item header using the element's raw properties.
    /// An error can be raised if the given properties do not relate to a
    /// sequence item, an item delimiter or a sequence delimiter.
    pub fn new<T: Into<Tag>>(tag: T, len: Length) -> Result<SequenceItemHeader> {
        match (tag.into(), len) {
            (Tag(0xFFFE, 0xE000), len) => Ok(SequenceItemHeader::Item { len }),
            (Tag(0xFFFE, 0xE00D), Length(0)) => Ok(SequenceItemHeader::ItemDelimiter),
            (Tag(0xFFFE, 0xE00D), len) => UnexpectedDelimiterLengthSnafu { len }.fail(),
            (Tag(0xFFFE, 0xE0DD), Length(0)) => Ok(SequenceItemHeader::SequenceDelimiter),
            (Tag(0xFFFE, 0xE0DD), len) => UnexpectedDelimiterLengthSnafu { len }.fail(),
            (tag, _) => UnexpectedTagSnafu { tag }.fail(),
        }
    }
}

impl HasLength for SequenceItemHeader {
    fn length(&self) -> Length {
        match self {
            SequenceItemHeader::Item { len } => *len,
            SequenceItemHeader::ItemDelimiter | SequenceItemHeader::SequenceDelimiter => Length(0),
        }
    }
}

impl Header for SequenceItemHeader {
    fn tag(&self) -> Tag {
        match self {
            SequenceItemHeader::Item { .. } => Tag(0xFFFE, 0xE000),
            SequenceItemHeader::ItemDelimiter => Tag(0xFFFE, 0xE00D),
            SequenceItemHeader::SequenceDelimiter => Tag(0xFFFE, 0xE0DD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_from_u16_pair() {
        let t = Tag::from((0x0010, 0x0020));
        assert_eq!(t.group(), 0x0010);
        assert_eq!(t.element(), 0x0020);
        assert_eq!(t.as_u32(), 0x0010_0020);
        assert_eq!(Tag::from_u32(0x0010_0020), t);
    }

    #[test]
    fn tag_parse_forms() {
        let expected = Tag(0x0010, 0x0020);
        for form in ["00100020", "100020", "0010,0020", "10,20", "(0010,0020)", "[10,20]"] {
            assert_eq!(form.parse::<Tag>().ok(), Some(expected), "form `{}`", form);
        }
        assert!("".parse::<Tag>().is_err());
        assert!("ggggeeee".parse::<Tag>().is_err());
        assert!("1111,2222,3333".parse::<Tag>().is_err());
    }

    #[test]
    fn private_block_owner() {
        let t = Tag(0x0013, 0x1010);
        assert!(t.is_private());
        assert_eq!(t.private_creator(), Some(Tag(0x0013, 0x0010)));
        assert!(Tag(0x0013, 0x0010).is_private_creator());
        // element below 0x0100 has no block owner
        assert_eq!(Tag(0x0013, 0x0010).private_creator(), None);
        assert_eq!(Tag(0x0010, 0x1010).private_creator(), None);
    }

    #[test]
    fn sequence_item_header_admission() {
        assert_eq!(
            SequenceItemHeader::new(Tag(0xFFFE, 0xE000), Length(24)).unwrap(),
            SequenceItemHeader::Item { len: Length(24) }
        );
        assert_eq!(
            SequenceItemHeader::new(Tag(0xFFFE, 0xE00D), Length(0)).unwrap(),
            SequenceItemHeader::ItemDelimiter
        );
        assert!(SequenceItemHeader::new(Tag(0xFFFE, 0xE00D), Length(2)).is_err());
        assert!(SequenceItemHeader::new(Tag(0x0008, 0x0018), Length(0)).is_err());
    }

    #[test]
    fn vr_codes() {
        assert_eq!(VR::from_code("PN"), Some(VR::PN));
        assert_eq!(VR::from_binary([b'S', b'Q']), Some(VR::SQ));
        assert_eq!(VR::from_code("ZZ"), None);
        assert_eq!(&VR::OW.to_bytes(), b"OW");
        assert!(VR::UI.is_multi_string());
        assert!(VR::UT.is_text());
        assert!(!VR::OB.is_string_class());
        assert_eq!(VR::UI.padding_byte(), 0);
        assert_eq!(VR::PN.padding_byte(), b' ');
        assert_eq!(VR::OW.unit_width(), 2);
        assert_eq!(VR::FD.unit_width(), 8);
        assert_eq!(VR::OB.unit_width(), 1);
    }

    #[test]
    fn vr_header_forms() {
        for vr in [VR::OB, VR::OW, VR::SQ, VR::UN, VR::UT] {
            assert!(vr.uses_long_header(), "{} should use the long form", vr);
        }
        for vr in [VR::CS, VR::LO, VR::PN, VR::UI, VR::US, VR::FD] {
            assert!(!vr.uses_long_header(), "{} should use the short form", vr);
        }
    }
}
