//! The implicit VR element header decoder.
//!
//! In Implicit VR Little Endian the stream carries no value
//! representations, so the decoder resolves them through an attribute
//! dictionary.

use crate::decode::basic::LittleEndianBasicDecoder;
use crate::decode::{
    BadSequenceHeaderSnafu, BasicDecode, Decode, ReadHeaderTagSnafu, ReadItemLengthSnafu,
    ReadLengthSnafu, ReadTagSnafu, Result,
};
use dcmflow_core::dictionary::{DataDictionary, DictionaryEntry};
use dcmflow_core::header::{DataElementHeader, Length, SequenceItemHeader};
use dcmflow_core::{Tag, VR};
use dcmflow_dictionary::StandardDataDictionary;
use snafu::ResultExt;
use std::fmt;
use std::io::Read;

/// An `ImplicitVRLittleEndianDecoder` which uses the standard data dictionary.
pub type StandardImplicitVRLittleEndianDecoder =
    ImplicitVRLittleEndianDecoder<StandardDataDictionary>;

/// A data element decoder for the Implicit VR Little Endian transfer
/// syntax, resolving value representations through the dictionary `D`.
pub struct ImplicitVRLittleEndianDecoder<D> {
    dict: D,
    basic: LittleEndianBasicDecoder,
}

impl<D> fmt::Debug for ImplicitVRLittleEndianDecoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ImplicitVRLittleEndianDecoder")
            .field("basic", &self.basic)
            .finish_non_exhaustive()
    }
}

impl ImplicitVRLittleEndianDecoder<StandardDataDictionary> {
    /// Retrieve this decoder using the standard data dictionary.
    pub fn with_std_dict() -> Self {
        ImplicitVRLittleEndianDecoder {
            dict: StandardDataDictionary,
            basic: LittleEndianBasicDecoder,
        }
    }

    /// Retrieve this decoder using the standard data dictionary.
    pub fn new() -> Self {
        Self::with_std_dict()
    }
}

impl Default for ImplicitVRLittleEndianDecoder<StandardDataDictionary> {
    fn default() -> Self {
        ImplicitVRLittleEndianDecoder::with_std_dict()
    }
}

impl<D> ImplicitVRLittleEndianDecoder<D>
where
    D: DataDictionary,
    D::Entry: DictionaryEntry,
{
    /// Retrieve this decoder using a custom data dictionary.
    pub fn with_dict(dictionary: D) -> Self {
        ImplicitVRLittleEndianDecoder {
            dict: dictionary,
            basic: LittleEndianBasicDecoder,
        }
    }

    /// Resolve the VR of the given tag.
    ///
    /// Pixel data (7FE0,0010) and overlay data (60xx,3000) must be
    /// read as OW in this transfer syntax;
    /// tags the dictionary does not know default to UN.
    fn resolve_vr(&self, tag: Tag) -> VR {
        if tag == Tag(0x7FE0, 0x0010)
            || (tag.group() & 0xFF00 == 0x6000 && tag.element() == 0x3000)
        {
            return VR::OW;
        }
        self.dict
            .by_tag(tag)
            .map(|entry| entry.vr())
            .unwrap_or(VR::UN)
    }
}

impl<D> Decode for ImplicitVRLittleEndianDecoder<D>
where
    D: DataDictionary,
    D::Entry: DictionaryEntry,
{
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut *source)
            .context(ReadHeaderTagSnafu)?;
        let len = self.basic.decode_ul(&mut *source).context(ReadLengthSnafu)?;
        Ok((
            DataElementHeader::new(tag, self.resolve_vr(tag), Length(len)),
            8,
        ))
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut *source)
            .context(ReadHeaderTagSnafu)?;
        let len = self.basic.decode_ul(&mut *source).context(ReadItemLengthSnafu)?;
        SequenceItemHeader::new(tag, Length(len)).context(BadSequenceHeaderSnafu)
    }

    #[inline]
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        self.basic.decode_tag(&mut *source).context(ReadTagSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmflow_core::header::{HasLength, Header};
    use std::io::Cursor;

    // (0010,0020) length 6 "ID0001", then (0008,0060) length 2 "MR"
    const TWO_ELEMENTS: &[u8] = &[
        0x10, 0x00, 0x20, 0x00, 0x06, 0x00, 0x00, 0x00, //
        b'I', b'D', b'0', b'0', b'0', b'1', //
        0x08, 0x00, 0x60, 0x00, 0x02, 0x00, 0x00, 0x00, b'M', b'R',
    ];

    #[test]
    fn vr_comes_from_the_dictionary() {
        let decoder = ImplicitVRLittleEndianDecoder::with_std_dict();
        let mut source = Cursor::new(TWO_ELEMENTS);

        let (header, bytes_read) = decoder.decode_header(&mut source).unwrap();
        assert_eq!(header.tag, Tag(0x0010, 0x0020));
        assert_eq!(header.vr, VR::LO);
        assert_eq!(header.len, Length(6));
        assert_eq!(bytes_read, 8);

        source.set_position(source.position() + 6);
        let (header, _) = decoder.decode_header(&mut source).unwrap();
        assert_eq!(header.tag, Tag(0x0008, 0x0060));
        assert_eq!(header.vr, VR::CS);
        assert_eq!(header.len, Length(2));
    }

    #[test]
    fn unknown_tags_default_to_un() {
        // a private element the dictionary has no entry for
        const PRIVATE: &[u8] = &[0x09, 0x00, 0x02, 0x10, 0x04, 0x00, 0x00, 0x00];
        let decoder = ImplicitVRLittleEndianDecoder::with_std_dict();
        let (header, _) = decoder.decode_header(&mut Cursor::new(PRIVATE)).unwrap();
        assert_eq!(header.tag, Tag(0x0009, 0x1002));
        assert_eq!(header.vr, VR::UN);
    }

    #[test]
    fn pixel_and_overlay_data_read_as_ow() {
        const PIXEL_DATA: &[u8] = &[0xE0, 0x7F, 0x10, 0x00, 0x00, 0x10, 0x00, 0x00];
        let decoder = ImplicitVRLittleEndianDecoder::with_std_dict();
        let (header, _) = decoder.decode_header(&mut Cursor::new(PIXEL_DATA)).unwrap();
        assert_eq!(header.vr, VR::OW);
        assert_eq!(header.len, Length(0x1000));

        // a repeated overlay data group
        const OVERLAY: &[u8] = &[0x02, 0x60, 0x00, 0x30, 0x08, 0x00, 0x00, 0x00];
        let (header, _) = decoder.decode_header(&mut Cursor::new(OVERLAY)).unwrap();
        assert_eq!(header.tag, Tag(0x6002, 0x3000));
        assert_eq!(header.vr, VR::OW);
    }

    #[test]
    fn item_headers_are_validated() {
        const ITEM: &[u8] = &[0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF];
        let decoder = ImplicitVRLittleEndianDecoder::with_std_dict();
        let item = decoder.decode_item_header(&mut Cursor::new(ITEM)).unwrap();
        assert!(item.is_item());
        assert!(item.length().is_undefined());

        // a delimiter with a non-zero length is malformed
        const BAD_DELIMITER: &[u8] = &[0xFE, 0xFF, 0x0D, 0xE0, 0x02, 0x00, 0x00, 0x00];
        assert!(decoder
            .decode_item_header(&mut Cursor::new(BAD_DELIMITER))
            .is_err());
    }
}
