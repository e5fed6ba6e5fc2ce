//! The explicit VR element header decoder,
//! parameterized on the byte order of the data set.

use crate::decode::basic::{BigEndianBasicDecoder, LittleEndianBasicDecoder};
use crate::decode::{
    BadSequenceHeaderSnafu, BasicDecode, Decode, ReadHeaderTagSnafu, ReadItemLengthSnafu,
    ReadLengthSnafu, ReadReservedSnafu, ReadTagSnafu, ReadVrSnafu, Result,
};
use dcmflow_core::header::{DataElementHeader, Length, SequenceItemHeader};
use dcmflow_core::{Tag, VR};
use snafu::ResultExt;
use std::io::Read;

/// A decoder of element headers with explicit value representations,
/// generic over the basic decoder which dictates the byte order.
///
/// Delimitation tags (group FFFE) carry no VR in the stream;
/// for every other element the VR code selects between the short
/// header form (a 16-bit length right after the code) and the long
/// form (two reserved bytes followed by a 32-bit length).
#[derive(Debug, Default, Clone)]
pub struct ExplicitVRDecoder<B> {
    basic: B,
}

/// The explicit VR decoder for Explicit VR Little Endian.
pub type ExplicitVRLittleEndianDecoder = ExplicitVRDecoder<LittleEndianBasicDecoder>;
/// The explicit VR decoder for Explicit VR Big Endian.
pub type ExplicitVRBigEndianDecoder = ExplicitVRDecoder<BigEndianBasicDecoder>;

impl<B> Decode for ExplicitVRDecoder<B>
where
    B: BasicDecode,
{
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        let tag = self
            .basic
            .decode_tag(&mut *source)
            .context(ReadHeaderTagSnafu)?;

        // delimitation tags have no VR, just a 32-bit length
        if tag.group() == 0xFFFE {
            let len = self.basic.decode_ul(&mut *source).context(ReadItemLengthSnafu)?;
            return Ok((DataElementHeader::new(tag, VR::UN, Length(len)), 8));
        }

        let mut code = [0u8; 2];
        source.read_exact(&mut code).context(ReadVrSnafu)?;
        // unrecognized VR codes are read as unknown data
        let vr = VR::from_binary(code).unwrap_or(VR::UN);

        if vr.uses_long_header() {
            let mut reserved = [0u8; 2];
            source.read_exact(&mut reserved).context(ReadReservedSnafu)?;
            let len = self.basic.decode_ul(&mut *source).context(ReadLengthSnafu)?;
            Ok((DataElementHeader::new(tag, vr, Length(len)), 12))
        } else {
            let len = self.basic.decode_us(&mut *source).context(ReadLengthSnafu)?;
            Ok((DataElementHeader::new(tag, vr, Length(u32::from(len))), 8))
        }
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

    // (0008,0060) CS, length 2, "MR", then
    // (0010,0010) PN, length 8, "DOE^JANE"
    const TWO_SHORT_ELEMENTS_LE: &[u8] = &[
        0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'M', b'R', //
        0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x08, 0x00, //
        b'D', b'O', b'E', b'^', b'J', b'A', b'N', b'E',
    ];

    #[test]
    fn short_form_headers_little_endian() {
        let decoder = ExplicitVRLittleEndianDecoder::default();
        let mut source = Cursor::new(TWO_SHORT_ELEMENTS_LE);

        let (header, bytes_read) = decoder.decode_header(&mut source).unwrap();
        assert_eq!(header.tag, Tag(0x0008, 0x0060));
        assert_eq!(header.vr, VR::CS);
        assert_eq!(header.len, Length(2));
        assert_eq!(bytes_read, 8);

        // the value is left unread; skip it and pick up the next header
        source.set_position(source.position() + 2);
        let (header, _) = decoder.decode_header(&mut source).unwrap();
        assert_eq!(header.tag, Tag(0x0010, 0x0010));
        assert_eq!(header.vr, VR::PN);
        assert_eq!(header.len, Length(8));
    }

    #[test]
    fn long_form_header_has_reserved_bytes() {
        // (7FE0,0010) OB, two reserved bytes, undefined length
        const ENCAPSULATED_PIXEL_DATA_LE: &[u8] = &[
            0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
        ];
        let decoder = ExplicitVRLittleEndianDecoder::default();
        let (header, bytes_read) = decoder
            .decode_header(&mut Cursor::new(ENCAPSULATED_PIXEL_DATA_LE))
            .unwrap();
        assert_eq!(header.vr, VR::OB);
        assert!(header.length().is_undefined());
        assert!(header.is_encapsulated_pixeldata());
        assert_eq!(bytes_read, 12);
    }

    #[test]
    fn unknown_vr_codes_fall_back_to_un() {
        // (0009,0010) with the bogus VR "XX": read as UN,
        // which takes the long header form
        const BOGUS_VR: &[u8] = &[
            0x09, 0x00, 0x10, 0x00, b'X', b'X', 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,
        ];
        let decoder = ExplicitVRLittleEndianDecoder::default();
        let (header, bytes_read) = decoder.decode_header(&mut Cursor::new(BOGUS_VR)).unwrap();
        assert_eq!(header.tag, Tag(0x0009, 0x0010));
        assert_eq!(header.vr, VR::UN);
        assert_eq!(header.len, Length(4));
        assert_eq!(bytes_read, 12);
    }

    #[test]
    fn delimitation_tags_have_no_vr() {
        // item with a length of 6, then the sequence delimiter
        const ITEMS_LE: &[u8] = &[
            0xFE, 0xFF, 0x00, 0xE0, 0x06, 0x00, 0x00, 0x00, //
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];
        let decoder = ExplicitVRLittleEndianDecoder::default();
        let mut source = Cursor::new(ITEMS_LE);

        let item = decoder.decode_item_header(&mut source).unwrap();
        assert_eq!(item, SequenceItemHeader::Item { len: Length(6) });

        // the delimiter also parses through the element header path
        let (header, bytes_read) = decoder.decode_header(&mut source).unwrap();
        assert!(header.is_sequence_delimiter());
        assert_eq!(header.len, Length(0));
        assert_eq!(bytes_read, 8);
    }

    #[test]
    fn bad_item_tags_are_rejected() {
        // an ordinary element where an item header is expected
        const NOT_AN_ITEM: &[u8] = &[
            0x08, 0x00, 0x60, 0x00, 0x02, 0x00, 0x00, 0x00,
        ];
        let decoder = ExplicitVRLittleEndianDecoder::default();
        assert!(decoder
            .decode_item_header(&mut Cursor::new(NOT_AN_ITEM))
            .is_err());
    }

    #[test]
    fn big_endian_headers() {
        // (0028,0010) US, length 2, then (7FE0,0010) OW, length 16
        const ROWS_AND_PIXELS_BE: &[u8] = &[
            0x00, 0x28, 0x00, 0x10, b'U', b'S', 0x00, 0x02, 0x02, 0x00, //
            0x7F, 0xE0, 0x00, 0x10, b'O', b'W', 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
        ];
        let decoder = ExplicitVRBigEndianDecoder::default();
        let mut source = Cursor::new(ROWS_AND_PIXELS_BE);

        let (header, bytes_read) = decoder.decode_header(&mut source).unwrap();
        assert_eq!(header.tag, Tag(0x0028, 0x0010));
        assert_eq!(header.vr, VR::US);
        assert_eq!(header.len, Length(2));
        assert_eq!(bytes_read, 8);

        source.set_position(source.position() + 2);
        let (header, bytes_read) = decoder.decode_header(&mut source).unwrap();
        assert_eq!(header.tag, Tag(0x7FE0, 0x0010));
        assert_eq!(header.vr, VR::OW);
        assert_eq!(header.len, Length(16));
        assert_eq!(bytes_read, 12);
    }
}
