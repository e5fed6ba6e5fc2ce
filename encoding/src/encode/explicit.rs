//! The explicit VR element header encoder,
//! parameterized on the byte order of the data set.

use crate::encode::basic::{BigEndianBasicEncoder, LittleEndianBasicEncoder};
use crate::encode::{
    BasicEncode, Encode, Result, WriteHeaderSnafu, WriteItemDelimiterSnafu, WriteItemHeaderSnafu,
    WriteSequenceDelimiterSnafu, WriteTagSnafu,
};
use dcmflow_core::header::DataElementHeader;
use dcmflow_core::{HasLength, Header, Tag};
use snafu::ResultExt;
use std::io::{self, Write};

/// An encoder of element headers with explicit value representations,
/// generic over the basic encoder which dictates the byte order.
///
/// The VR code of the element selects between the short header form
/// (a 16-bit length right after the code) and the long form
/// (two reserved bytes followed by a 32-bit length).
#[derive(Debug, Default, Clone)]
pub struct ExplicitVREncoder<B> {
    basic: B,
}

/// The explicit VR encoder for Explicit VR Little Endian.
pub type ExplicitVRLittleEndianEncoder = ExplicitVREncoder<LittleEndianBasicEncoder>;
/// The explicit VR encoder for Explicit VR Big Endian.
pub type ExplicitVRBigEndianEncoder = ExplicitVREncoder<BigEndianBasicEncoder>;

impl<B> ExplicitVREncoder<B>
where
    B: BasicEncode,
{
    fn write_tag<W>(&self, to: &mut W, tag: Tag) -> io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_us(&mut *to, tag.group())?;
        self.basic.encode_us(&mut *to, tag.element())
    }
}

impl<B> Encode for ExplicitVREncoder<B>
where
    B: BasicEncode,
{
    fn encode_tag<W>(&self, mut to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        self.write_tag(&mut to, tag).context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, mut to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        self.write_tag(&mut to, de.tag()).context(WriteHeaderSnafu)?;
        to.write_all(&de.vr().to_bytes()).context(WriteHeaderSnafu)?;
        if de.vr().uses_long_header() {
            // two reserved bytes, then a 32-bit length
            to.write_all(&[0u8; 2]).context(WriteHeaderSnafu)?;
            self.basic
                .encode_ul(&mut to, de.length().0)
                .context(WriteHeaderSnafu)?;
            Ok(12)
        } else {
            self.basic
                .encode_us(&mut to, de.length().0 as u16)
                .context(WriteHeaderSnafu)?;
            Ok(8)
        }
    }

    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        self.write_tag(&mut to, Tag(0xFFFE, 0xE000))
            .context(WriteItemHeaderSnafu)?;
        self.basic
            .encode_ul(&mut to, len)
            .context(WriteItemHeaderSnafu)
    }

    fn encode_item_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.write_tag(&mut to, Tag(0xFFFE, 0xE00D))
            .context(WriteItemDelimiterSnafu)?;
        self.basic
            .encode_ul(&mut to, 0)
            .context(WriteItemDelimiterSnafu)
    }

    fn encode_sequence_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.write_tag(&mut to, Tag(0xFFFE, 0xE0DD))
            .context(WriteSequenceDelimiterSnafu)?;
        self.basic
            .encode_ul(&mut to, 0)
            .context(WriteSequenceDelimiterSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmflow_core::header::Length;
    use dcmflow_core::VR;

    #[test]
    fn short_form_header() {
        let encoder = ExplicitVRLittleEndianEncoder::default();
        let mut out = Vec::new();
        let de = DataElementHeader::new(Tag(0x0010, 0x0020), VR::LO, Length(8));
        let bytes = encoder.encode_element_header(&mut out, de).unwrap();
        assert_eq!(bytes, 8);
        assert_eq!(out, &[0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x08, 0x00]);
    }

    #[test]
    fn long_form_header() {
        let encoder = ExplicitVRLittleEndianEncoder::default();
        let mut out = Vec::new();
        let de = DataElementHeader::new(Tag(0x7FE0, 0x0010), VR::OB, Length::UNDEFINED);
        let bytes = encoder.encode_element_header(&mut out, de).unwrap();
        assert_eq!(bytes, 12);
        assert_eq!(
            out,
            &[0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn items_and_delimiters() {
        let encoder = ExplicitVRLittleEndianEncoder::default();
        let mut out = Vec::new();
        encoder.encode_item_header(&mut out, 4).unwrap();
        encoder.encode_item_delimiter(&mut out).unwrap();
        encoder.encode_sequence_delimiter(&mut out).unwrap();
        assert_eq!(
            out,
            &[
                0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, //
                0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
                0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn big_endian_headers() {
        let encoder = ExplicitVRBigEndianEncoder::default();
        let mut out = Vec::new();
        let de = DataElementHeader::new(Tag(0x0008, 0x0060), VR::CS, Length(2));
        let bytes = encoder.encode_element_header(&mut out, de).unwrap();
        assert_eq!(bytes, 8);
        assert_eq!(out, &[0x00, 0x08, 0x00, 0x60, b'C', b'S', 0x00, 0x02]);

        // the long form keeps its reserved bytes in big endian too
        out.clear();
        let de = DataElementHeader::new(Tag(0x7FE0, 0x0010), VR::OW, Length(16));
        let bytes = encoder.encode_element_header(&mut out, de).unwrap();
        assert_eq!(bytes, 12);
        assert_eq!(
            out,
            &[0x7F, 0xE0, 0x00, 0x10, b'O', b'W', 0x00, 0x00, 0x00, 0x00, 0x00, 0x10]
        );
    }

    #[test]
    fn decoders_read_back_encoded_headers() {
        use crate::decode::{Decode, ExplicitVRBigEndianDecoder};

        let encoder = ExplicitVRBigEndianEncoder::default();
        let mut out = Vec::new();
        let de = DataElementHeader::new(Tag(0x0020, 0x000D), VR::UI, Length(14));
        encoder.encode_element_header(&mut out, de).unwrap();

        let decoder = ExplicitVRBigEndianDecoder::default();
        let (read_back, _) = decoder
            .decode_header(&mut std::io::Cursor::new(out))
            .unwrap();
        assert_eq!(read_back, de);
    }
}
