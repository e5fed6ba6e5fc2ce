//! The implicit VR element header encoder.
//!
//! In Implicit VR Little Endian every header is the same eight bytes:
//! the tag followed by a 32-bit length, with no VR in the stream.

use crate::encode::basic::LittleEndianBasicEncoder;
use crate::encode::{
    BasicEncode, Encode, Result, WriteHeaderSnafu, WriteItemDelimiterSnafu, WriteItemHeaderSnafu,
    WriteSequenceDelimiterSnafu, WriteTagSnafu,
};
use dcmflow_core::header::DataElementHeader;
use dcmflow_core::{HasLength, Header, Tag};
use snafu::ResultExt;
use std::io::{self, Write};

/// A concrete encoder for the transfer syntax ImplicitVRLittleEndian
#[derive(Debug, Default, Clone)]
pub struct ImplicitVRLittleEndianEncoder {
    basic: LittleEndianBasicEncoder,
}

impl ImplicitVRLittleEndianEncoder {
    fn write_tag_and_length<W>(&self, to: &mut W, tag: Tag, len: u32) -> io::Result<()>
    where
        W: Write,
    {
        self.basic.encode_us(&mut *to, tag.group())?;
        self.basic.encode_us(&mut *to, tag.element())?;
        self.basic.encode_ul(&mut *to, len)
    }
}

impl Encode for ImplicitVRLittleEndianEncoder {
    fn encode_tag<W>(&self, mut to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        self.basic
            .encode_us(&mut to, tag.group())
            .context(WriteTagSnafu)?;
        self.basic
            .encode_us(&mut to, tag.element())
            .context(WriteTagSnafu)
    }

    fn encode_element_header<W>(&self, mut to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        self.write_tag_and_length(&mut to, de.tag(), de.length().0)
            .context(WriteHeaderSnafu)?;
        Ok(8)
    }

    fn encode_item_header<W>(&self, mut to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        self.write_tag_and_length(&mut to, Tag(0xFFFE, 0xE000), len)
            .context(WriteItemHeaderSnafu)
    }

    fn encode_item_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.write_tag_and_length(&mut to, Tag(0xFFFE, 0xE00D), 0)
            .context(WriteItemDelimiterSnafu)
    }

    fn encode_sequence_delimiter<W>(&self, mut to: W) -> Result<()>
    where
        W: Write,
    {
        self.write_tag_and_length(&mut to, Tag(0xFFFE, 0xE0DD), 0)
            .context(WriteSequenceDelimiterSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmflow_core::header::Length;
    use dcmflow_core::VR;

    #[test]
    fn headers_carry_no_vr() {
        let encoder = ImplicitVRLittleEndianEncoder::default();
        let mut out = Vec::new();
        let de = DataElementHeader::new(Tag(0x0010, 0x0020), VR::LO, Length(8));
        let bytes = encoder.encode_element_header(&mut out, de).unwrap();
        assert_eq!(bytes, 8);
        assert_eq!(out, &[0x10, 0x00, 0x20, 0x00, 0x08, 0x00, 0x00, 0x00]);

        // the VR in the in-memory header makes no difference here
        out.clear();
        let de = DataElementHeader::new(Tag(0x0010, 0x0020), VR::UN, Length(8));
        encoder.encode_element_header(&mut out, de).unwrap();
        assert_eq!(out, &[0x10, 0x00, 0x20, 0x00, 0x08, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn item_framing() {
        let encoder = ImplicitVRLittleEndianEncoder::default();
        let mut out = Vec::new();
        encoder.encode_item_header(&mut out, 0x10).unwrap();
        encoder.encode_sequence_delimiter(&mut out).unwrap();
        assert_eq!(
            out,
            &[
                0xFE, 0xFF, 0x00, 0xE0, 0x10, 0x00, 0x00, 0x00, //
                0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
            ]
        );
    }
}
