//! The transfer-syntax aware data set writer.
//!
//! This module re-encodes the in-memory data set in a chosen transfer
//! syntax, and streams the parts of the source which were never loaded
//! (the pixel data value and any elements following it) straight from
//! the input to the output, swapping bytes where the byte orders differ.

use crate::mem::{InMemDicomObject, InMemElement};
use dcmflow_core::header::{DataElementHeader, Length, Tag, VR};
use dcmflow_core::value::{PrimitiveValue, Value};
use dcmflow_core::Header;
use dcmflow_encoding::encode::{self, DataEncoder, Encode};
use dcmflow_encoding::text::{self, SpecificCharacterSet, TextCodec};
use dcmflow_encoding::transfer_syntax::TransferSyntax;
use byteordered::Endianness;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{Read, Write};

/// An error which may occur while saving a DICOM object.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not create the output file: {}", source))]
    CreateOutput {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write the file meta group"))]
    WriteMeta {
        #[snafu(backtrace)]
        source: crate::meta::Error,
    },
    #[snafu(display("Could not encode an element header"))]
    WriteHeader {
        #[snafu(backtrace)]
        source: encode::Error,
    },
    #[snafu(display("Could not write value data: {}", source))]
    WriteValue {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not encode text for the output: {}", source))]
    EncodeText {
        #[snafu(backtrace)]
        source: text::TextEncodingError,
    },
    #[snafu(display("Could not read from the source: {}", source))]
    ReadSource {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not decode a source element header"))]
    DecodeSource {
        #[snafu(backtrace)]
        source: dcmflow_encoding::decode::Error,
    },
    /// An unexpected tag or a delimiter with a non-zero length
    /// was found inside the encapsulated pixel data.
    #[snafu(display("Bad encapsulated pixel data near tag {}", tag))]
    BadEncapsulation { tag: Tag, backtrace: Backtrace },
    /// A byte swap was requested for a value of odd length.
    #[snafu(display("Illegal length {} for swapping value bytes", len))]
    OddLengthSwap { len: u32, backtrace: Backtrace },
    /// An element past the pixel data has an undefined length
    /// and cannot be streamed.
    #[snafu(display("Undefined length of element {} past the pixel data", tag))]
    UndefinedValueLength { tag: Tag, backtrace: Backtrace },
    #[snafu(display("Could not restore the source position: {}", source))]
    RestorePosition {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Input stream is not open"))]
    InputNotOpen { backtrace: Backtrace },
    #[snafu(display("Unsupported transfer syntax `{}`", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A writer of in-memory data sets in a chosen transfer syntax.
#[derive(Debug)]
pub struct DataSetWriter {
    encoder: DataEncoder,
    endianness: Endianness,
}

impl DataSetWriter {
    /// Create a writer for the given target transfer syntax.
    pub fn new(ts: &TransferSyntax) -> Self {
        DataSetWriter {
            encoder: ts.encoder(),
            endianness: ts.endianness(),
        }
    }

    /// The byte order of the produced output.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Write a bare element header in the target encoding,
    /// leaving the value to be written separately.
    pub fn write_header<W>(&self, to: &mut W, header: DataElementHeader) -> Result<()>
    where
        W: Write,
    {
        self.encoder
            .encode_element_header(to, header)
            .context(WriteHeaderSnafu)?;
        Ok(())
    }

    /// Write an item header with the given value length.
    pub fn write_item_header<W>(&self, to: &mut W, len: u32) -> Result<()>
    where
        W: Write,
    {
        self.encoder
            .encode_item_header(to, len)
            .context(WriteHeaderSnafu)
    }

    /// Write a sequence delimitation item with zero length.
    pub fn write_sequence_delimiter<W>(&self, to: &mut W) -> Result<()>
    where
        W: Write,
    {
        self.encoder
            .encode_sequence_delimiter(to)
            .context(WriteHeaderSnafu)
    }

    /// Write all elements of the data set to the given sink,
    /// re-encoding values for the target byte order
    /// (`source_endianness` names the byte order of in-memory
    /// binary values).
    pub fn write_data_set<W>(
        &self,
        to: &mut W,
        obj: &InMemDicomObject,
        source_endianness: Endianness,
    ) -> Result<()>
    where
        W: Write,
    {
        for elem in obj {
            self.write_element(to, obj.charset(), elem, source_endianness)?;
        }
        Ok(())
    }

    fn write_element<W>(
        &self,
        to: &mut W,
        charset: SpecificCharacterSet,
        elem: &InMemElement,
        source_endianness: Endianness,
    ) -> Result<()>
    where
        W: Write,
    {
        match elem.value() {
            Value::Sequence { items, .. } => {
                // sequences are written with undefined lengths,
                // framed by item and sequence delimiters
                self.encoder
                    .encode_element_header(
                        &mut *to,
                        DataElementHeader::new(elem.tag(), VR::SQ, Length::UNDEFINED),
                    )
                    .context(WriteHeaderSnafu)?;
                for item in items {
                    self.encoder
                        .encode_item_header(&mut *to, Length::UNDEFINED.0)
                        .context(WriteHeaderSnafu)?;
                    self.write_data_set(to, item, source_endianness)?;
                    self.encoder
                        .encode_item_delimiter(&mut *to)
                        .context(WriteHeaderSnafu)?;
                }
                self.encoder
                    .encode_sequence_delimiter(&mut *to)
                    .context(WriteHeaderSnafu)?;
                Ok(())
            }
            Value::Primitive(value) => {
                let data =
                    encode_primitive(value, elem.vr(), charset, source_endianness, self.endianness)?;
                self.encoder
                    .encode_element_header(
                        &mut *to,
                        DataElementHeader::new(elem.tag(), elem.vr(), Length(data.len() as u32)),
                    )
                    .context(WriteHeaderSnafu)?;
                to.write_all(&data).context(WriteValueSnafu)?;
                Ok(())
            }
        }
    }
}

/// Produce the on-disk bytes of a primitive value:
/// text is encoded through the data set's character set
/// and padded to an even length;
/// binary data is byte-swapped when the byte orders differ.
fn encode_primitive(
    value: &PrimitiveValue,
    vr: VR,
    charset: SpecificCharacterSet,
    source_endianness: Endianness,
    target_endianness: Endianness,
) -> Result<Vec<u8>> {
    match value {
        PrimitiveValue::Empty => Ok(Vec::new()),
        PrimitiveValue::Strs(_) => {
            let joined = value.to_str().unwrap_or_default();
            let mut data = charset.codec().encode(&joined).context(EncodeTextSnafu)?;
            if data.len() % 2 != 0 {
                data.push(vr.padding_byte());
            }
            Ok(data)
        }
        PrimitiveValue::Bytes(bytes) => {
            let mut data = bytes.clone();
            let width = vr.unit_width();
            if source_endianness != target_endianness && width > 1 {
                if data.len() % width != 0 {
                    return OddLengthSwapSnafu {
                        len: data.len() as u32,
                    }
                    .fail();
                }
                for chunk in data.chunks_exact_mut(width) {
                    chunk.reverse();
                }
            }
            Ok(data)
        }
    }
}

/// Copy `len` value bytes from the source to the sink,
/// optionally swapping each 2-byte pair.
pub fn copy_value<R, W>(from: &mut R, to: &mut W, len: u32, swap: bool) -> Result<()>
where
    R: Read,
    W: Write,
{
    if swap && len % 2 != 0 {
        return OddLengthSwapSnafu { len }.fail();
    }
    let mut buffer = [0u8; 4096];
    let mut remaining = len as usize;
    while remaining > 0 {
        let n = remaining.min(buffer.len());
        from.read_exact(&mut buffer[..n]).context(ReadSourceSnafu)?;
        if swap {
            for pair in buffer[..n].chunks_exact_mut(2) {
                pair.swap(0, 1);
            }
        }
        to.write_all(&buffer[..n]).context(WriteValueSnafu)?;
        remaining -= n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmflow_core::header::DataElement;
    use dcmflow_encoding::transfer_syntax;

    #[test]
    fn string_values_are_padded_even() {
        let value = PrimitiveValue::from("CT");
        let data = encode_primitive(
            &value,
            VR::CS,
            SpecificCharacterSet::Default,
            Endianness::Little,
            Endianness::Little,
        )
        .unwrap();
        assert_eq!(data, b"CT");

        let value = PrimitiveValue::from("DERIVED\\PRIMARY");
        let data = encode_primitive(
            &value,
            VR::CS,
            SpecificCharacterSet::Default,
            Endianness::Little,
            Endianness::Little,
        )
        .unwrap();
        assert_eq!(data, b"DERIVED\\PRIMARY ");

        let value = PrimitiveValue::from("1.2.840");
        let data = encode_primitive(
            &value,
            VR::UI,
            SpecificCharacterSet::Default,
            Endianness::Little,
            Endianness::Little,
        )
        .unwrap();
        assert_eq!(data, b"1.2.840\0");
    }

    #[test]
    fn binary_values_swap_on_byte_order_change() {
        let value = PrimitiveValue::Bytes(vec![0x01, 0x02, 0x03, 0x04]);
        let data = encode_primitive(
            &value,
            VR::US,
            SpecificCharacterSet::Default,
            Endianness::Little,
            Endianness::Big,
        )
        .unwrap();
        assert_eq!(data, vec![0x02, 0x01, 0x04, 0x03]);

        // 4-byte units reverse whole words
        let value = PrimitiveValue::Bytes(vec![0x01, 0x02, 0x03, 0x04]);
        let data = encode_primitive(
            &value,
            VR::UL,
            SpecificCharacterSet::Default,
            Endianness::Little,
            Endianness::Big,
        )
        .unwrap();
        assert_eq!(data, vec![0x04, 0x03, 0x02, 0x01]);

        // same byte order: untouched
        let value = PrimitiveValue::Bytes(vec![0x01, 0x02]);
        let data = encode_primitive(
            &value,
            VR::US,
            SpecificCharacterSet::Default,
            Endianness::Little,
            Endianness::Little,
        )
        .unwrap();
        assert_eq!(data, vec![0x01, 0x02]);
    }

    #[test]
    fn copy_value_swaps_pairs() {
        let src = [0x01u8, 0x02, 0x03, 0x04];
        let mut out = Vec::new();
        copy_value(&mut &src[..], &mut out, 4, true).unwrap();
        assert_eq!(out, vec![0x02, 0x01, 0x04, 0x03]);

        let mut out = Vec::new();
        copy_value(&mut &src[..], &mut out, 4, false).unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn odd_length_swap_is_an_error() {
        let src = [0x01u8, 0x02, 0x03];
        let mut out = Vec::new();
        let err = copy_value(&mut &src[..], &mut out, 3, true).unwrap_err();
        assert!(matches!(err, Error::OddLengthSwap { len: 3, .. }));
    }

    #[test]
    fn write_sequence_with_delimiters() {
        let mut item = InMemDicomObject::new_empty();
        item.put_str(Tag(0x0008, 0x0100), VR::SH, "TCE001");
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new_with_len(
            Tag(0x0040, 0xA043),
            VR::SQ,
            Length::UNDEFINED,
            Value::Sequence {
                items: smallvec::smallvec![item],
                len: Length::UNDEFINED,
            },
        ));

        let ts = transfer_syntax::lookup("1.2.840.10008.1.2.1").unwrap();
        let writer = DataSetWriter::new(ts);
        let mut out = Vec::new();
        writer
            .write_data_set(&mut out, &obj, Endianness::Little)
            .unwrap();

        let expected: &[u8] = &[
            // (0040,A043) SQ undefined
            0x40, 0x00, 0x43, 0xA0, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
            // item, undefined length
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, //
            // (0008,0100) SH 6 "TCE001"
            0x08, 0x00, 0x00, 0x01, b'S', b'H', 0x06, 0x00, b'T', b'C', b'E', b'0', b'0', b'1', //
            // item delimiter
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
            // sequence delimiter
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(out, expected);
    }
}
