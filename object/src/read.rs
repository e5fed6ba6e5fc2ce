//! The streaming data set reader.
//!
//! This module hosts the format detection ladder
//! and the stateful reader which populates an in-memory data set
//! up to (but not including) the pixel data value,
//! keeping track of the stream position
//! so that reading can later resume from the element at the cursor.

use crate::mem::{InMemDicomObject, InMemElement};
use dcmflow_core::header::{DataElement, DataElementHeader, Length, SequenceItemHeader, Tag, VR};
use dcmflow_core::value::{PrimitiveValue, Value};
use dcmflow_core::{Header, C};
use dcmflow_dictionary::tags;
use dcmflow_encoding::decode::{self, DataDecoder, Decode};
use dcmflow_encoding::text::{self, trim_trailing_padding, SpecificCharacterSet, TextCodec};
use dcmflow_encoding::transfer_syntax::TransferSyntax;
use smallvec::smallvec;
use snafu::{Backtrace, ResultExt, Snafu};
use std::io::{Read, Seek, SeekFrom};

/// An error which may occur while parsing a DICOM data set.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    /// No magic code and no plausible bare data set start.
    #[snafu(display("Unrecognized file format"))]
    UnrecognizedFormat { backtrace: Backtrace },
    #[snafu(display("Could not access the source: {}", source))]
    AccessSource {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not read the file meta group"))]
    ReadMeta {
        #[snafu(backtrace)]
        source: crate::meta::Error,
    },
    #[snafu(display("Unsupported transfer syntax `{}`", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    #[snafu(display("Could not decode element header at position {}", position))]
    DecodeHeader {
        position: u64,
        #[snafu(backtrace)]
        source: decode::Error,
    },
    #[snafu(display("Could not read value of element {} at position {}", tag, position))]
    ReadValueData {
        tag: Tag,
        position: u64,
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not decode text at position {}", position))]
    DecodeText {
        position: u64,
        #[snafu(backtrace)]
        source: text::TextEncodingError,
    },
    #[snafu(display("Unexpected tag {} at position {}", tag, position))]
    UnexpectedTag {
        tag: Tag,
        position: u64,
        backtrace: Backtrace,
    },
    #[snafu(display("Data set ended prematurely at position {}", position))]
    PrematureEnd { position: u64, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The detected encoding layout of a DICOM source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// 128-byte preamble, `DICM` magic code and file meta group.
    Part10,
    /// A bare data set in Implicit VR Little Endian.
    RawImplicitVRLittleEndian,
    /// A bare data set in Explicit VR Little Endian.
    RawExplicitVRLittleEndian,
    /// A bare data set in Explicit VR Big Endian.
    RawExplicitVRBigEndian,
}

/// groups which plausibly start a DICOM data set
fn is_plausible_group(group: u16) -> bool {
    matches!(group, 0x0002 | 0x0004 | 0x0008)
}

/// Detect the encoding layout of the given source.
///
/// The source is left positioned at the `DICM` magic code
/// for [`FileFormat::Part10`],
/// and at the beginning of the data for the bare data set formats.
pub fn detect_format<R>(source: &mut R) -> Result<FileFormat>
where
    R: Read + Seek,
{
    let file_len = source.seek(SeekFrom::End(0)).context(AccessSourceSnafu)?;
    source.seek(SeekFrom::Start(0)).context(AccessSourceSnafu)?;

    if file_len >= 132 {
        let mut head = [0u8; 132];
        source.read_exact(&mut head).context(AccessSourceSnafu)?;
        if &head[128..132] == b"DICM" {
            source
                .seek(SeekFrom::Start(128))
                .context(AccessSourceSnafu)?;
            return Ok(FileFormat::Part10);
        }
        source.seek(SeekFrom::Start(0)).context(AccessSourceSnafu)?;
    }

    if file_len >= 8 {
        let mut head = [0u8; 8];
        source.read_exact(&mut head).context(AccessSourceSnafu)?;
        source.seek(SeekFrom::Start(0)).context(AccessSourceSnafu)?;

        let group_le = u16::from(head[0]) | (u16::from(head[1]) << 8);
        let group_be = (u16::from(head[0]) << 8) | u16::from(head[1]);
        let len_le = u32::from(head[4])
            | (u32::from(head[5]) << 8)
            | (u32::from(head[6]) << 16)
            | (u32::from(head[7]) << 24);
        let vr_valid = VR::from_binary([head[4], head[5]]).is_some();

        // a bare implicit VR data set:
        // a plausible first group and a length which fits the stream
        if is_plausible_group(group_le) && u64::from(len_le) <= file_len - 8 {
            return Ok(FileFormat::RawImplicitVRLittleEndian);
        }
        if is_plausible_group(group_le) && vr_valid {
            return Ok(FileFormat::RawExplicitVRLittleEndian);
        }
        if is_plausible_group(group_be) && vr_valid {
            return Ok(FileFormat::RawExplicitVRBigEndian);
        }
    }

    UnrecognizedFormatSnafu.fail()
}

/// A stateful reader of data set elements,
/// which keeps track of the stream position
/// and the active character set.
#[derive(Debug)]
pub struct DataSetReader<R> {
    source: R,
    decoder: DataDecoder,
    charset: SpecificCharacterSet,
    position: u64,
}

impl<R> DataSetReader<R>
where
    R: Read,
{
    /// Create a new data set reader over the given source,
    /// with the decoder of the given transfer syntax,
    /// starting at the given stream offset.
    pub fn new(source: R, ts: &TransferSyntax, base_offset: u64) -> Self {
        DataSetReader {
            source,
            decoder: ts.decoder(),
            charset: SpecificCharacterSet::default(),
            position: base_offset,
        }
    }

    /// The number of bytes of the stream consumed so far
    /// (including the base offset given at construction).
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The character set currently in effect.
    pub fn charset(&self) -> SpecificCharacterSet {
        self.charset
    }

    /// Recover the source, discarding the reader state.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Decode the next element header,
    /// or `None` on a clean end of stream.
    fn decode_header(&mut self) -> Result<Option<DataElementHeader>> {
        match self.decoder.decode_header(&mut self.source) {
            Ok((header, bytes_read)) => {
                self.position += bytes_read as u64;
                Ok(Some(header))
            }
            Err(decode::Error::ReadHeaderTag { ref source, .. })
                if source.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                Ok(None)
            }
            Err(e) => Err(e).context(DecodeHeaderSnafu {
                position: self.position,
            }),
        }
    }

    /// Decode the next element header,
    /// failing if the stream ends first.
    fn expect_header(&mut self) -> Result<DataElementHeader> {
        let position = self.position;
        self.decode_header()?
            .ok_or_else(|| PrematureEndSnafu { position }.build())
    }

    fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        let header = self
            .decoder
            .decode_item_header(&mut self.source)
            .context(DecodeHeaderSnafu {
                position: self.position,
            })?;
        self.position += 8;
        Ok(header)
    }

    fn read_value_bytes(&mut self, tag: Tag, len: u32) -> Result<Vec<u8>> {
        let mut data = vec![0; len as usize];
        self.source
            .read_exact(&mut data)
            .context(ReadValueDataSnafu {
                tag,
                position: self.position,
            })?;
        self.position += u64::from(len);
        Ok(data)
    }

    /// Read the value following the given header as a primitive value,
    /// decoding string class values through the active character set.
    fn read_primitive_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let len = header.len.0;
        if len == 0 {
            return Ok(PrimitiveValue::Empty);
        }
        let data = self.read_value_bytes(header.tag, len)?;
        if header.vr.is_string_class() {
            let data = trim_trailing_padding(&data, header.vr.padding_byte());
            let text = self
                .charset
                .codec()
                .decode(data)
                .context(DecodeTextSnafu {
                    position: self.position,
                })?;
            let values: C<String> = if header.vr.is_multi_string() {
                text.split('\\').map(str::to_owned).collect()
            } else {
                smallvec![text]
            };
            Ok(PrimitiveValue::Strs(values))
        } else {
            Ok(PrimitiveValue::Bytes(data))
        }
    }
}

/// Read data set elements into an in-memory object
/// until the Pixel Data element or the end of the stream.
///
/// Returns the populated object and,
/// if the reader stopped at Pixel Data,
/// the header of that element with the value left unread.
pub fn read_data_set<R>(
    reader: &mut DataSetReader<R>,
) -> Result<(InMemDicomObject, Option<DataElementHeader>)>
where
    R: Read,
{
    let mut obj = InMemDicomObject::with_charset(reader.charset());
    loop {
        let header = match reader.decode_header()? {
            Some(header) => header,
            None => return Ok((obj, None)),
        };
        if header.tag == tags::PIXEL_DATA {
            return Ok((obj, Some(header)));
        }
        if header.tag.group() == 0xFFFE {
            return UnexpectedTagSnafu {
                tag: header.tag,
                position: reader.position(),
            }
            .fail();
        }
        store_element(reader, &mut obj, header)?;
    }
}

/// Read the element under the given header and insert it into the object,
/// installing a new character set when the element is
/// Specific Character Set (0008,0005).
fn store_element<R>(
    reader: &mut DataSetReader<R>,
    obj: &mut InMemDicomObject,
    header: DataElementHeader,
) -> Result<()>
where
    R: Read,
{
    let elem = read_element(reader, header)?;
    if elem.tag() == tags::SPECIFIC_CHARACTER_SET {
        install_charset(reader, obj, &elem);
    }
    obj.put(elem);
    Ok(())
}

fn install_charset<R>(
    reader: &mut DataSetReader<R>,
    obj: &mut InMemDicomObject,
    elem: &InMemElement,
) {
    let values = match elem.value().primitive().and_then(PrimitiveValue::strings) {
        Some(values) => values,
        None => return,
    };
    // multi-valued character sets declare code extensions;
    // take the first value which names a supported repertoire
    let charset = values
        .iter()
        .find_map(|v| SpecificCharacterSet::from_code(v));
    match charset {
        Some(cs) => {
            reader.charset = cs;
            obj.set_charset(cs);
        }
        None => {
            tracing::warn!(
                "Unsupported character set {:?}, keeping {:?}",
                values,
                reader.charset
            );
        }
    }
}

fn read_element<R>(
    reader: &mut DataSetReader<R>,
    header: DataElementHeader,
) -> Result<InMemElement>
where
    R: Read,
{
    if header.vr == VR::SQ || header.len.is_undefined() {
        let items = if header.len.is_undefined() {
            read_items_undefined_len(reader)?
        } else {
            read_items_defined_len(reader, header.len.0)?
        };
        Ok(DataElement::new_with_len(
            header.tag,
            header.vr,
            header.len,
            Value::Sequence {
                items,
                len: header.len,
            },
        ))
    } else {
        let value = reader.read_primitive_value(&header)?;
        Ok(DataElement::new_with_len(
            header.tag,
            header.vr,
            header.len,
            value,
        ))
    }
}

fn read_items_undefined_len<R>(reader: &mut DataSetReader<R>) -> Result<C<InMemDicomObject>>
where
    R: Read,
{
    let mut items: C<InMemDicomObject> = smallvec![];
    loop {
        match reader.decode_item_header()? {
            SequenceItemHeader::Item { len } => items.push(read_item(reader, len)?),
            SequenceItemHeader::SequenceDelimiter => return Ok(items),
            SequenceItemHeader::ItemDelimiter => {
                return UnexpectedTagSnafu {
                    tag: Tag(0xFFFE, 0xE00D),
                    position: reader.position(),
                }
                .fail()
            }
        }
    }
}

fn read_items_defined_len<R>(
    reader: &mut DataSetReader<R>,
    len: u32,
) -> Result<C<InMemDicomObject>>
where
    R: Read,
{
    let mut items: C<InMemDicomObject> = smallvec![];
    let end = reader.position() + u64::from(len);
    while reader.position() < end {
        match reader.decode_item_header()? {
            SequenceItemHeader::Item { len } => items.push(read_item(reader, len)?),
            // a delimiter inside a sequence of defined length is
            // tolerated, ending the sequence early
            SequenceItemHeader::SequenceDelimiter => break,
            SequenceItemHeader::ItemDelimiter => {
                return UnexpectedTagSnafu {
                    tag: Tag(0xFFFE, 0xE00D),
                    position: reader.position(),
                }
                .fail()
            }
        }
    }
    Ok(items)
}

fn read_item<R>(reader: &mut DataSetReader<R>, len: Length) -> Result<InMemDicomObject>
where
    R: Read,
{
    // the item inherits the enclosing character set,
    // and any override is contained to the item's scope
    let enclosing_charset = reader.charset;
    let mut obj = InMemDicomObject::with_charset(enclosing_charset);

    if len.is_undefined() {
        loop {
            let header = reader.expect_header()?;
            if header.tag == Tag(0xFFFE, 0xE00D) {
                break;
            }
            if header.tag.group() == 0xFFFE {
                return UnexpectedTagSnafu {
                    tag: header.tag,
                    position: reader.position(),
                }
                .fail();
            }
            store_element(reader, &mut obj, header)?;
        }
    } else {
        let end = reader.position() + u64::from(len.0);
        while reader.position() < end {
            let header = reader.expect_header()?;
            if header.tag.group() == 0xFFFE {
                return UnexpectedTagSnafu {
                    tag: header.tag,
                    position: reader.position(),
                }
                .fail();
            }
            store_element(reader, &mut obj, header)?;
        }
    }

    reader.charset = enclosing_charset;
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmflow_encoding::transfer_syntax;
    use std::io::Cursor;

    // A small data set in Explicit VR Little Endian:
    //   (0008,0060) CS, 2, "CT"
    //   (0008,103F) SQ, undefined, one item with (0008,0100) SH, 6, "TCE001"
    //   (0010,0020) LO, 8, "JOHN^DOE"
    const RAW_EXPL_LE: &[u8] = &[
        // (0008,0060) CS 2 "CT"
        0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'C', b'T', //
        // (0008,103F) SQ undefined
        0x08, 0x00, 0x3F, 0x10, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
        // item, undefined length
        0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF, //
        // (0008,0100) SH 6 "TCE001"
        0x08, 0x00, 0x00, 0x01, b'S', b'H', 0x06, 0x00, b'T', b'C', b'E', b'0', b'0', b'1', //
        // item delimiter
        0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        // sequence delimiter
        0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00, //
        // (0010,0020) LO 8 "JOHN^DOE"
        0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x08, 0x00, b'J', b'O', b'H', b'N', b'^', b'D', b'O',
        b'E',
    ];

    #[test]
    fn read_flat_and_nested_elements() {
        let ts = transfer_syntax::lookup("1.2.840.10008.1.2.1").unwrap();
        let mut reader = DataSetReader::new(Cursor::new(RAW_EXPL_LE), ts, 0);
        let (obj, pixel_header) = read_data_set(&mut reader).unwrap();

        assert!(pixel_header.is_none());
        assert_eq!(obj.len(), 3);
        assert_eq!(
            obj.element(Tag(0x0008, 0x0060))
                .unwrap()
                .value()
                .primitive()
                .unwrap()
                .to_str()
                .unwrap(),
            "CT"
        );
        let seq = obj.element(Tag(0x0008, 0x103F)).unwrap();
        assert_eq!(seq.vr(), VR::SQ);
        let items = seq.value().items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0]
                .element(Tag(0x0008, 0x0100))
                .unwrap()
                .value()
                .primitive()
                .unwrap()
                .to_str()
                .unwrap(),
            "TCE001"
        );
        // the reader consumed the entire stream
        assert_eq!(reader.position(), RAW_EXPL_LE.len() as u64);
    }

    #[test]
    fn read_stops_at_pixel_data() {
        // (0028,0010) US 2 [2], then PixelData OW 8
        const RAW: &[u8] = &[
            0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x02, 0x00, 0x02, 0x00, //
            0xE0, 0x7F, 0x10, 0x00, b'O', b'W', 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, //
            1, 2, 3, 4, 5, 6, 7, 8,
        ];
        let ts = transfer_syntax::lookup("1.2.840.10008.1.2.1").unwrap();
        let mut reader = DataSetReader::new(Cursor::new(RAW), ts, 0);
        let (obj, pixel_header) = read_data_set(&mut reader).unwrap();

        let header = pixel_header.expect("should stop at pixel data");
        assert_eq!(header.tag, tags::PIXEL_DATA);
        assert_eq!(header.vr, VR::OW);
        assert_eq!(header.len, Length(8));
        // cursor points at the start of the pixel data value
        assert_eq!(reader.position(), 22);
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn detect_preamble_format() {
        let mut data = vec![0u8; 128];
        data.extend_from_slice(b"DICM");
        data.extend_from_slice(&[0u8; 16]);
        let mut cursor = Cursor::new(data);
        assert_eq!(detect_format(&mut cursor).unwrap(), FileFormat::Part10);
        // positioned at the magic code
        assert_eq!(cursor.position(), 128);
    }

    #[test]
    fn detect_bare_formats() {
        // implicit LE: (0008,0060), length 2
        let mut cursor = Cursor::new(vec![
            0x08, 0x00, 0x60, 0x00, 0x02, 0x00, 0x00, 0x00, b'C', b'T',
        ]);
        assert_eq!(
            detect_format(&mut cursor).unwrap(),
            FileFormat::RawImplicitVRLittleEndian
        );
        assert_eq!(cursor.position(), 0);

        // explicit LE: (0008,0060) CS
        let mut cursor = Cursor::new(vec![
            0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'C', b'T',
        ]);
        assert_eq!(
            detect_format(&mut cursor).unwrap(),
            FileFormat::RawExplicitVRLittleEndian
        );

        // explicit BE: (0008,0060) CS
        let mut cursor = Cursor::new(vec![
            0x00, 0x08, 0x00, 0x60, b'C', b'S', 0x00, 0x02, b'C', b'T',
        ]);
        assert_eq!(
            detect_format(&mut cursor).unwrap(),
            FileFormat::RawExplicitVRBigEndian
        );

        // garbage
        let mut cursor = Cursor::new(vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(
            detect_format(&mut cursor),
            Err(Error::UnrecognizedFormat { .. })
        ));
    }
}
