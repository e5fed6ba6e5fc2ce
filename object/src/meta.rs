//! Data structures, readers and writers
//! of the DICOM file meta information group.

use byteordered::byteorder::{ByteOrder, LittleEndian};
use dcmflow_core::header::{DataElementHeader, Header, Length, Tag, VR};
use dcmflow_encoding::decode::{self, Decode};
use dcmflow_encoding::encode::{Encode, ExplicitVRLittleEndianEncoder};
use dcmflow_encoding::text::{trim_trailing_padding, DefaultCharacterSetCodec, TextCodec};
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};
use std::io::{Read, Write};

const DICM_MAGIC_CODE: [u8; 4] = [b'D', b'I', b'C', b'M'];

/// The UID declared by this implementation in the file meta group it writes.
pub const IMPLEMENTATION_CLASS_UID: &str = "1.2.826.0.1.3680043.10.917.1";
/// The version name declared by this implementation.
pub const IMPLEMENTATION_VERSION_NAME: &str = "DCMFLOW_010";

/// An error which may occur
/// while reading or writing the file meta group.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The DICM magic code is missing.
    #[snafu(display("Missing `DICM` magic code"))]
    NoMagicCode { backtrace: Backtrace },
    #[snafu(display("Could not read the file meta group: {}", source))]
    ReadData {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not decode a file meta element header"))]
    DecodeElementHeader {
        #[snafu(backtrace)]
        source: decode::Error,
    },
    #[snafu(display("Unexpected tag {} in the file meta group", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },
    #[snafu(display("Unexpected length {} for file meta element", len))]
    UnexpectedDataValueLength { len: Length, backtrace: Backtrace },
    #[snafu(display("Could not decode file meta text: {}", source))]
    DecodeText {
        #[snafu(backtrace)]
        source: dcmflow_encoding::text::TextEncodingError,
    },
    #[snafu(display("Could not encode file meta text: {}", source))]
    EncodeText {
        #[snafu(backtrace)]
        source: dcmflow_encoding::text::TextEncodingError,
    },
    /// A required element in the meta group is missing.
    #[snafu(display("Missing required meta element `{}`", name))]
    MissingElement {
        name: &'static str,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not write the file meta group: {}", source))]
    WriteData {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not encode a file meta element header"))]
    EncodeElementHeader {
        #[snafu(backtrace)]
        source: dcmflow_encoding::encode::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// DICOM file meta information table.
///
/// This data type contains the relevant parts of the file meta information
/// group (0002). String values are kept with their even-length padding
/// already removed.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaTable {
    /// File Meta Information Group Length
    pub information_group_length: u32,
    /// File Meta Information Version
    pub information_version: [u8; 2],
    /// Media Storage SOP Class UID
    pub media_storage_sop_class_uid: String,
    /// Media Storage SOP Instance UID
    pub media_storage_sop_instance_uid: String,
    /// Transfer Syntax UID
    pub transfer_syntax: String,
    /// Implementation Class UID
    pub implementation_class_uid: String,

    /// Implementation Version Name
    pub implementation_version_name: Option<String>,
    /// Source Application Entity Title
    pub source_application_entity_title: Option<String>,
    /// Private Information Creator UID
    pub private_information_creator_uid: Option<String>,
    /// Private Information
    pub private_information: Option<Vec<u8>>,
}

fn read_str_value<S>(
    source: &mut S,
    len: usize,
    group_length_remaining: &mut u32,
    header_len: u32,
    pad: u8,
) -> Result<String>
where
    S: Read,
{
    let mut v = vec![0; len];
    source.read_exact(&mut v).context(ReadDataSnafu)?;
    *group_length_remaining =
        group_length_remaining.saturating_sub(header_len + len as u32);
    DefaultCharacterSetCodec
        .decode(trim_trailing_padding(&v, pad))
        .context(DecodeTextSnafu)
}

impl FileMetaTable {
    /// Read a file meta table from the given source,
    /// which must be positioned at the `DICM` magic code
    /// (that is, past the 128-byte preamble when one is present).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        FileMetaTable::read_from(reader)
    }

    fn read_from<S: Read>(mut file: S) -> Result<Self> {
        let mut buff: [u8; 4] = [0; 4];
        {
            // check magic code
            file.read_exact(&mut buff).context(ReadDataSnafu)?;
            if buff != DICM_MAGIC_CODE {
                return NoMagicCodeSnafu.fail();
            }
        }

        let decoder = decode::file_header_decoder();

        let group_length: u32 = {
            let (elem, _) = decoder
                .decode_header(&mut file)
                .context(DecodeElementHeaderSnafu)?;
            if elem.tag() != Tag(0x0002, 0x0000) {
                return UnexpectedTagSnafu { tag: elem.tag() }.fail();
            }
            if elem.len != Length(4) {
                return UnexpectedDataValueLengthSnafu { len: elem.len }.fail();
            }
            let mut buff: [u8; 4] = [0; 4];
            file.read_exact(&mut buff).context(ReadDataSnafu)?;
            LittleEndian::read_u32(&buff)
        };

        let mut group_length_remaining = group_length;
        let mut builder = FileMetaTableBuilder::new().group_length(group_length);

        while group_length_remaining > 0 {
            let (elem, header_len) = decoder
                .decode_header(&mut file)
                .context(DecodeElementHeaderSnafu)?;
            let elem_len = match elem.len.get() {
                None => {
                    return UnexpectedDataValueLengthSnafu { len: elem.len }.fail();
                }
                Some(len) => len as usize,
            };
            let header_len = header_len as u32;
            builder = match elem.tag() {
                Tag(0x0002, 0x0001) => {
                    // File Meta Information Version
                    if elem.len != Length(2) {
                        return UnexpectedDataValueLengthSnafu { len: elem.len }.fail();
                    }
                    let mut hbuf = [0u8; 2];
                    file.read_exact(&mut hbuf[..]).context(ReadDataSnafu)?;
                    group_length_remaining -= header_len + 2;
                    builder.information_version(hbuf)
                }
                Tag(0x0002, 0x0002) => builder.media_storage_sop_class_uid(read_str_value(
                    &mut file,
                    elem_len,
                    &mut group_length_remaining,
                    header_len,
                    0,
                )?),
                Tag(0x0002, 0x0003) => builder.media_storage_sop_instance_uid(read_str_value(
                    &mut file,
                    elem_len,
                    &mut group_length_remaining,
                    header_len,
                    0,
                )?),
                Tag(0x0002, 0x0010) => builder.transfer_syntax(read_str_value(
                    &mut file,
                    elem_len,
                    &mut group_length_remaining,
                    header_len,
                    0,
                )?),
                Tag(0x0002, 0x0012) => builder.implementation_class_uid(read_str_value(
                    &mut file,
                    elem_len,
                    &mut group_length_remaining,
                    header_len,
                    0,
                )?),
                Tag(0x0002, 0x0013) => builder.implementation_version_name(read_str_value(
                    &mut file,
                    elem_len,
                    &mut group_length_remaining,
                    header_len,
                    b' ',
                )?),
                Tag(0x0002, 0x0016) => builder.source_application_entity_title(read_str_value(
                    &mut file,
                    elem_len,
                    &mut group_length_remaining,
                    header_len,
                    b' ',
                )?),
                Tag(0x0002, 0x0100) => builder.private_information_creator_uid(read_str_value(
                    &mut file,
                    elem_len,
                    &mut group_length_remaining,
                    header_len,
                    0,
                )?),
                Tag(0x0002, 0x0102) => {
                    let mut v = vec![0; elem_len];
                    file.read_exact(&mut v).context(ReadDataSnafu)?;
                    group_length_remaining -= header_len + elem_len as u32;
                    builder.private_information(v)
                }
                Tag(0x0002, _) => {
                    // unrecognized group 2 element, skip its value
                    let mut v = vec![0; elem_len];
                    file.read_exact(&mut v).context(ReadDataSnafu)?;
                    group_length_remaining =
                        group_length_remaining.saturating_sub(header_len + elem_len as u32);
                    builder
                }
                tag => {
                    return UnexpectedTagSnafu { tag }.fail();
                }
            }
        }

        builder.build()
    }

    /// The transfer syntax UID declared in this table.
    pub fn transfer_syntax_uid(&self) -> &str {
        &self.transfer_syntax
    }

    /// Fetch the string value of a file meta element by tag,
    /// for the attributes represented in this table.
    pub fn element_value(&self, tag: Tag) -> Option<String> {
        match tag {
            Tag(0x0002, 0x0000) => Some(self.information_group_length.to_string()),
            Tag(0x0002, 0x0002) => Some(self.media_storage_sop_class_uid.clone()),
            Tag(0x0002, 0x0003) => Some(self.media_storage_sop_instance_uid.clone()),
            Tag(0x0002, 0x0010) => Some(self.transfer_syntax.clone()),
            Tag(0x0002, 0x0012) => Some(self.implementation_class_uid.clone()),
            Tag(0x0002, 0x0013) => self.implementation_version_name.clone(),
            Tag(0x0002, 0x0016) => self.source_application_entity_title.clone(),
            Tag(0x0002, 0x0100) => self.private_information_creator_uid.clone(),
            _ => None,
        }
    }

    /// Write the file meta group to the given sink:
    /// the `DICM` magic code followed by the group 2 elements
    /// with a recomputed group length.
    /// The 128-byte preamble is not written by this method.
    pub fn write_to<W: Write>(&self, mut to: W) -> Result<()> {
        let encoder = ExplicitVRLittleEndianEncoder::default();

        // encode every element after the group length into a buffer first,
        // so the group length can be computed
        let mut body = Vec::with_capacity(128);

        let write_str = |body: &mut Vec<u8>, tag: Tag, vr: VR, value: &str| -> Result<()> {
            let mut data = DefaultCharacterSetCodec
                .encode(value)
                .context(EncodeTextSnafu)?;
            if data.len() % 2 != 0 {
                data.push(vr.padding_byte());
            }
            encoder
                .encode_element_header(
                    &mut *body,
                    DataElementHeader::new(tag, vr, Length(data.len() as u32)),
                )
                .context(EncodeElementHeaderSnafu)?;
            body.extend_from_slice(&data);
            Ok(())
        };

        encoder
            .encode_element_header(
                &mut body,
                DataElementHeader::new(Tag(0x0002, 0x0001), VR::OB, Length(2)),
            )
            .context(EncodeElementHeaderSnafu)?;
        body.extend_from_slice(&self.information_version);

        write_str(
            &mut body,
            Tag(0x0002, 0x0002),
            VR::UI,
            &self.media_storage_sop_class_uid,
        )?;
        write_str(
            &mut body,
            Tag(0x0002, 0x0003),
            VR::UI,
            &self.media_storage_sop_instance_uid,
        )?;
        write_str(&mut body, Tag(0x0002, 0x0010), VR::UI, &self.transfer_syntax)?;
        write_str(
            &mut body,
            Tag(0x0002, 0x0012),
            VR::UI,
            &self.implementation_class_uid,
        )?;
        if let Some(v) = &self.implementation_version_name {
            write_str(&mut body, Tag(0x0002, 0x0013), VR::SH, v)?;
        }
        if let Some(v) = &self.source_application_entity_title {
            write_str(&mut body, Tag(0x0002, 0x0016), VR::AE, v)?;
        }
        if let Some(v) = &self.private_information_creator_uid {
            write_str(&mut body, Tag(0x0002, 0x0100), VR::UI, v)?;
        }
        if let Some(v) = &self.private_information {
            encoder
                .encode_element_header(
                    &mut body,
                    DataElementHeader::new(Tag(0x0002, 0x0102), VR::OB, Length(v.len() as u32)),
                )
                .context(EncodeElementHeaderSnafu)?;
            body.extend_from_slice(v);
        }

        to.write_all(&DICM_MAGIC_CODE).context(WriteDataSnafu)?;
        encoder
            .encode_element_header(
                &mut to,
                DataElementHeader::new(Tag(0x0002, 0x0000), VR::UL, Length(4)),
            )
            .context(EncodeElementHeaderSnafu)?;
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, body.len() as u32);
        to.write_all(&buf).context(WriteDataSnafu)?;
        to.write_all(&body).context(WriteDataSnafu)?;
        Ok(())
    }
}

/// A builder for DICOM meta information tables.
#[derive(Debug, Default, Clone)]
pub struct FileMetaTableBuilder {
    information_group_length: Option<u32>,
    information_version: Option<[u8; 2]>,
    media_storage_sop_class_uid: Option<String>,
    media_storage_sop_instance_uid: Option<String>,
    transfer_syntax: Option<String>,
    implementation_class_uid: Option<String>,

    implementation_version_name: Option<String>,
    source_application_entity_title: Option<String>,
    private_information_creator_uid: Option<String>,
    private_information: Option<Vec<u8>>,
}

impl FileMetaTableBuilder {
    /// Create a new, empty builder.
    pub fn new() -> FileMetaTableBuilder {
        FileMetaTableBuilder::default()
    }

    /// Define the meta information group length.
    pub fn group_length(mut self, value: u32) -> FileMetaTableBuilder {
        self.information_group_length = Some(value);
        self
    }

    /// Define the meta information version.
    pub fn information_version(mut self, value: [u8; 2]) -> FileMetaTableBuilder {
        self.information_version = Some(value);
        self
    }

    /// Define the media storage SOP class UID.
    pub fn media_storage_sop_class_uid(mut self, value: String) -> FileMetaTableBuilder {
        self.media_storage_sop_class_uid = Some(value);
        self
    }

    /// Define the media storage SOP instance UID.
    pub fn media_storage_sop_instance_uid(mut self, value: String) -> FileMetaTableBuilder {
        self.media_storage_sop_instance_uid = Some(value);
        self
    }

    /// Define the transfer syntax.
    pub fn transfer_syntax(mut self, value: String) -> FileMetaTableBuilder {
        self.transfer_syntax = Some(value);
        self
    }

    /// Define the implementation class UID.
    pub fn implementation_class_uid(mut self, value: String) -> FileMetaTableBuilder {
        self.implementation_class_uid = Some(value);
        self
    }

    /// Define the implementation version name.
    pub fn implementation_version_name(mut self, value: String) -> FileMetaTableBuilder {
        self.implementation_version_name = Some(value);
        self
    }

    /// Define the source application entity title.
    pub fn source_application_entity_title(mut self, value: String) -> FileMetaTableBuilder {
        self.source_application_entity_title = Some(value);
        self
    }

    /// Define the private information creator UID.
    pub fn private_information_creator_uid(mut self, value: String) -> FileMetaTableBuilder {
        self.private_information_creator_uid = Some(value);
        self
    }

    /// Define the private information as a vector of bytes.
    pub fn private_information(mut self, value: Vec<u8>) -> FileMetaTableBuilder {
        self.private_information = Some(value);
        self
    }

    /// Build the table.
    /// Missing required elements are reported as errors,
    /// except for the implementation identifiers,
    /// which default to the ones of this library.
    pub fn build(self) -> Result<FileMetaTable> {
        let media_storage_sop_class_uid =
            self.media_storage_sop_class_uid.unwrap_or_default();
        let media_storage_sop_instance_uid =
            self.media_storage_sop_instance_uid.unwrap_or_default();
        let transfer_syntax = self.transfer_syntax.context(MissingElementSnafu {
            name: "TransferSyntaxUID",
        })?;
        Ok(FileMetaTable {
            information_group_length: self.information_group_length.unwrap_or(0),
            information_version: self.information_version.unwrap_or([0, 1]),
            media_storage_sop_class_uid,
            media_storage_sop_instance_uid,
            transfer_syntax,
            implementation_class_uid: self
                .implementation_class_uid
                .unwrap_or_else(|| IMPLEMENTATION_CLASS_UID.to_owned()),
            implementation_version_name: self.implementation_version_name,
            source_application_entity_title: self.source_application_entity_title,
            private_information_creator_uid: self.private_information_creator_uid,
            private_information: self.private_information,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FileMetaTable;

    /// A file meta group for a CT image in Explicit VR Little Endian,
    /// assembled element by element (group length: 164 bytes).
    fn sample_meta_group() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"DICM");
        // (0002,0000) UL 4, group length
        data.extend_from_slice(&[
            0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 0xA4, 0x00, 0x00, 0x00,
        ]);
        // (0002,0001) OB 2, information version
        data.extend_from_slice(&[
            0x02, 0x00, 0x01, 0x00, b'O', b'B', 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01,
        ]);
        // (0002,0002) UI 26, CT Image Storage
        data.extend_from_slice(&[0x02, 0x00, 0x02, 0x00, b'U', b'I', 0x1A, 0x00]);
        data.extend_from_slice(b"1.2.840.10008.5.1.4.1.1.2\0");
        // (0002,0003) UI 24
        data.extend_from_slice(&[0x02, 0x00, 0x03, 0x00, b'U', b'I', 0x18, 0x00]);
        data.extend_from_slice(b"1.2.946.3.201.1108.4.77\0");
        // (0002,0010) UI 20, Explicit VR Little Endian
        data.extend_from_slice(&[0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x14, 0x00]);
        data.extend_from_slice(b"1.2.840.10008.1.2.1\0");
        // (0002,0012) UI 28
        data.extend_from_slice(&[0x02, 0x00, 0x12, 0x00, b'U', b'I', 0x1C, 0x00]);
        data.extend_from_slice(b"1.2.826.0.1.3680043.10.917.1");
        // (0002,0013) SH 12
        data.extend_from_slice(&[0x02, 0x00, 0x13, 0x00, b'S', b'H', 0x0C, 0x00]);
        data.extend_from_slice(b"DCMFLOW_010 ");
        data
    }

    #[test]
    fn read_meta_table_from_reader() {
        let data = sample_meta_group();
        let table = FileMetaTable::from_reader(data.as_slice()).unwrap();

        assert_eq!(table.information_group_length, 164);
        assert_eq!(table.information_version, [0u8, 1u8]);
        // padding is removed on read
        assert_eq!(
            table.media_storage_sop_class_uid,
            "1.2.840.10008.5.1.4.1.1.2"
        );
        assert_eq!(
            table.media_storage_sop_instance_uid,
            "1.2.946.3.201.1108.4.77"
        );
        assert_eq!(table.transfer_syntax, "1.2.840.10008.1.2.1");
        assert_eq!(
            table.implementation_class_uid,
            "1.2.826.0.1.3680043.10.917.1"
        );
        assert_eq!(
            table.implementation_version_name,
            Some(String::from("DCMFLOW_010"))
        );
        assert_eq!(table.source_application_entity_title, None);
        assert_eq!(table.private_information_creator_uid, None);
        assert_eq!(table.private_information, None);
    }

    #[test]
    fn unrecognized_group2_elements_are_skipped() {
        // a retired group 2 element the table does not model:
        // (0002,0102) would be kept, (0002,0015) is not
        let mut data = Vec::new();
        data.extend_from_slice(b"DICM");
        // group length: 28 (the TS element) + 12 (the odd one out)
        data.extend_from_slice(&[
            0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 0x28, 0x00, 0x00, 0x00,
        ]);
        data.extend_from_slice(&[0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x14, 0x00]);
        data.extend_from_slice(b"1.2.840.10008.1.2.1\0");
        data.extend_from_slice(&[0x02, 0x00, 0x15, 0x00, b'A', b'E', 0x04, 0x00]);
        data.extend_from_slice(b"HOST");

        let table = FileMetaTable::from_reader(data.as_slice()).unwrap();
        assert_eq!(table.transfer_syntax, "1.2.840.10008.1.2.1");
    }

    #[test]
    fn write_then_read_back() {
        let data = sample_meta_group();
        let table = FileMetaTable::from_reader(data.as_slice()).unwrap();

        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();

        let table2 = FileMetaTable::from_reader(out.as_slice()).unwrap();
        assert_eq!(table2.transfer_syntax, table.transfer_syntax);
        assert_eq!(
            table2.media_storage_sop_class_uid,
            table.media_storage_sop_class_uid
        );
        assert_eq!(
            table2.media_storage_sop_instance_uid,
            table.media_storage_sop_instance_uid
        );
        assert_eq!(
            table2.implementation_version_name,
            table.implementation_version_name
        );
    }

    #[test]
    fn missing_magic_code_is_an_error() {
        let source: &[u8] = &[0x00, 0x01, 0x02, 0x03];
        assert!(FileMetaTable::from_reader(source).is_err());
    }
}
