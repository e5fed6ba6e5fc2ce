//! The DICOM file object:
//! a parsed file with structured access to its data elements,
//! classification flags, and a resumable cursor
//! for saving the object in a chosen transfer syntax.

use crate::mem::{InMemDicomObject, InMemElement};
use crate::meta::{FileMetaTable, FileMetaTableBuilder, IMPLEMENTATION_VERSION_NAME};
use crate::read::{self, DataSetReader, FileFormat};
use crate::write::{
    self, copy_value, BadEncapsulationSnafu, CreateOutputSnafu, DataSetWriter, DecodeSourceSnafu,
    InputNotOpenSnafu, RestorePositionSnafu, UndefinedValueLengthSnafu,
    UnsupportedTransferSyntaxSnafu, WriteMetaSnafu, WriteValueSnafu,
};
use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use dcmflow_core::dictionary::{parse_tag, DataDictionary};
use dcmflow_core::header::{DataElementHeader, SequenceItemHeader, Tag, VR};
use dcmflow_core::value::PrimitiveValue;
use dcmflow_core::C;
use dcmflow_dictionary::{tags, uids, StandardDataDictionary};
use dcmflow_encoding::decode::{self, Decode};
use dcmflow_encoding::text::TextCodec;
use dcmflow_encoding::transfer_syntax::{self, TransferSyntax};
use dcmflow_filter::ValueSource;
use smallvec::SmallVec;
use snafu::{OptionExt, ResultExt, Snafu};
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// An error raised when a tag expression
/// does not resolve to a known attribute.
#[derive(Debug, Snafu)]
#[snafu(display("Unknown attribute `{}`", expr))]
pub struct UnknownAttributeError {
    expr: String,
}

/// Open the DICOM file at the given path.
///
/// The input stream is kept open so that the object can later be saved;
/// call [`DicomFile::close`] to release it early.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<DicomFile, read::Error> {
    DicomFile::open(path)
}

/// A DICOM file object.
///
/// The data set is populated up to, but not including, the pixel data
/// value. The remainder of the stream (the pixel data and any elements
/// after it) is only visited on [`save_as`](DicomFile::save_as),
/// streamed from the source.
///
/// This type is not thread safe and assumes a single owner.
#[derive(Debug)]
pub struct DicomFile {
    path: PathBuf,
    format: FileFormat,
    meta: Option<FileMetaTable>,
    dataset: InMemDicomObject,
    ts: &'static TransferSyntax,
    reader: Option<BufReader<File>>,
    /// stream position where the parser stopped
    /// (start of the pixel data value for images)
    position: u64,
    /// the header of the pixel data element at the cursor, if any
    pixel_header: Option<DataElementHeader>,
    is_dicomdir: bool,
    is_sr: bool,
    is_kin: bool,
    is_manifest: bool,
    is_additional_tf_info: bool,
}

impl DicomFile {
    /// Open and parse the DICOM file at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<DicomFile, read::Error> {
        let path = path.as_ref();
        let file = File::open(path).context(read::AccessSourceSnafu)?;
        let mut reader = BufReader::new(file);

        let format = read::detect_format(&mut reader)?;
        let (meta, ts) = match format {
            FileFormat::Part10 => {
                let table =
                    FileMetaTable::from_reader(&mut reader).context(read::ReadMetaSnafu)?;
                let ts = transfer_syntax::lookup(&table.transfer_syntax).context(
                    read::UnsupportedTransferSyntaxSnafu {
                        uid: table.transfer_syntax.clone(),
                    },
                )?;
                (Some(table), ts)
            }
            FileFormat::RawImplicitVRLittleEndian => {
                (None, &transfer_syntax::IMPLICIT_VR_LITTLE_ENDIAN)
            }
            FileFormat::RawExplicitVRLittleEndian => {
                (None, &transfer_syntax::EXPLICIT_VR_LITTLE_ENDIAN)
            }
            FileFormat::RawExplicitVRBigEndian => {
                (None, &transfer_syntax::EXPLICIT_VR_BIG_ENDIAN)
            }
        };

        let base_offset = reader
            .stream_position()
            .context(read::AccessSourceSnafu)?;
        let mut ds_reader = DataSetReader::new(reader, ts, base_offset);
        let (dataset, pixel_header) = read::read_data_set(&mut ds_reader)?;
        let position = ds_reader.position();
        let reader = ds_reader.into_inner();

        let is_dicomdir = meta
            .as_ref()
            .map(|m| uids::is_dicomdir_sop_class(&m.media_storage_sop_class_uid))
            .unwrap_or(false);
        let sop_class_uid = if is_dicomdir {
            meta.as_ref().map(|m| m.media_storage_sop_class_uid.clone())
        } else {
            dataset_str(&dataset, tags::SOP_CLASS_UID)
        };
        let is_sr = sop_class_uid
            .as_deref()
            .map(uids::is_sr_sop_class)
            .unwrap_or(false);
        let is_kin = sop_class_uid
            .as_deref()
            .map(uids::is_kin_sop_class)
            .unwrap_or(false);
        let concept_code = dataset
            .element_at_path(&[tags::CONCEPT_NAME_CODE_SEQUENCE, tags::CODE_VALUE])
            .and_then(|e| e.value().primitive())
            .and_then(|v| v.to_str().map(|s| s.trim().to_owned()));
        let is_manifest = is_kin
            && matches!(
                concept_code.as_deref(),
                Some("TCE001") | Some("TCE002") | Some("TCE007")
            );
        let is_additional_tf_info = is_sr && concept_code.as_deref() == Some("TCE006");

        Ok(DicomFile {
            path: path.to_owned(),
            format,
            meta,
            dataset,
            ts,
            reader: Some(reader),
            position,
            pixel_header,
            is_dicomdir,
            is_sr,
            is_kin,
            is_manifest,
            is_additional_tf_info,
        })
    }

    /// Close the input stream.
    /// Closing an already closed object is a no-op.
    pub fn close(&mut self) {
        self.reader = None;
    }

    /// The path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The encoding layout detected for the source.
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// The file meta table, when the source carried one.
    pub fn meta(&self) -> Option<&FileMetaTable> {
        self.meta.as_ref()
    }

    /// The main data set,
    /// populated up to but not including the pixel data.
    pub fn dataset(&self) -> &InMemDicomObject {
        &self.dataset
    }

    /// The transfer syntax governing the data set encoding.
    pub fn transfer_syntax(&self) -> &'static TransferSyntax {
        self.ts
    }

    /// The header of the pixel data element the parser stopped at,
    /// if the object contains one.
    pub fn pixel_data_header(&self) -> Option<DataElementHeader> {
        self.pixel_header
    }

    /// The stream position of the read cursor:
    /// for images, the offset of the first byte of the pixel data value.
    pub fn cursor_position(&self) -> u64 {
        self.position
    }

    // --- classification flags, computed once during parsing ---

    /// Whether the parser stopped at a pixel data element.
    pub fn is_image(&self) -> bool {
        self.pixel_header.is_some()
    }

    /// Whether the object contains encapsulated pixel data.
    pub fn is_encapsulated(&self) -> bool {
        self.is_image() && self.ts.is_encapsulated()
    }

    /// Whether this object is a DICOMDIR.
    pub fn is_dicomdir(&self) -> bool {
        self.is_dicomdir
    }

    /// Whether this object is a structured report document.
    pub fn is_sr(&self) -> bool {
        self.is_sr
    }

    /// Whether this object is a key object selection (KIN) document.
    pub fn is_kin(&self) -> bool {
        self.is_kin
    }

    /// Whether this object is a teaching file export manifest
    /// (a KIN document with concept code TCE001, TCE002 or TCE007).
    pub fn is_manifest(&self) -> bool {
        self.is_manifest
    }

    /// Whether this object is an additional teaching file info document
    /// (an SR with concept code TCE006).
    pub fn is_additional_tf_info(&self) -> bool {
        self.is_additional_tf_info
    }

    // --- tag addressing and element accessors ---

    /// Parse a tag path specification into a list of tag addresses.
    ///
    /// Components are separated by `::` for sequence descent;
    /// each component may be an attribute keyword or a numeric form
    /// (`00100020`, `0010,0020`, bracketed or parenthesized).
    /// Unknown components resolve to the zero address,
    /// which no element lookup will match.
    pub fn tag_path(spec: &str) -> C<Tag> {
        let spec = spec.trim();
        if spec.is_empty() {
            return SmallVec::new();
        }
        spec.split("::")
            .map(|part| parse_tag(&StandardDataDictionary, part).unwrap_or(Tag(0x0000, 0x0000)))
            .collect()
    }

    /// Get the value of an element as a string,
    /// or the empty string if the element does not exist.
    /// Multiple values are joined by a backslash.
    pub fn element_value(&self, spec: &str) -> String {
        self.element_value_or(spec, "")
    }

    /// Get the value of an element as a string,
    /// or the given default if the element does not exist.
    pub fn element_value_or(&self, spec: &str, default: &str) -> String {
        let path = Self::tag_path(spec);
        self.element_value_by_path(&path, default)
    }

    /// Get the value of the element at the given tag path.
    /// Every non-terminal tag must refer to a sequence element,
    /// of which only the first item is descended.
    pub fn element_value_by_path(&self, path: &[Tag], default: &str) -> String {
        let (&last, init) = match path.split_last() {
            Some(v) => v,
            None => return default.to_owned(),
        };
        match self.walk_first_items(init) {
            Some(ds) => self.dataset_element_value(ds, last, default),
            None => default.to_owned(),
        }
    }

    /// Descend the first item of each sequence named by the given tags,
    /// starting at the main data set.
    fn walk_first_items(&self, init: &[Tag]) -> Option<&InMemDicomObject> {
        let mut ds = &self.dataset;
        for &tag in init {
            let elem = ds.element(tag)?;
            if elem.vr() != VR::SQ {
                return None;
            }
            ds = elem.value().items()?.first()?;
        }
        Some(ds)
    }

    /// Fetch an element's value from a data set as a string,
    /// resolving file meta references and the "CTP" private block rule.
    fn dataset_element_value(&self, ds: &InMemDicomObject, tag: Tag, default: &str) -> String {
        // file meta references are answered from the meta table alone
        if let Some(meta) = &self.meta {
            if (tag.as_u32() & 0x7FFF_FFFF) < 0x0008_0000 {
                return meta
                    .element_value(tag)
                    .unwrap_or_else(|| default.to_owned());
            }
        }

        // elements of a private block owned by "CTP" hold text stored
        // without VR interpretation: the raw bytes are reinterpreted
        // as a string, so multi-byte character sets are not honored here
        if let Some(owner_tag) = tag.private_creator() {
            let owner = ds
                .element(owner_tag)
                .and_then(|e| e.value().primitive())
                .and_then(|v| v.to_str().map(|s| s.trim().to_owned()));
            if owner.as_deref() == Some("CTP") {
                return match ds.element(tag).map(InMemElement::value) {
                    Some(value) => match value.primitive() {
                        Some(PrimitiveValue::Bytes(b)) => String::from_utf8_lossy(b).into_owned(),
                        Some(v) => v
                            .to_str()
                            .map(|s| s.into_owned())
                            .unwrap_or_else(|| default.to_owned()),
                        None => default.to_owned(),
                    },
                    None => default.to_owned(),
                };
            }
        }

        ds.element(tag)
            .and_then(|e| e.value().primitive())
            .and_then(|v| v.to_str())
            .map(|s| s.into_owned())
            .unwrap_or_else(|| default.to_owned())
    }

    /// Get the individual string values of an element joined by `|`,
    /// or the empty string if the element does not exist.
    pub fn element_string(&self, spec: &str) -> String {
        let path = Self::tag_path(spec);
        let (&last, init) = match path.split_last() {
            Some(v) => v,
            None => return String::new(),
        };
        let ds = match self.walk_first_items(init) {
            Some(ds) => ds,
            None => return String::new(),
        };
        if let Some(meta) = &self.meta {
            if (last.as_u32() & 0x7FFF_FFFF) < 0x0008_0000 {
                return meta.element_value(last).unwrap_or_default();
            }
        }
        ds.element(last)
            .and_then(|e| e.value().primitive())
            .map(|v| match v {
                PrimitiveValue::Strs(s) => s.join("|"),
                PrimitiveValue::Bytes(_) | PrimitiveValue::Empty => String::new(),
            })
            .unwrap_or_default()
    }

    /// Get the raw value bytes of an element,
    /// or `None` if the element does not exist.
    /// String values are re-encoded through the data set's character set.
    pub fn element_bytes(&self, spec: &str) -> Option<Vec<u8>> {
        let path = Self::tag_path(spec);
        let (&last, init) = path.split_last()?;
        let ds = self.walk_first_items(init)?;
        if let Some(meta) = &self.meta {
            if (last.as_u32() & 0x7FFF_FFFF) < 0x0008_0000 {
                return meta.element_value(last).map(String::into_bytes);
            }
        }
        let elem = ds.element(last)?;
        match elem.value().primitive()? {
            PrimitiveValue::Empty => Some(Vec::new()),
            PrimitiveValue::Bytes(b) => Some(b.clone()),
            PrimitiveValue::Strs(_) => {
                let joined = elem.value().primitive()?.to_str()?;
                ds.charset().codec().encode(&joined).ok()
            }
        }
    }

    /// Get the value of an element as an integer,
    /// or the given default when absent or not decodable.
    pub fn element_int(&self, spec: &str, default: i64) -> i64 {
        self.numeric_element_value(spec)
            .map(|v| v as i64)
            .unwrap_or(default)
    }

    /// Get the value of an element as a floating point number,
    /// or the given default when absent or not decodable.
    pub fn element_float(&self, spec: &str, default: f32) -> f32 {
        self.numeric_element_value(spec)
            .map(|v| v as f32)
            .unwrap_or(default)
    }

    /// Decode the first value of the element as a number,
    /// according to its value representation:
    /// text numbers are parsed, binary numbers are decoded
    /// in the data set's byte order.
    fn numeric_element_value(&self, spec: &str) -> Option<f64> {
        let path = Self::tag_path(spec);
        let elem = self.dataset.element_at_path(&path)?;
        let value = elem.value().primitive()?;
        match value {
            PrimitiveValue::Empty => None,
            PrimitiveValue::Strs(_) => value.to_float(),
            PrimitiveValue::Bytes(b) => decode_numeric(b, elem.vr(), self.ts.endianness()),
        }
    }

    /// Set the string value of an element.
    ///
    /// Private tags are forced to the UT value representation;
    /// other tags take the dictionary VR, with UT as the fallback.
    /// An empty person name is stored as a single space.
    pub fn set_element_value(&mut self, spec: &str, value: &str) -> Result<(), UnknownAttributeError> {
        let tag = parse_tag(&StandardDataDictionary, spec).context(UnknownAttributeSnafu {
            expr: spec.to_owned(),
        })?;
        if tag.is_private() {
            self.dataset.put_str(tag, VR::UT, value);
            return Ok(());
        }
        let vr = StandardDataDictionary
            .by_tag(tag)
            .map(|e| e.vr)
            .unwrap_or(VR::UT);
        if value.is_empty() {
            if vr == VR::PN {
                self.dataset.put_str(tag, vr, " ");
            } else {
                self.dataset
                    .put(dcmflow_core::DataElement::empty(tag, vr));
            }
        } else {
            self.dataset.put_str(tag, vr, value);
        }
        Ok(())
    }

    // --- convenience getters ---

    /// The value of PatientName.
    /// For a DICOMDIR, the directory record sequence is searched
    /// for the first record carrying the attribute.
    pub fn patient_name(&self) -> String {
        self.record_or_value(tags::PATIENT_NAME)
    }

    /// The value of PatientID (directory-record routed for a DICOMDIR).
    pub fn patient_id(&self) -> String {
        self.record_or_value(tags::PATIENT_ID)
    }

    /// The value of AccessionNumber (directory-record routed for a DICOMDIR).
    pub fn accession_number(&self) -> String {
        self.record_or_value(tags::ACCESSION_NUMBER)
    }

    /// The value of Modality (directory-record routed for a DICOMDIR).
    pub fn modality(&self) -> String {
        self.record_or_value(tags::MODALITY)
    }

    /// The value of StudyDate (directory-record routed for a DICOMDIR).
    pub fn study_date(&self) -> Option<String> {
        self.record_or_value_opt(tags::STUDY_DATE)
    }

    /// The value of StudyTime (directory-record routed for a DICOMDIR).
    pub fn study_time(&self) -> Option<String> {
        self.record_or_value_opt(tags::STUDY_TIME)
    }

    /// The value of StudyInstanceUID (directory-record routed for a DICOMDIR).
    pub fn study_instance_uid(&self) -> Option<String> {
        self.record_or_value_opt(tags::STUDY_INSTANCE_UID)
    }

    /// The value of SeriesInstanceUID.
    pub fn series_instance_uid(&self) -> String {
        self.element_value_by_path(&[tags::SERIES_INSTANCE_UID], "")
    }

    /// The value of SeriesDescription.
    pub fn series_description(&self) -> String {
        self.element_value_by_path(&[tags::SERIES_DESCRIPTION], "")
    }

    /// The value of StudyDescription.
    pub fn study_description(&self) -> String {
        self.element_value_by_path(&[tags::STUDY_DESCRIPTION], "")
    }

    /// The value of BodyPartExamined.
    pub fn body_part_examined(&self) -> String {
        self.element_value_by_path(&[tags::BODY_PART_EXAMINED], "")
    }

    /// The value of SeriesNumber.
    pub fn series_number(&self) -> String {
        self.element_value_by_path(&[tags::SERIES_NUMBER], "")
    }

    /// The value of AcquisitionNumber.
    pub fn acquisition_number(&self) -> String {
        self.element_value_by_path(&[tags::ACQUISITION_NUMBER], "")
    }

    /// The value of InstanceNumber.
    pub fn instance_number(&self) -> String {
        self.element_value_by_path(&[tags::INSTANCE_NUMBER], "")
    }

    /// The SOP class UID of this object.
    /// For a DICOMDIR, the media storage SOP class UID is used.
    pub fn sop_class_uid(&self) -> Option<String> {
        if self.is_dicomdir {
            self.media_storage_sop_class_uid()
        } else {
            dataset_str(&self.dataset, tags::SOP_CLASS_UID)
        }
    }

    /// The SOP instance UID of this object.
    /// For a DICOMDIR, the media storage SOP instance UID is used.
    pub fn sop_instance_uid(&self) -> Option<String> {
        if self.is_dicomdir {
            self.meta
                .as_ref()
                .map(|m| m.media_storage_sop_instance_uid.clone())
        } else {
            dataset_str(&self.dataset, tags::SOP_INSTANCE_UID)
        }
    }

    /// The MediaStorageSOPClassUID from the file meta, when present.
    pub fn media_storage_sop_class_uid(&self) -> Option<String> {
        self.meta
            .as_ref()
            .map(|m| m.media_storage_sop_class_uid.clone())
    }

    /// The transfer syntax UID from the file meta,
    /// or `None` when the source is not a Part 10 file.
    pub fn transfer_syntax_uid(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.transfer_syntax_uid())
    }

    /// The display name of the object's transfer syntax.
    pub fn transfer_syntax_name(&self) -> String {
        match self.transfer_syntax_uid() {
            Some(uid) => uids::name_of(uid)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Unknown transfer syntax: {}", uid)),
            None => format!("Unknown transfer syntax: {}", self.ts.uid()),
        }
    }

    /// The display name of the object's SOP class.
    pub fn sop_class_name(&self) -> String {
        match self.sop_class_uid() {
            Some(uid) => uids::name_of(&uid)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Unknown SOP Class: {}", uid)),
            None => "Unknown SOP Class".to_owned(),
        }
    }

    /// The integer value of Columns, or -1 when absent.
    pub fn columns(&self) -> i32 {
        self.element_int("Columns", -1) as i32
    }

    /// The integer value of Rows, or -1 when absent.
    pub fn rows(&self) -> i32 {
        self.element_int("Rows", -1) as i32
    }

    /// The integer value of BitsStored, or 12 when absent.
    pub fn bits_stored(&self) -> u16 {
        self.element_int("BitsStored", 12) as u16
    }

    /// The integer value of NumberOfFrames, or 0 when absent.
    pub fn number_of_frames(&self) -> u32 {
        self.element_int("NumberOfFrames", 0) as u32
    }

    /// The integer value of SamplesPerPixel, or 1 when absent.
    pub fn samples_per_pixel(&self) -> u16 {
        self.element_int("SamplesPerPixel", 1) as u16
    }

    /// The integer value of PlanarConfiguration, or 1 when absent.
    pub fn planar_configuration(&self) -> u16 {
        self.element_int("PlanarConfiguration", 1) as u16
    }

    /// The value of PhotometricInterpretation, or the empty string.
    pub fn photometric_interpretation(&self) -> String {
        self.element_value_by_path(&[tags::PHOTOMETRIC_INTERPRETATION], "")
    }

    fn record_or_value(&self, tag: Tag) -> String {
        self.record_or_value_opt(tag).unwrap_or_default()
    }

    fn record_or_value_opt(&self, tag: Tag) -> Option<String> {
        if self.is_dicomdir {
            self.dataset
                .find_in_sequence(tags::DIRECTORY_RECORD_SEQUENCE, tag)
                .and_then(|e| e.value().primitive())
                .and_then(|v| v.to_str())
                .map(|s| s.into_owned())
        } else {
            self.dataset
                .element(tag)
                .and_then(|e| e.value().primitive())
                .and_then(|v| v.to_str())
                .map(|s| s.into_owned())
        }
    }

    // --- filtering ---

    /// Evaluate a filter script against this object.
    /// Script errors are reported and evaluate to `false`.
    pub fn matches(&self, script: &str) -> bool {
        dcmflow_filter::matches_or_false(script, self)
    }

    // --- saving ---

    /// Save the object to a file,
    /// resetting the input stream position afterwards so that
    /// the same object can be saved repeatedly.
    ///
    /// The target transfer syntax is the one of the source,
    /// unless `force_implicit_le` is set and the pixel data is not
    /// encapsulated, in which case Implicit VR Little Endian is used.
    ///
    /// On failure, the partial output is deleted
    /// and the input stream is closed;
    /// subsequent calls to this method will fail.
    pub fn save_as<P: AsRef<Path>>(
        &mut self,
        path: P,
        force_implicit_le: bool,
    ) -> Result<(), write::Error> {
        let path = path.as_ref();
        let result = self.save_impl(path, force_implicit_le);
        if result.is_err() {
            let _ = std::fs::remove_file(path);
            self.close();
        }
        result
    }

    fn save_impl(&mut self, path: &Path, force_implicit_le: bool) -> Result<(), write::Error> {
        let reader = self.reader.as_mut().context(InputNotOpenSnafu)?;
        let entry_position = self.position;

        // choose the target encoding
        let target_uid: String = match &self.meta {
            Some(m) if self.ts.is_encapsulated() || !force_implicit_le => {
                m.transfer_syntax.clone()
            }
            _ => uids::IMPLICIT_VR_LITTLE_ENDIAN.to_owned(),
        };
        let target_ts =
            transfer_syntax::lookup(&target_uid).context(UnsupportedTransferSyntaxSnafu {
                uid: target_uid.clone(),
            })?;
        let swap = self.ts.endianness() != target_ts.endianness();

        // rebuild the file meta group for the chosen encoding
        let sop_class_uid = dataset_str(&self.dataset, tags::SOP_CLASS_UID)
            .or_else(|| {
                self.meta
                    .as_ref()
                    .map(|m| m.media_storage_sop_class_uid.clone())
            })
            .unwrap_or_default();
        let sop_instance_uid = dataset_str(&self.dataset, tags::SOP_INSTANCE_UID)
            .or_else(|| {
                self.meta
                    .as_ref()
                    .map(|m| m.media_storage_sop_instance_uid.clone())
            })
            .unwrap_or_default();
        let meta = FileMetaTableBuilder::new()
            .information_version([0, 1])
            .media_storage_sop_class_uid(sop_class_uid)
            .media_storage_sop_instance_uid(sop_instance_uid)
            .transfer_syntax(target_uid)
            .implementation_version_name(IMPLEMENTATION_VERSION_NAME.to_owned())
            .build()
            .context(WriteMetaSnafu)?;

        let out_file = File::create(path).context(CreateOutputSnafu)?;
        let mut out = BufWriter::new(out_file);
        out.write_all(&[0u8; 128]).context(WriteValueSnafu)?;
        meta.write_to(&mut out).context(WriteMetaSnafu)?;

        let writer = DataSetWriter::new(target_ts);
        writer.write_data_set(&mut out, &self.dataset, self.ts.endianness())?;

        if let Some(pixel_header) = self.pixel_header {
            // make sure the source is at the pixel data value
            reader
                .seek(SeekFrom::Start(entry_position))
                .context(RestorePositionSnafu)?;
            let source_decoder = self.ts.decoder();

            writer.write_header(&mut out, pixel_header)?;
            if target_ts.is_encapsulated() {
                // stream the pixel data item fragments through,
                // up to and including the sequence delimitation item
                loop {
                    let item = match source_decoder.decode_item_header(reader) {
                        Ok(item) => item,
                        // a tag other than an item or delimiter,
                        // or a delimiter with a non-zero length
                        Err(decode::Error::BadSequenceHeader { .. }) => {
                            return BadEncapsulationSnafu {
                                tag: Tag(0xFFFE, 0xE000),
                            }
                            .fail();
                        }
                        Err(e) => return Err(e).context(DecodeSourceSnafu),
                    };
                    match item {
                        SequenceItemHeader::Item { len } => {
                            let len = len.get().context(BadEncapsulationSnafu {
                                tag: Tag(0xFFFE, 0xE000),
                            })?;
                            writer.write_item_header(&mut out, len)?;
                            copy_value(reader, &mut out, len, false)?;
                        }
                        SequenceItemHeader::SequenceDelimiter => {
                            writer.write_sequence_delimiter(&mut out)?;
                            break;
                        }
                        SequenceItemHeader::ItemDelimiter => {
                            return BadEncapsulationSnafu {
                                tag: Tag(0xFFFE, 0xE00D),
                            }
                            .fail();
                        }
                    }
                }
            } else {
                let len = pixel_header.len.get().context(UndefinedValueLengthSnafu {
                    tag: pixel_header.tag,
                })?;
                copy_value(reader, &mut out, len, swap && pixel_header.vr == VR::OW)?;
            }

            // stream any elements following the pixel data, one at a
            // time, up to the end of the source or the trailing padding
            loop {
                let header = match source_decoder.decode_header(reader) {
                    Ok((header, _)) => header,
                    Err(decode::Error::ReadHeaderTag { ref source, .. })
                        if source.kind() == std::io::ErrorKind::UnexpectedEof =>
                    {
                        break;
                    }
                    Err(e) => return Err(e).context(DecodeSourceSnafu),
                };
                if header.tag == tags::DATA_SET_TRAILING_PADDING {
                    break;
                }
                let len = header.len.get().context(UndefinedValueLengthSnafu {
                    tag: header.tag,
                })?;
                writer.write_header(&mut out, header)?;
                copy_value(reader, &mut out, len, swap && header.vr == VR::OW)?;
            }
        }

        out.flush().context(WriteValueSnafu)?;
        drop(out);

        // reset the cursor so the object can be saved again
        self.reader
            .as_mut()
            .context(InputNotOpenSnafu)?
            .seek(SeekFrom::Start(entry_position))
            .context(RestorePositionSnafu)?;
        Ok(())
    }
}

impl ValueSource for DicomFile {
    fn value_of(&self, identifier: &str) -> String {
        self.element_value(identifier)
    }
}

/// The attribute keyword of the given tag,
/// when the standard dictionary knows it.
pub fn element_name(tag: Tag) -> Option<&'static str> {
    StandardDataDictionary.by_tag(tag).map(|e| e.alias)
}

/// Fetch a dataset element's first string value, trimmed.
fn dataset_str(ds: &InMemDicomObject, tag: Tag) -> Option<String> {
    ds.element(tag)
        .and_then(|e| e.value().primitive())
        .and_then(|v| v.to_str().map(|s| s.trim().to_owned()))
        .filter(|s| !s.is_empty())
}

/// Decode the first binary number in the buffer according to the VR
/// and byte order.
fn decode_numeric(data: &[u8], vr: VR, endianness: Endianness) -> Option<f64> {
    fn read<B: ByteOrder>(data: &[u8], vr: VR) -> Option<f64> {
        match vr {
            VR::US => (data.len() >= 2).then(|| f64::from(B::read_u16(data))),
            VR::SS => (data.len() >= 2).then(|| f64::from(B::read_i16(data))),
            VR::UL => (data.len() >= 4).then(|| f64::from(B::read_u32(data))),
            VR::SL => (data.len() >= 4).then(|| f64::from(B::read_i32(data))),
            VR::FL => (data.len() >= 4).then(|| f64::from(B::read_f32(data))),
            VR::FD => (data.len() >= 8).then(|| B::read_f64(data)),
            _ => None,
        }
    }
    match endianness {
        Endianness::Little => read::<LittleEndian>(data, vr),
        Endianness::Big => read::<BigEndian>(data, vr),
    }
}
