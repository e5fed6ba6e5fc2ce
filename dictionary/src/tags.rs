//! Tag constants and the attribute entry table.
//!
//! The table covers the attributes relevant to object identification,
//! routing, directory records and image rendition,
//! rather than the complete registry of PS3.6.

use dcmflow_core::dictionary::{DictionaryEntryRef, TagRange::*};
use dcmflow_core::header::Tag;
use dcmflow_core::VR;

/// File Meta Information Group Length (0002,0000)
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// File Meta Information Version (0002,0001)
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// Media Storage SOP Class UID (0002,0002)
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// Media Storage SOP Instance UID (0002,0003)
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// Transfer Syntax UID (0002,0010)
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Implementation Class UID (0002,0012)
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// Implementation Version Name (0002,0013)
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
/// Source Application Entity Title (0002,0016)
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);
/// Private Information Creator UID (0002,0100)
pub const PRIVATE_INFORMATION_CREATOR_UID: Tag = Tag(0x0002, 0x0100);
/// Private Information (0002,0102)
pub const PRIVATE_INFORMATION: Tag = Tag(0x0002, 0x0102);

/// Offset of the First Directory Record (0004,1200)
pub const OFFSET_OF_THE_FIRST_DIRECTORY_RECORD: Tag = Tag(0x0004, 0x1200);
/// Directory Record Sequence (0004,1220)
pub const DIRECTORY_RECORD_SEQUENCE: Tag = Tag(0x0004, 0x1220);
/// Referenced File ID (0004,1500)
pub const REFERENCED_FILE_ID: Tag = Tag(0x0004, 0x1500);
/// Directory Record Type (0004,1430)
pub const DIRECTORY_RECORD_TYPE: Tag = Tag(0x0004, 0x1430);

/// Specific Character Set (0008,0005)
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// Image Type (0008,0008)
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
/// Instance Creation Date (0008,0012)
pub const INSTANCE_CREATION_DATE: Tag = Tag(0x0008, 0x0012);
/// Instance Creation Time (0008,0013)
pub const INSTANCE_CREATION_TIME: Tag = Tag(0x0008, 0x0013);
/// SOP Class UID (0008,0016)
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// SOP Instance UID (0008,0018)
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// Study Date (0008,0020)
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
/// Series Date (0008,0021)
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
/// Acquisition Date (0008,0022)
pub const ACQUISITION_DATE: Tag = Tag(0x0008, 0x0022);
/// Content Date (0008,0023)
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
/// Study Time (0008,0030)
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
/// Series Time (0008,0031)
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
/// Content Time (0008,0033)
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);
/// Accession Number (0008,0050)
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
/// Modality (0008,0060)
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/// Manufacturer (0008,0070)
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
/// Institution Name (0008,0080)
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
/// Referring Physician's Name (0008,0090)
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
/// Code Value (0008,0100)
pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
/// Coding Scheme Designator (0008,0102)
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
/// Code Meaning (0008,0104)
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);
/// Station Name (0008,1010)
pub const STATION_NAME: Tag = Tag(0x0008, 0x1010);
/// Study Description (0008,1030)
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
/// Series Description (0008,103E)
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
/// Manufacturer's Model Name (0008,1090)
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);
/// Referenced SOP Class UID (0008,1150)
pub const REFERENCED_SOP_CLASS_UID: Tag = Tag(0x0008, 0x1150);
/// Referenced SOP Instance UID (0008,1155)
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);

/// Patient's Name (0010,0010)
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// Patient ID (0010,0020)
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// Patient's Birth Date (0010,0030)
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
/// Patient's Sex (0010,0040)
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
/// Patient's Age (0010,1010)
pub const PATIENT_AGE: Tag = Tag(0x0010, 0x1010);

/// Body Part Examined (0018,0015)
pub const BODY_PART_EXAMINED: Tag = Tag(0x0018, 0x0015);
/// Slice Thickness (0018,0050)
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
/// KVP (0018,0060)
pub const KVP: Tag = Tag(0x0018, 0x0060);
/// Device Serial Number (0018,1000)
pub const DEVICE_SERIAL_NUMBER: Tag = Tag(0x0018, 0x1000);
/// Software Versions (0018,1020)
pub const SOFTWARE_VERSIONS: Tag = Tag(0x0018, 0x1020);
/// Protocol Name (0018,1030)
pub const PROTOCOL_NAME: Tag = Tag(0x0018, 0x1030);
/// Patient Position (0018,5100)
pub const PATIENT_POSITION: Tag = Tag(0x0018, 0x5100);

/// Study Instance UID (0020,000D)
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// Series Instance UID (0020,000E)
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/// Study ID (0020,0010)
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
/// Series Number (0020,0011)
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
/// Acquisition Number (0020,0012)
pub const ACQUISITION_NUMBER: Tag = Tag(0x0020, 0x0012);
/// Instance Number (0020,0013)
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
/// Frame of Reference UID (0020,0052)
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);
/// Laterality (0020,0060)
pub const LATERALITY: Tag = Tag(0x0020, 0x0060);

/// Samples per Pixel (0028,0002)
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
/// Photometric Interpretation (0028,0004)
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/// Planar Configuration (0028,0006)
pub const PLANAR_CONFIGURATION: Tag = Tag(0x0028, 0x0006);
/// Number of Frames (0028,0008)
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
/// Rows (0028,0010)
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns (0028,0011)
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// Pixel Spacing (0028,0030)
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
/// Bits Allocated (0028,0100)
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// Bits Stored (0028,0101)
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
/// High Bit (0028,0102)
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/// Pixel Representation (0028,0103)
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
/// Window Center (0028,1050)
pub const WINDOW_CENTER: Tag = Tag(0x0028, 0x1050);
/// Window Width (0028,1051)
pub const WINDOW_WIDTH: Tag = Tag(0x0028, 0x1051);
/// Rescale Intercept (0028,1052)
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
/// Rescale Slope (0028,1053)
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);

/// Relationship Type (0040,A010)
pub const RELATIONSHIP_TYPE: Tag = Tag(0x0040, 0xA010);
/// Value Type (0040,A040)
pub const VALUE_TYPE: Tag = Tag(0x0040, 0xA040);
/// Concept Name Code Sequence (0040,A043)
pub const CONCEPT_NAME_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA043);
/// Text Value (0040,A160)
pub const TEXT_VALUE: Tag = Tag(0x0040, 0xA160);
/// Concept Code Sequence (0040,A168)
pub const CONCEPT_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA168);
/// Current Requested Procedure Evidence Sequence (0040,A375)
pub const CURRENT_REQUESTED_PROCEDURE_EVIDENCE_SEQUENCE: Tag = Tag(0x0040, 0xA375);
/// Content Sequence (0040,A730)
pub const CONTENT_SEQUENCE: Tag = Tag(0x0040, 0xA730);

/// Presentation LUT Shape (2050,0020)
pub const PRESENTATION_LUT_SHAPE: Tag = Tag(0x2050, 0x0020);

/// Overlay Data (60xx,3000)
pub const OVERLAY_DATA: Tag = Tag(0x6000, 0x3000);

/// Pixel Data (7FE0,0010)
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Data Set Trailing Padding (FFFC,FFFC)
pub const DATA_SET_TRAILING_PADDING: Tag = Tag(0xFFFC, 0xFFFC);

pub(crate) static ENTRIES: &[DictionaryEntryRef<'static>] = &[
    DictionaryEntryRef { tag: Single(FILE_META_INFORMATION_GROUP_LENGTH), alias: "FileMetaInformationGroupLength", vr: VR::UL },
    DictionaryEntryRef { tag: Single(FILE_META_INFORMATION_VERSION), alias: "FileMetaInformationVersion", vr: VR::OB },
    DictionaryEntryRef { tag: Single(MEDIA_STORAGE_SOP_CLASS_UID), alias: "MediaStorageSOPClassUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(MEDIA_STORAGE_SOP_INSTANCE_UID), alias: "MediaStorageSOPInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(TRANSFER_SYNTAX_UID), alias: "TransferSyntaxUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(IMPLEMENTATION_CLASS_UID), alias: "ImplementationClassUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(IMPLEMENTATION_VERSION_NAME), alias: "ImplementationVersionName", vr: VR::SH },
    DictionaryEntryRef { tag: Single(SOURCE_APPLICATION_ENTITY_TITLE), alias: "SourceApplicationEntityTitle", vr: VR::AE },
    DictionaryEntryRef { tag: Single(PRIVATE_INFORMATION_CREATOR_UID), alias: "PrivateInformationCreatorUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(PRIVATE_INFORMATION), alias: "PrivateInformation", vr: VR::OB },
    DictionaryEntryRef { tag: Single(OFFSET_OF_THE_FIRST_DIRECTORY_RECORD), alias: "OffsetOfTheFirstDirectoryRecordOfTheRootDirectoryEntity", vr: VR::UL },
    DictionaryEntryRef { tag: Single(DIRECTORY_RECORD_SEQUENCE), alias: "DirectoryRecordSeq", vr: VR::SQ },
    DictionaryEntryRef { tag: Single(DIRECTORY_RECORD_TYPE), alias: "DirectoryRecordType", vr: VR::CS },
    DictionaryEntryRef { tag: Single(REFERENCED_FILE_ID), alias: "RefFileID", vr: VR::CS },
    DictionaryEntryRef { tag: Single(SPECIFIC_CHARACTER_SET), alias: "SpecificCharacterSet", vr: VR::CS },
    DictionaryEntryRef { tag: Single(IMAGE_TYPE), alias: "ImageType", vr: VR::CS },
    DictionaryEntryRef { tag: Single(INSTANCE_CREATION_DATE), alias: "InstanceCreationDate", vr: VR::DA },
    DictionaryEntryRef { tag: Single(INSTANCE_CREATION_TIME), alias: "InstanceCreationTime", vr: VR::TM },
    DictionaryEntryRef { tag: Single(SOP_CLASS_UID), alias: "SOPClassUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(SOP_INSTANCE_UID), alias: "SOPInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(STUDY_DATE), alias: "StudyDate", vr: VR::DA },
    DictionaryEntryRef { tag: Single(SERIES_DATE), alias: "SeriesDate", vr: VR::DA },
    DictionaryEntryRef { tag: Single(ACQUISITION_DATE), alias: "AcquisitionDate", vr: VR::DA },
    DictionaryEntryRef { tag: Single(CONTENT_DATE), alias: "ContentDate", vr: VR::DA },
    DictionaryEntryRef { tag: Single(STUDY_TIME), alias: "StudyTime", vr: VR::TM },
    DictionaryEntryRef { tag: Single(SERIES_TIME), alias: "SeriesTime", vr: VR::TM },
    DictionaryEntryRef { tag: Single(CONTENT_TIME), alias: "ContentTime", vr: VR::TM },
    DictionaryEntryRef { tag: Single(ACCESSION_NUMBER), alias: "AccessionNumber", vr: VR::SH },
    DictionaryEntryRef { tag: Single(MODALITY), alias: "Modality", vr: VR::CS },
    DictionaryEntryRef { tag: Single(MANUFACTURER), alias: "Manufacturer", vr: VR::LO },
    DictionaryEntryRef { tag: Single(INSTITUTION_NAME), alias: "InstitutionName", vr: VR::LO },
    DictionaryEntryRef { tag: Single(REFERRING_PHYSICIAN_NAME), alias: "ReferringPhysicianName", vr: VR::PN },
    DictionaryEntryRef { tag: Single(CODE_VALUE), alias: "CodeValue", vr: VR::SH },
    DictionaryEntryRef { tag: Single(CODING_SCHEME_DESIGNATOR), alias: "CodingSchemeDesignator", vr: VR::SH },
    DictionaryEntryRef { tag: Single(CODE_MEANING), alias: "CodeMeaning", vr: VR::LO },
    DictionaryEntryRef { tag: Single(STATION_NAME), alias: "StationName", vr: VR::SH },
    DictionaryEntryRef { tag: Single(STUDY_DESCRIPTION), alias: "StudyDescription", vr: VR::LO },
    DictionaryEntryRef { tag: Single(SERIES_DESCRIPTION), alias: "SeriesDescription", vr: VR::LO },
    DictionaryEntryRef { tag: Single(MANUFACTURER_MODEL_NAME), alias: "ManufacturerModelName", vr: VR::LO },
    DictionaryEntryRef { tag: Single(REFERENCED_SOP_CLASS_UID), alias: "RefSOPClassUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(REFERENCED_SOP_INSTANCE_UID), alias: "RefSOPInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(PATIENT_NAME), alias: "PatientName", vr: VR::PN },
    DictionaryEntryRef { tag: Single(PATIENT_ID), alias: "PatientID", vr: VR::LO },
    DictionaryEntryRef { tag: Single(PATIENT_BIRTH_DATE), alias: "PatientBirthDate", vr: VR::DA },
    DictionaryEntryRef { tag: Single(PATIENT_SEX), alias: "PatientSex", vr: VR::CS },
    DictionaryEntryRef { tag: Single(PATIENT_AGE), alias: "PatientAge", vr: VR::AS },
    DictionaryEntryRef { tag: Single(BODY_PART_EXAMINED), alias: "BodyPartExamined", vr: VR::CS },
    DictionaryEntryRef { tag: Single(SLICE_THICKNESS), alias: "SliceThickness", vr: VR::DS },
    DictionaryEntryRef { tag: Single(KVP), alias: "KVP", vr: VR::DS },
    DictionaryEntryRef { tag: Single(DEVICE_SERIAL_NUMBER), alias: "DeviceSerialNumber", vr: VR::LO },
    DictionaryEntryRef { tag: Single(SOFTWARE_VERSIONS), alias: "SoftwareVersions", vr: VR::LO },
    DictionaryEntryRef { tag: Single(PROTOCOL_NAME), alias: "ProtocolName", vr: VR::LO },
    DictionaryEntryRef { tag: Single(PATIENT_POSITION), alias: "PatientPosition", vr: VR::CS },
    DictionaryEntryRef { tag: Single(STUDY_INSTANCE_UID), alias: "StudyInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(SERIES_INSTANCE_UID), alias: "SeriesInstanceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(STUDY_ID), alias: "StudyID", vr: VR::SH },
    DictionaryEntryRef { tag: Single(SERIES_NUMBER), alias: "SeriesNumber", vr: VR::IS },
    DictionaryEntryRef { tag: Single(ACQUISITION_NUMBER), alias: "AcquisitionNumber", vr: VR::IS },
    DictionaryEntryRef { tag: Single(INSTANCE_NUMBER), alias: "InstanceNumber", vr: VR::IS },
    DictionaryEntryRef { tag: Single(FRAME_OF_REFERENCE_UID), alias: "FrameOfReferenceUID", vr: VR::UI },
    DictionaryEntryRef { tag: Single(LATERALITY), alias: "Laterality", vr: VR::CS },
    DictionaryEntryRef { tag: Single(SAMPLES_PER_PIXEL), alias: "SamplesPerPixel", vr: VR::US },
    DictionaryEntryRef { tag: Single(PHOTOMETRIC_INTERPRETATION), alias: "PhotometricInterpretation", vr: VR::CS },
    DictionaryEntryRef { tag: Single(PLANAR_CONFIGURATION), alias: "PlanarConfiguration", vr: VR::US },
    DictionaryEntryRef { tag: Single(NUMBER_OF_FRAMES), alias: "NumberOfFrames", vr: VR::IS },
    DictionaryEntryRef { tag: Single(ROWS), alias: "Rows", vr: VR::US },
    DictionaryEntryRef { tag: Single(COLUMNS), alias: "Columns", vr: VR::US },
    DictionaryEntryRef { tag: Single(PIXEL_SPACING), alias: "PixelSpacing", vr: VR::DS },
    DictionaryEntryRef { tag: Single(BITS_ALLOCATED), alias: "BitsAllocated", vr: VR::US },
    DictionaryEntryRef { tag: Single(BITS_STORED), alias: "BitsStored", vr: VR::US },
    DictionaryEntryRef { tag: Single(HIGH_BIT), alias: "HighBit", vr: VR::US },
    DictionaryEntryRef { tag: Single(PIXEL_REPRESENTATION), alias: "PixelRepresentation", vr: VR::US },
    DictionaryEntryRef { tag: Single(WINDOW_CENTER), alias: "WindowCenter", vr: VR::DS },
    DictionaryEntryRef { tag: Single(WINDOW_WIDTH), alias: "WindowWidth", vr: VR::DS },
    DictionaryEntryRef { tag: Single(RESCALE_INTERCEPT), alias: "RescaleIntercept", vr: VR::DS },
    DictionaryEntryRef { tag: Single(RESCALE_SLOPE), alias: "RescaleSlope", vr: VR::DS },
    DictionaryEntryRef { tag: Single(RELATIONSHIP_TYPE), alias: "RelationshipType", vr: VR::CS },
    DictionaryEntryRef { tag: Single(VALUE_TYPE), alias: "ValueType", vr: VR::CS },
    DictionaryEntryRef { tag: Single(CONCEPT_NAME_CODE_SEQUENCE), alias: "ConceptNameCodeSeq", vr: VR::SQ },
    DictionaryEntryRef { tag: Single(TEXT_VALUE), alias: "TextValue", vr: VR::UT },
    DictionaryEntryRef { tag: Single(CONCEPT_CODE_SEQUENCE), alias: "ConceptCodeSeq", vr: VR::SQ },
    DictionaryEntryRef { tag: Single(CURRENT_REQUESTED_PROCEDURE_EVIDENCE_SEQUENCE), alias: "CurrentRequestedProcedureEvidenceSeq", vr: VR::SQ },
    DictionaryEntryRef { tag: Single(CONTENT_SEQUENCE), alias: "ContentSeq", vr: VR::SQ },
    DictionaryEntryRef { tag: Single(PRESENTATION_LUT_SHAPE), alias: "PresentationLUTShape", vr: VR::CS },
    DictionaryEntryRef { tag: Group100(OVERLAY_DATA), alias: "OverlayData", vr: VR::OW },
    DictionaryEntryRef { tag: Single(PIXEL_DATA), alias: "PixelData", vr: VR::OW },
    DictionaryEntryRef { tag: Single(DATA_SET_TRAILING_PADDING), alias: "DataSetTrailingPadding", vr: VR::OB },
];
