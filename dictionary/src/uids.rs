//! The UID dictionary:
//! a mapping from the unique identifiers known to this library
//! to their display names,
//! plus the SOP class tests used for object classification.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Implicit VR Little Endian: Default Transfer Syntax for DICOM
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
/// Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
/// Explicit VR Big Endian (retired)
pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";
/// JPEG Baseline (Process 1)
pub const JPEG_BASELINE: &str = "1.2.840.10008.1.2.4.50";
/// JPEG Extended (Process 2 & 4)
pub const JPEG_EXTENDED: &str = "1.2.840.10008.1.2.4.51";
/// JPEG Lossless, Non-Hierarchical (Process 14)
pub const JPEG_LOSSLESS_NON_HIERARCHICAL: &str = "1.2.840.10008.1.2.4.57";
/// JPEG Lossless, Non-Hierarchical, First-Order Prediction
pub const JPEG_LOSSLESS_FIRST_ORDER_PREDICTION: &str = "1.2.840.10008.1.2.4.70";
/// JPEG-LS Lossless Image Compression
pub const JPEG_LS_LOSSLESS: &str = "1.2.840.10008.1.2.4.80";
/// JPEG-LS Lossy (Near-Lossless) Image Compression
pub const JPEG_LS_LOSSY: &str = "1.2.840.10008.1.2.4.81";
/// JPEG 2000 Image Compression (Lossless Only)
pub const JPEG_2000_LOSSLESS_ONLY: &str = "1.2.840.10008.1.2.4.90";
/// JPEG 2000 Image Compression
pub const JPEG_2000: &str = "1.2.840.10008.1.2.4.91";
/// RLE Lossless
pub const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

/// Media Storage Directory Storage (the DICOMDIR SOP class)
pub const MEDIA_STORAGE_DIRECTORY_STORAGE: &str = "1.2.840.10008.1.3.10";

/// Computed Radiography Image Storage
pub const COMPUTED_RADIOGRAPHY_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.1";
/// CT Image Storage
pub const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
/// Ultrasound Image Storage
pub const ULTRASOUND_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.6.1";
/// MR Image Storage
pub const MR_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.4";
/// Secondary Capture Image Storage
pub const SECONDARY_CAPTURE_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.7";

/// Basic Text SR Storage
pub const BASIC_TEXT_SR_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.88.11";
/// Enhanced SR Storage
pub const ENHANCED_SR_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.88.22";
/// Comprehensive SR Storage
pub const COMPREHENSIVE_SR_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.88.33";
/// Procedure Log Storage
pub const PROCEDURE_LOG_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.88.40";
/// Mammography CAD SR Storage
pub const MAMMOGRAPHY_CAD_SR_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.88.50";
/// Key Object Selection Document Storage (KIN)
pub const KEY_OBJECT_SELECTION_DOCUMENT_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.88.59";
/// X-Ray Radiation Dose SR Storage
pub const XRAY_RADIATION_DOSE_SR_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.88.67";

static NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::with_capacity(32);
    m.insert(IMPLICIT_VR_LITTLE_ENDIAN, "Implicit VR Little Endian");
    m.insert(EXPLICIT_VR_LITTLE_ENDIAN, "Explicit VR Little Endian");
    m.insert(EXPLICIT_VR_BIG_ENDIAN, "Explicit VR Big Endian");
    m.insert(JPEG_BASELINE, "JPEG Baseline (Process 1)");
    m.insert(JPEG_EXTENDED, "JPEG Extended (Process 2 & 4)");
    m.insert(
        JPEG_LOSSLESS_NON_HIERARCHICAL,
        "JPEG Lossless, Non-Hierarchical (Process 14)",
    );
    m.insert(
        JPEG_LOSSLESS_FIRST_ORDER_PREDICTION,
        "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    );
    m.insert(JPEG_LS_LOSSLESS, "JPEG-LS Lossless Image Compression");
    m.insert(JPEG_LS_LOSSY, "JPEG-LS Lossy (Near-Lossless) Image Compression");
    m.insert(JPEG_2000_LOSSLESS_ONLY, "JPEG 2000 Image Compression (Lossless Only)");
    m.insert(JPEG_2000, "JPEG 2000 Image Compression");
    m.insert(RLE_LOSSLESS, "RLE Lossless");
    m.insert(MEDIA_STORAGE_DIRECTORY_STORAGE, "Media Storage Directory Storage");
    m.insert(
        COMPUTED_RADIOGRAPHY_IMAGE_STORAGE,
        "Computed Radiography Image Storage",
    );
    m.insert(CT_IMAGE_STORAGE, "CT Image Storage");
    m.insert(ULTRASOUND_IMAGE_STORAGE, "Ultrasound Image Storage");
    m.insert(MR_IMAGE_STORAGE, "MR Image Storage");
    m.insert(SECONDARY_CAPTURE_IMAGE_STORAGE, "Secondary Capture Image Storage");
    m.insert(BASIC_TEXT_SR_STORAGE, "Basic Text SR Storage");
    m.insert(ENHANCED_SR_STORAGE, "Enhanced SR Storage");
    m.insert(COMPREHENSIVE_SR_STORAGE, "Comprehensive SR Storage");
    m.insert(PROCEDURE_LOG_STORAGE, "Procedure Log Storage");
    m.insert(MAMMOGRAPHY_CAD_SR_STORAGE, "Mammography CAD SR Storage");
    m.insert(
        KEY_OBJECT_SELECTION_DOCUMENT_STORAGE,
        "Key Object Selection Document Storage",
    );
    m.insert(XRAY_RADIATION_DOSE_SR_STORAGE, "X-Ray Radiation Dose SR Storage");
    m
});

/// Look up the display name of a UID.
/// A trailing NUL padding byte is tolerated.
pub fn name_of(uid: &str) -> Option<&'static str> {
    NAMES.get(uid.trim_end_matches(['\0', ' '])).copied()
}

/// The SOP classes of structured report documents.
static SR_SOP_CLASSES: &[&str] = &[
    BASIC_TEXT_SR_STORAGE,
    ENHANCED_SR_STORAGE,
    COMPREHENSIVE_SR_STORAGE,
    PROCEDURE_LOG_STORAGE,
    MAMMOGRAPHY_CAD_SR_STORAGE,
    KEY_OBJECT_SELECTION_DOCUMENT_STORAGE,
    XRAY_RADIATION_DOSE_SR_STORAGE,
];

/// Whether the given SOP class UID identifies a structured report document.
pub fn is_sr_sop_class(uid: &str) -> bool {
    let uid = uid.trim_end_matches(['\0', ' ']);
    SR_SOP_CLASSES.contains(&uid)
}

/// Whether the given SOP class UID is the
/// Key Object Selection (KIN) document class.
pub fn is_kin_sop_class(uid: &str) -> bool {
    uid.trim_end_matches(['\0', ' ']) == KEY_OBJECT_SELECTION_DOCUMENT_STORAGE
}

/// Whether the given SOP class UID is the DICOMDIR directory class.
pub fn is_dicomdir_sop_class(uid: &str) -> bool {
    uid.trim_end_matches(['\0', ' ']) == MEDIA_STORAGE_DIRECTORY_STORAGE
}
