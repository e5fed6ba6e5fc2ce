//! The transfer syntax descriptor table.
//!
//! A transfer syntax specifier names the byte order of the data set,
//! whether value representations are explicit in the stream,
//! and whether the pixel data is encapsulated in a fragment sequence.
//! The registry maps a transfer syntax UID to its specifier
//! and is populated once, before first use.

use crate::decode::{
    DataDecoder, ExplicitVRBigEndianDecoder, ExplicitVRLittleEndianDecoder,
    ImplicitVRLittleEndianDecoder,
};
use crate::encode::{
    DataEncoder, ExplicitVRBigEndianEncoder, ExplicitVRLittleEndianEncoder,
    ImplicitVRLittleEndianEncoder,
};
use byteordered::Endianness;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A descriptor of a single transfer syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSyntax {
    /// The unique identifier of the transfer syntax.
    uid: &'static str,
    /// The name of the transfer syntax.
    name: &'static str,
    /// The byte order of the data set.
    endianness: Endianness,
    /// Whether the data set carries explicit value representations.
    explicit_vr: bool,
    /// Whether pixel data is encapsulated in a sequence of fragments.
    encapsulated: bool,
}

impl TransferSyntax {
    /// Create a new descriptor.
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        endianness: Endianness,
        explicit_vr: bool,
        encapsulated: bool,
    ) -> TransferSyntax {
        TransferSyntax {
            uid,
            name,
            endianness,
            explicit_vr,
            encapsulated,
        }
    }

    /// The transfer syntax UID.
    pub fn uid(&self) -> &'static str {
        self.uid
    }

    /// A human readable name of the transfer syntax.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The expected byte order of the data set.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Whether value representations are in the element headers.
    pub fn is_explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Whether the pixel data is encapsulated.
    pub fn is_encapsulated(&self) -> bool {
        self.encapsulated
    }

    /// Obtain a data element decoder for this transfer syntax.
    /// Encapsulated syntaxes read their data sets
    /// in Explicit VR Little Endian.
    pub fn decoder(&self) -> DataDecoder {
        match (self.explicit_vr, self.endianness) {
            (false, _) => {
                DataDecoder::ImplicitVRLittleEndian(ImplicitVRLittleEndianDecoder::new())
            }
            (true, Endianness::Little) => {
                DataDecoder::ExplicitVRLittleEndian(ExplicitVRLittleEndianDecoder::default())
            }
            (true, Endianness::Big) => {
                DataDecoder::ExplicitVRBigEndian(ExplicitVRBigEndianDecoder::default())
            }
        }
    }

    /// Obtain a data element encoder for this transfer syntax.
    pub fn encoder(&self) -> DataEncoder {
        match (self.explicit_vr, self.endianness) {
            (false, _) => {
                DataEncoder::ImplicitVRLittleEndian(ImplicitVRLittleEndianEncoder::default())
            }
            (true, Endianness::Little) => {
                DataEncoder::ExplicitVRLittleEndian(ExplicitVRLittleEndianEncoder::default())
            }
            (true, Endianness::Big) => {
                DataEncoder::ExplicitVRBigEndian(ExplicitVRBigEndianEncoder::default())
            }
        }
    }
}

/// **Fully supported:** Implicit VR Little Endian,
/// the default transfer syntax.
pub const IMPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2",
    "Implicit VR Little Endian",
    Endianness::Little,
    false,
    false,
);

/// **Fully supported:** Explicit VR Little Endian.
pub const EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.1",
    "Explicit VR Little Endian",
    Endianness::Little,
    true,
    false,
);

/// **Fully supported:** Explicit VR Big Endian (retired).
pub const EXPLICIT_VR_BIG_ENDIAN: TransferSyntax = TransferSyntax::new(
    "1.2.840.10008.1.2.2",
    "Explicit VR Big Endian",
    Endianness::Big,
    true,
    false,
);

/// create an encapsulated TS whose pixel data requires an external codec
const fn create_ts_encapsulated(uid: &'static str, name: &'static str) -> TransferSyntax {
    TransferSyntax::new(uid, name, Endianness::Little, true, true)
}

/// JPEG Baseline (Process 1)
pub const JPEG_BASELINE: TransferSyntax =
    create_ts_encapsulated("1.2.840.10008.1.2.4.50", "JPEG Baseline (Process 1)");
/// JPEG Extended (Process 2 & 4)
pub const JPEG_EXTENDED: TransferSyntax =
    create_ts_encapsulated("1.2.840.10008.1.2.4.51", "JPEG Extended (Process 2 & 4)");
/// JPEG Lossless, Non-Hierarchical (Process 14)
pub const JPEG_LOSSLESS_NON_HIERARCHICAL: TransferSyntax = create_ts_encapsulated(
    "1.2.840.10008.1.2.4.57",
    "JPEG Lossless, Non-Hierarchical (Process 14)",
);
/// JPEG Lossless, Non-Hierarchical, First-Order Prediction
pub const JPEG_LOSSLESS_FIRST_ORDER_PREDICTION: TransferSyntax = create_ts_encapsulated(
    "1.2.840.10008.1.2.4.70",
    "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
);
/// JPEG-LS Lossless Image Compression
pub const JPEG_LS_LOSSLESS: TransferSyntax = create_ts_encapsulated(
    "1.2.840.10008.1.2.4.80",
    "JPEG-LS Lossless Image Compression",
);
/// JPEG-LS Lossy (Near-Lossless) Image Compression
pub const JPEG_LS_LOSSY: TransferSyntax = create_ts_encapsulated(
    "1.2.840.10008.1.2.4.81",
    "JPEG-LS Lossy (Near-Lossless) Image Compression",
);
/// JPEG 2000 Image Compression (Lossless Only)
pub const JPEG_2000_LOSSLESS_ONLY: TransferSyntax = create_ts_encapsulated(
    "1.2.840.10008.1.2.4.90",
    "JPEG 2000 Image Compression (Lossless Only)",
);
/// JPEG 2000 Image Compression
pub const JPEG_2000: TransferSyntax =
    create_ts_encapsulated("1.2.840.10008.1.2.4.91", "JPEG 2000 Image Compression");
/// RLE Lossless
pub const RLE_LOSSLESS: TransferSyntax =
    create_ts_encapsulated("1.2.840.10008.1.2.5", "RLE Lossless");

static ENTRIES: [&TransferSyntax; 12] = [
    &IMPLICIT_VR_LITTLE_ENDIAN,
    &EXPLICIT_VR_LITTLE_ENDIAN,
    &EXPLICIT_VR_BIG_ENDIAN,
    &JPEG_BASELINE,
    &JPEG_EXTENDED,
    &JPEG_LOSSLESS_NON_HIERARCHICAL,
    &JPEG_LOSSLESS_FIRST_ORDER_PREDICTION,
    &JPEG_LS_LOSSLESS,
    &JPEG_LS_LOSSY,
    &JPEG_2000_LOSSLESS_ONLY,
    &JPEG_2000,
    &RLE_LOSSLESS,
];

static REGISTRY: Lazy<HashMap<&'static str, &'static TransferSyntax>> = Lazy::new(|| {
    ENTRIES.iter().map(|ts| (ts.uid(), *ts)).collect()
});

/// Obtain a transfer syntax specifier by UID.
/// A trailing NUL padding byte in the given UID is tolerated.
pub fn lookup<U: AsRef<str>>(uid: U) -> Option<&'static TransferSyntax> {
    let uid = uid.as_ref().trim_end_matches(['\0', ' ']);
    REGISTRY.get(uid).copied()
}

/// Retrieve the default transfer syntax,
/// assumed when a data set declares no transfer syntax of its own.
pub fn default() -> &'static TransferSyntax {
    &IMPLICIT_VR_LITTLE_ENDIAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_uids_resolve() {
        assert_eq!(
            lookup("1.2.840.10008.1.2").map(TransferSyntax::name),
            Some("Implicit VR Little Endian")
        );
        assert!(lookup("1.2.840.10008.1.2.1").is_some());
        assert!(lookup("1.2.840.10008.1.2.2").is_some());
        // NUL padded value, as read from a file
        assert!(lookup("1.2.840.10008.1.2.1\0").is_some());
        assert!(lookup("1.1.1.1").is_none());
    }

    #[test]
    fn encapsulation_flags() {
        assert!(lookup("1.2.840.10008.1.2.4.50").unwrap().is_encapsulated());
        assert!(lookup("1.2.840.10008.1.2.4.70").unwrap().is_encapsulated());
        assert!(lookup("1.2.840.10008.1.2.4.80").unwrap().is_encapsulated());
        assert!(lookup("1.2.840.10008.1.2.4.90").unwrap().is_encapsulated());
        assert!(!lookup("1.2.840.10008.1.2.1").unwrap().is_encapsulated());
    }

    #[test]
    fn base_syntax_parameters() {
        let ts = lookup("1.2.840.10008.1.2.2").unwrap();
        assert_eq!(ts.endianness(), Endianness::Big);
        assert!(ts.is_explicit_vr());
        let ts = super::default();
        assert_eq!(ts.endianness(), Endianness::Little);
        assert!(!ts.is_explicit_vr());
    }
}
