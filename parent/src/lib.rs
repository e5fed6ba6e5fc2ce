#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
//! An umbrella crate re-exporting the components of the
//! dcmflow DICOM object access library.
//!
//! - [`core`]: base data types (tags, value representations, values)
//! - [`dictionary`]: the standard attribute and UID dictionaries
//! - [`encoding`]: element codecs, text codecs and transfer syntaxes
//! - [`object`]: the high-level file object
//! - [`filter`]: the boolean predicate script language
//! - [`pixeldata`]: the window-level rendition pipeline

pub use dcmflow_core as core;
pub use dcmflow_dictionary as dictionary;
pub use dcmflow_encoding as encoding;
pub use dcmflow_filter as filter;
pub use dcmflow_object as object;
pub use dcmflow_pixeldata as pixeldata;

pub use dcmflow_core::{Tag, VR};
pub use dcmflow_object::{open_file, DicomFile};
