#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! High-level DICOM object access.
//!
//! This crate opens a file in the DICOM Part 10 encoding
//! (or a bare data set),
//! parses the file meta group and the data set
//! up to but not including the pixel data value,
//! and exposes structured access to the elements by tag path.
//! The object keeps its read cursor
//! so that it can be saved back faithfully,
//! optionally forcing Implicit VR Little Endian,
//! with the pixel data and trailing elements
//! streamed straight from the source.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let obj = dcmflow_object::open_file("0001.dcm")?;
//! let patient_name = obj.element_value("PatientName");
//! let modality = obj.element_value("Modality");
//! if obj.matches("Modality.equals(\"CT\")") {
//!     println!("{} ({})", patient_name, modality);
//! }
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod mem;
pub mod meta;
pub mod read;
pub mod write;

pub use file::{open_file, DicomFile};
pub use mem::{InMemDicomObject, InMemElement};
pub use meta::{FileMetaTable, FileMetaTableBuilder};
pub use read::{DataSetReader, Error as ReadError, FileFormat};
pub use write::Error as WriteError;

pub use dcmflow_core::Tag;
