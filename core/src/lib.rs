#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! Base data types for reading and manipulating DICOM content:
//! attribute tags, value representations, element headers,
//! the in-memory value model,
//! and the data dictionary abstraction.
//!
//! Everything else in the project builds on the types in this crate.

pub mod dictionary;
pub mod header;
pub mod value;

pub use dictionary::DataDictionary;
pub use header::{
    DataElement, DataElementHeader, HasLength, Header, Length, SequenceItemHeader, Tag, VR,
};
pub use value::{PrimitiveValue, Value};

use smallvec::SmallVec;

/// The type of collection used for in-memory multiplicity,
/// such as the individual values of a multi-valued element
/// or the items of a sequence.
pub type C<T> = SmallVec<[T; 2]>;
