#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! DICOM encoding and decoding primitives.
//!
//! This crate provides the element header decoders and encoders
//! for the three base transfer syntaxes,
//! text codecs for the supported character repertoires,
//! and the transfer syntax descriptor table.
//!
//! All APIs are based on synchronous I/O.

pub mod decode;
pub mod encode;
pub mod text;
pub mod transfer_syntax;

pub use decode::Decode;
pub use encode::Encode;
pub use text::{SpecificCharacterSet, TextCodec};
pub use transfer_syntax::TransferSyntax;
