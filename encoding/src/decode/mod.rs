//! All DICOM data element decoding logic.

use byteordered::Endianness;
use dcmflow_core::header::{DataElementHeader, SequenceItemHeader};
use dcmflow_core::Tag;
use snafu::{Backtrace, Snafu};
use std::io::{self, Read};

pub mod basic;
pub mod explicit;
pub mod implicit_le;

pub use self::explicit::{
    ExplicitVRBigEndianDecoder, ExplicitVRDecoder, ExplicitVRLittleEndianDecoder,
};
pub use self::implicit_le::{ImplicitVRLittleEndianDecoder, StandardImplicitVRLittleEndianDecoder};

/// Module-level error type:
/// for errors which may occur while decoding DICOM data.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to read the header's tag field: {}", source))]
    ReadHeaderTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read a tag: {}", source))]
    ReadTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's item length field: {}", source))]
    ReadItemLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's reserved bytes: {}", source))]
    ReadReserved {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's element length field: {}", source))]
    ReadLength {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to read the header's value representation: {}", source))]
    ReadVr {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Bad sequence item header: {}", source))]
    BadSequenceHeader {
        source: dcmflow_core::header::SequenceItemHeaderError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Obtain a data element decoder for reading the data elements in a DICOM
/// file's meta information. According to the standard, these are always
/// encoded in Explicit VR Little Endian.
pub fn file_header_decoder() -> ExplicitVRLittleEndianDecoder {
    ExplicitVRLittleEndianDecoder::default()
}

/// Type trait for reading and decoding basic data values from a data source.
///
/// This trait provides methods for reading binary numbers based on the
/// source's endianness.
pub trait BasicDecode {
    /// Retrieve the source's endianness, as expected by this decoder.
    fn endianness(&self) -> Endianness;

    /// Decode an unsigned short value from the given source.
    fn decode_us<S>(&self, source: S) -> io::Result<u16>
    where
        S: Read;

    /// Decode an unsigned long value from the given source.
    fn decode_ul<S>(&self, source: S) -> io::Result<u32>
    where
        S: Read;

    /// Decode a signed short value from the given source.
    fn decode_ss<S>(&self, source: S) -> io::Result<i16>
    where
        S: Read;

    /// Decode a signed long value from the given source.
    fn decode_sl<S>(&self, source: S) -> io::Result<i32>
    where
        S: Read;

    /// Decode a single precision float value from the given source.
    fn decode_fl<S>(&self, source: S) -> io::Result<f32>
    where
        S: Read;

    /// Decode a double precision float value from the given source.
    fn decode_fd<S>(&self, source: S) -> io::Result<f64>
    where
        S: Read;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S>(&self, mut source: S) -> io::Result<Tag>
    where
        S: Read,
    {
        let g = self.decode_us(&mut source)?;
        let e = self.decode_us(source)?;
        Ok(Tag(g, e))
    }
}

/// Type trait for decoding DICOM data element headers from a data source.
/// The given transfer syntax determines the byte order
/// and whether the value representation is in the stream.
pub trait Decode {
    /// Fetch and decode the next data element header from the given source.
    /// The value is not retrieved; it is up to the caller to read or skip
    /// the following bytes.
    ///
    /// Returns the header and the exact number of bytes read from the source.
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read;

    /// Fetch and decode the next sequence item head from the given source.
    /// It is a separate method because value representation is never
    /// defined when reading item headers.
    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read;

    /// Decode a DICOM attribute tag from the given source.
    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read;
}

/// A data element decoder resolved at run time
/// from a transfer syntax specifier.
#[derive(Debug)]
pub enum DataDecoder {
    /// Implicit VR Little Endian, with the standard dictionary.
    ImplicitVRLittleEndian(StandardImplicitVRLittleEndianDecoder),
    /// Explicit VR Little Endian.
    ExplicitVRLittleEndian(ExplicitVRLittleEndianDecoder),
    /// Explicit VR Big Endian.
    ExplicitVRBigEndian(ExplicitVRBigEndianDecoder),
}

impl Decode for DataDecoder {
    fn decode_header<S>(&self, source: &mut S) -> Result<(DataElementHeader, usize)>
    where
        S: ?Sized + Read,
    {
        match self {
            DataDecoder::ImplicitVRLittleEndian(d) => d.decode_header(source),
            DataDecoder::ExplicitVRLittleEndian(d) => d.decode_header(source),
            DataDecoder::ExplicitVRBigEndian(d) => d.decode_header(source),
        }
    }

    fn decode_item_header<S>(&self, source: &mut S) -> Result<SequenceItemHeader>
    where
        S: ?Sized + Read,
    {
        match self {
            DataDecoder::ImplicitVRLittleEndian(d) => d.decode_item_header(source),
            DataDecoder::ExplicitVRLittleEndian(d) => d.decode_item_header(source),
            DataDecoder::ExplicitVRBigEndian(d) => d.decode_item_header(source),
        }
    }

    fn decode_tag<S>(&self, source: &mut S) -> Result<Tag>
    where
        S: ?Sized + Read,
    {
        match self {
            DataDecoder::ImplicitVRLittleEndian(d) => d.decode_tag(source),
            DataDecoder::ExplicitVRLittleEndian(d) => d.decode_tag(source),
            DataDecoder::ExplicitVRBigEndian(d) => d.decode_tag(source),
        }
    }
}
