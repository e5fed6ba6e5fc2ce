//! All DICOM data element encoding logic.

use byteordered::Endianness;
use dcmflow_core::header::DataElementHeader;
use dcmflow_core::Tag;
use snafu::{Backtrace, Snafu};
use std::io::{self, Write};

pub mod basic;
pub mod explicit;
pub mod implicit_le;

pub use self::explicit::{
    ExplicitVRBigEndianEncoder, ExplicitVREncoder, ExplicitVRLittleEndianEncoder,
};
pub use self::implicit_le::ImplicitVRLittleEndianEncoder;

/// Module-level error type:
/// for errors which may occur while encoding DICOM data.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to write a tag: {}", source))]
    WriteTag {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write an element header: {}", source))]
    WriteHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write an item header: {}", source))]
    WriteItemHeader {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write an item delimiter: {}", source))]
    WriteItemDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
    #[snafu(display("Failed to write a sequence delimiter: {}", source))]
    WriteSequenceDelimiter {
        backtrace: Backtrace,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Type trait for encoding and writing basic data values to a data sink,
/// in the sink's expected byte order.
pub trait BasicEncode {
    /// Retrieve the encoder's endianness.
    fn endianness(&self) -> Endianness;

    /// Encode an unsigned short value to the given destination.
    fn encode_us<S>(&self, to: S, value: u16) -> io::Result<()>
    where
        S: Write;

    /// Encode an unsigned long value to the given destination.
    fn encode_ul<S>(&self, to: S, value: u32) -> io::Result<()>
    where
        S: Write;

    /// Encode a signed short value to the given destination.
    fn encode_ss<S>(&self, to: S, value: i16) -> io::Result<()>
    where
        S: Write;

    /// Encode a signed long value to the given destination.
    fn encode_sl<S>(&self, to: S, value: i32) -> io::Result<()>
    where
        S: Write;

    /// Encode a single precision float value to the given destination.
    fn encode_fl<S>(&self, to: S, value: f32) -> io::Result<()>
    where
        S: Write;

    /// Encode a double precision float value to the given destination.
    fn encode_fd<S>(&self, to: S, value: f64) -> io::Result<()>
    where
        S: Write;
}

/// Type trait for encoding DICOM data element headers to a data sink.
pub trait Encode {
    /// Encode and write an element tag.
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write;

    /// Encode and write a data element header to the given destination.
    /// Returns the number of bytes effectively written on success.
    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write;

    /// Encode and write an item header,
    /// with the given item value length.
    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write;

    /// Encode and write an item delimiter.
    fn encode_item_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write;

    /// Encode and write a sequence delimiter.
    fn encode_sequence_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write;
}

/// A data element encoder resolved at run time
/// from a transfer syntax specifier.
#[derive(Debug)]
pub enum DataEncoder {
    /// Implicit VR Little Endian.
    ImplicitVRLittleEndian(ImplicitVRLittleEndianEncoder),
    /// Explicit VR Little Endian.
    ExplicitVRLittleEndian(ExplicitVRLittleEndianEncoder),
    /// Explicit VR Big Endian.
    ExplicitVRBigEndian(ExplicitVRBigEndianEncoder),
}

macro_rules! for_each {
    ($s:expr, |$e:ident| $f:expr) => {
        match $s {
            DataEncoder::ImplicitVRLittleEndian($e) => $f,
            DataEncoder::ExplicitVRLittleEndian($e) => $f,
            DataEncoder::ExplicitVRBigEndian($e) => $f,
        }
    };
}

impl Encode for DataEncoder {
    fn encode_tag<W>(&self, to: W, tag: Tag) -> Result<()>
    where
        W: Write,
    {
        for_each!(self, |e| e.encode_tag(to, tag))
    }

    fn encode_element_header<W>(&self, to: W, de: DataElementHeader) -> Result<usize>
    where
        W: Write,
    {
        for_each!(self, |e| e.encode_element_header(to, de))
    }

    fn encode_item_header<W>(&self, to: W, len: u32) -> Result<()>
    where
        W: Write,
    {
        for_each!(self, |e| e.encode_item_header(to, len))
    }

    fn encode_item_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        for_each!(self, |e| e.encode_item_delimiter(to))
    }

    fn encode_sequence_delimiter<W>(&self, to: W) -> Result<()>
    where
        W: Write,
    {
        for_each!(self, |e| e.encode_sequence_delimiter(to))
    }
}
