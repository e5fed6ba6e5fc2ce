//! Basic encoders of primitive binary values, one per byte order.

use super::BasicEncode;
use byteordered::byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use byteordered::Endianness;
use std::io::{self, Write};

/// A basic encoder of DICOM primitive values in little endian.
#[derive(Debug, Default, Clone)]
pub struct LittleEndianBasicEncoder;

impl BasicEncode for LittleEndianBasicEncoder {
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    fn encode_us<S>(&self, mut to: S, value: u16) -> io::Result<()>
    where
        S: Write,
    {
        to.write_u16::<LittleEndian>(value)
    }

    fn encode_ul<S>(&self, mut to: S, value: u32) -> io::Result<()>
    where
        S: Write,
    {
        to.write_u32::<LittleEndian>(value)
    }

    fn encode_ss<S>(&self, mut to: S, value: i16) -> io::Result<()>
    where
        S: Write,
    {
        to.write_i16::<LittleEndian>(value)
    }

    fn encode_sl<S>(&self, mut to: S, value: i32) -> io::Result<()>
    where
        S: Write,
    {
        to.write_i32::<LittleEndian>(value)
    }

    fn encode_fl<S>(&self, mut to: S, value: f32) -> io::Result<()>
    where
        S: Write,
    {
        to.write_f32::<LittleEndian>(value)
    }

    fn encode_fd<S>(&self, mut to: S, value: f64) -> io::Result<()>
    where
        S: Write,
    {
        to.write_f64::<LittleEndian>(value)
    }
}

/// A basic encoder of DICOM primitive values in big endian.
#[derive(Debug, Default, Clone)]
pub struct BigEndianBasicEncoder;

impl BasicEncode for BigEndianBasicEncoder {
    fn endianness(&self) -> Endianness {
        Endianness::Big
    }

    fn encode_us<S>(&self, mut to: S, value: u16) -> io::Result<()>
    where
        S: Write,
    {
        to.write_u16::<BigEndian>(value)
    }

    fn encode_ul<S>(&self, mut to: S, value: u32) -> io::Result<()>
    where
        S: Write,
    {
        to.write_u32::<BigEndian>(value)
    }

    fn encode_ss<S>(&self, mut to: S, value: i16) -> io::Result<()>
    where
        S: Write,
    {
        to.write_i16::<BigEndian>(value)
    }

    fn encode_sl<S>(&self, mut to: S, value: i32) -> io::Result<()>
    where
        S: Write,
    {
        to.write_i32::<BigEndian>(value)
    }

    fn encode_fl<S>(&self, mut to: S, value: f32) -> io::Result<()>
    where
        S: Write,
    {
        to.write_f32::<BigEndian>(value)
    }

    fn encode_fd<S>(&self, mut to: S, value: f64) -> io::Result<()>
    where
        S: Write,
    {
        to.write_f64::<BigEndian>(value)
    }
}
