//! Basic decoders of primitive binary values, one per byte order.

use super::BasicDecode;
use byteordered::byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use byteordered::Endianness;
use std::io::{self, Read};

/// A basic decoder of DICOM primitive values in little endian.
#[derive(Debug, Default, Clone)]
pub struct LittleEndianBasicDecoder;

impl BasicDecode for LittleEndianBasicDecoder {
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    fn decode_us<S>(&self, mut source: S) -> io::Result<u16>
    where
        S: Read,
    {
        source.read_u16::<LittleEndian>()
    }

    fn decode_ul<S>(&self, mut source: S) -> io::Result<u32>
    where
        S: Read,
    {
        source.read_u32::<LittleEndian>()
    }

    fn decode_ss<S>(&self, mut source: S) -> io::Result<i16>
    where
        S: Read,
    {
        source.read_i16::<LittleEndian>()
    }

    fn decode_sl<S>(&self, mut source: S) -> io::Result<i32>
    where
        S: Read,
    {
        source.read_i32::<LittleEndian>()
    }

    fn decode_fl<S>(&self, mut source: S) -> io::Result<f32>
    where
        S: Read,
    {
        source.read_f32::<LittleEndian>()
    }

    fn decode_fd<S>(&self, mut source: S) -> io::Result<f64>
    where
        S: Read,
    {
        source.read_f64::<LittleEndian>()
    }
}

/// A basic decoder of DICOM primitive values in big endian.
#[derive(Debug, Default, Clone)]
pub struct BigEndianBasicDecoder;

impl BasicDecode for BigEndianBasicDecoder {
    fn endianness(&self) -> Endianness {
        Endianness::Big
    }

    fn decode_us<S>(&self, mut source: S) -> io::Result<u16>
    where
        S: Read,
    {
        source.read_u16::<BigEndian>()
    }

    fn decode_ul<S>(&self, mut source: S) -> io::Result<u32>
    where
        S: Read,
    {
        source.read_u32::<BigEndian>()
    }

    fn decode_ss<S>(&self, mut source: S) -> io::Result<i16>
    where
        S: Read,
    {
        source.read_i16::<BigEndian>()
    }

    fn decode_sl<S>(&self, mut source: S) -> io::Result<i32>
    where
        S: Read,
    {
        source.read_i32::<BigEndian>()
    }

    fn decode_fl<S>(&self, mut source: S) -> io::Result<f32>
    where
        S: Read,
    {
        source.read_f32::<BigEndian>()
    }

    fn decode_fd<S>(&self, mut source: S) -> io::Result<f64>
    where
        S: Read,
    {
        source.read_f64::<BigEndian>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmflow_core::Tag;

    #[test]
    fn byte_order_is_respected() {
        const WORD: &[u8] = &[0x34, 0x12];
        assert_eq!(LittleEndianBasicDecoder.decode_us(WORD).unwrap(), 0x1234);
        assert_eq!(BigEndianBasicDecoder.decode_us(WORD).unwrap(), 0x3412);

        const LONG: &[u8] = &[0x78, 0x56, 0x34, 0x12];
        assert_eq!(
            LittleEndianBasicDecoder.decode_ul(LONG).unwrap(),
            0x1234_5678
        );
        assert_eq!(BigEndianBasicDecoder.decode_ul(LONG).unwrap(), 0x7856_3412);
    }

    #[test]
    fn tags_are_a_pair_of_shorts() {
        const TAG: &[u8] = &[0x10, 0x00, 0x20, 0x00];
        assert_eq!(
            LittleEndianBasicDecoder.decode_tag(TAG).unwrap(),
            Tag(0x0010, 0x0020)
        );
        const TAG_BE: &[u8] = &[0x00, 0x10, 0x00, 0x20];
        assert_eq!(
            BigEndianBasicDecoder.decode_tag(TAG_BE).unwrap(),
            Tag(0x0010, 0x0020)
        );
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(LittleEndianBasicDecoder.decode_ul(&[0x01u8][..]).is_err());
    }
}
