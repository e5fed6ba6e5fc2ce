//! Reusable components for encoding and decoding text in DICOM
//! data structures, including support for character repertoires.
//!
//! At the moment, the library supports the default repertoire (ISO-IR 6,
//! decoded as ISO-8859-1), the Unicode repertoire ISO-IR 192, and GB18030.

use encoding::all::{GB18030, ISO_8859_1, UTF_8};
use encoding::{DecoderTrap, EncoderTrap, Encoding, RawDecoder, StringWriter};
use snafu::{Backtrace, Snafu};
use std::borrow::Cow;
use std::fmt::Debug;

/// An error from a failed text encoding or decoding procedure.
#[derive(Debug, Snafu)]
#[snafu(display("{}", message))]
pub struct TextEncodingError {
    message: Cow<'static, str>,
    backtrace: Backtrace,
}

impl TextEncodingError {
    /// Build an error from a message of the underlying encoder.
    pub fn new<T: Into<Cow<'static, str>>>(message: T) -> Self {
        TextEncodingSnafu {
            message: message.into(),
        }
        .build()
    }
}

pub type Result<T, E = TextEncodingError> = std::result::Result<T, E>;

/// A holder of encoding and decoding mechanisms for text in DICOM content,
/// which according to the standard, depends on the specific character set.
pub trait TextCodec {
    /// Obtain a unique name of the text encoding,
    /// which may be used as the value of a
    /// Specific Character Set (0008,0005) element to refer to this codec.
    ///
    /// Should contain no leading or trailing spaces.
    fn name(&self) -> &'static str;

    /// Decode the given byte buffer as a single string. The resulting string
    /// _may_ contain backslash characters ('\') to delimit individual values,
    /// and should be split later on if required.
    fn decode(&self, text: &[u8]) -> Result<String>;

    /// Encode a text value into a byte vector. The input string can
    /// feature multiple text values by using the backslash character ('\')
    /// as the value delimiter.
    fn encode(&self, text: &str) -> Result<Vec<u8>>;
}

impl<T: ?Sized> TextCodec for Box<T>
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        self.as_ref().decode(text)
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        self.as_ref().encode(text)
    }
}

impl<'a, T: ?Sized> TextCodec for &'a T
where
    T: TextCodec,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        (**self).decode(text)
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        (**self).encode(text)
    }
}

/// Type alias for a type erased text codec.
pub type DynamicTextCodec = Box<dyn TextCodec>;

/// An enum type for the supported character sets.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub enum SpecificCharacterSet {
    /// The default character set.
    #[default]
    Default,
    /// The Unicode character set defined in ISO IR 192, based on UTF-8.
    IsoIr192,
    /// The Simplified Chinese character set defined in GB18030.
    Gb18030,
}

impl SpecificCharacterSet {
    /// Resolve a character set from the value of a
    /// Specific Character Set (0008,0005) element.
    pub fn from_code(code: &str) -> Option<Self> {
        use self::SpecificCharacterSet::*;
        match code.trim_end() {
            "Default" | "ISO_IR 6" | "ISO_IR_6" | "" => Some(Default),
            "ISO_IR 192" => Some(IsoIr192),
            "GB18030" => Some(Gb18030),
            _ => None,
        }
    }

    /// Retrieve the respective text codec.
    pub fn codec(self) -> DynamicTextCodec {
        match self {
            SpecificCharacterSet::Default => Box::new(DefaultCharacterSetCodec),
            SpecificCharacterSet::IsoIr192 => Box::new(Utf8CharacterSetCodec),
            SpecificCharacterSet::Gb18030 => Box::new(Gb18030CharacterSetCodec),
        }
    }
}

fn decode_text_trap(
    _decoder: &mut dyn RawDecoder,
    input: &[u8],
    output: &mut dyn StringWriter,
) -> bool {
    let c = input[0];
    let o0 = c & 7;
    let o1 = (c & 56) >> 3;
    let o2 = (c & 192) >> 6;
    output.write_char('\\');
    output.write_char((o2 + b'0') as char);
    output.write_char((o1 + b'0') as char);
    output.write_char((o0 + b'0') as char);
    true
}

/// Data type representing the default character set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Copy)]
pub struct DefaultCharacterSetCodec;

impl TextCodec for DefaultCharacterSetCodec {
    fn name(&self) -> &'static str {
        "ISO_IR 6"
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        ISO_8859_1
            .decode(text, DecoderTrap::Call(decode_text_trap))
            .map_err(TextEncodingError::new)
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        ISO_8859_1
            .encode(text, EncoderTrap::Strict)
            .map_err(TextEncodingError::new)
    }
}

/// Data type representing the UTF-8 character set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Copy)]
pub struct Utf8CharacterSetCodec;

impl TextCodec for Utf8CharacterSetCodec {
    fn name(&self) -> &'static str {
        "ISO_IR 192"
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        UTF_8
            .decode(text, DecoderTrap::Call(decode_text_trap))
            .map_err(TextEncodingError::new)
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        UTF_8
            .encode(text, EncoderTrap::Strict)
            .map_err(TextEncodingError::new)
    }
}

/// Data type representing the GB18030 character set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Copy)]
pub struct Gb18030CharacterSetCodec;

impl TextCodec for Gb18030CharacterSetCodec {
    fn name(&self) -> &'static str {
        "GB18030"
    }

    fn decode(&self, text: &[u8]) -> Result<String> {
        GB18030
            .decode(text, DecoderTrap::Call(decode_text_trap))
            .map_err(TextEncodingError::new)
    }

    fn encode(&self, text: &str) -> Result<Vec<u8>> {
        GB18030
            .encode(text, EncoderTrap::Strict)
            .map_err(TextEncodingError::new)
    }
}

/// Strip the even-length padding byte from the end of an encoded value,
/// according to the given padding character
/// (NUL for unique identifiers, space for other text values).
pub fn trim_trailing_padding(data: &[u8], pad: u8) -> &[u8] {
    match data.last() {
        Some(&b) if b == pad => &data[..data.len() - 1],
        _ => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_codec_roundtrip() {
        let codec = DefaultCharacterSetCodec;
        let decoded = codec.decode(b"JOHN^DOE").unwrap();
        assert_eq!(decoded, "JOHN^DOE");
        assert_eq!(codec.encode(&decoded).unwrap(), b"JOHN^DOE");
    }

    #[test]
    fn default_codec_latin1_bytes_are_preserved() {
        let codec = DefaultCharacterSetCodec;
        // 0xE9 is 'é' in ISO-8859-1
        let decoded = codec.decode(&[0x4A, 0xE9, 0x41, 0x4E]).unwrap();
        assert_eq!(decoded, "JéAN");
        assert_eq!(codec.encode(&decoded).unwrap(), vec![0x4A, 0xE9, 0x41, 0x4E]);
    }

    #[test]
    fn charset_from_code() {
        assert_eq!(
            SpecificCharacterSet::from_code("ISO_IR 100"),
            None,
        );
        assert_eq!(
            SpecificCharacterSet::from_code("ISO_IR 192"),
            Some(SpecificCharacterSet::IsoIr192)
        );
        assert_eq!(
            SpecificCharacterSet::from_code("ISO_IR 6"),
            Some(SpecificCharacterSet::Default)
        );
        assert_eq!(
            SpecificCharacterSet::from_code(""),
            Some(SpecificCharacterSet::Default)
        );
    }

    #[test]
    fn padding_trim() {
        assert_eq!(trim_trailing_padding(b"CT ", b' '), b"CT");
        assert_eq!(trim_trailing_padding(b"1.2.840\0", 0), b"1.2.840");
        assert_eq!(trim_trailing_padding(b"CT", b' '), b"CT");
        assert_eq!(trim_trailing_padding(b"", b' '), b"");
    }
}
