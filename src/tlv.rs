/*! The primitive (non-constructed) IPND TLV types.

IPND draft 02 describes every service parameter as a sequence of tagged
fields.  A field is one tag octet followed by a body whose framing depends
on the tag:

| tag | name    | body                                  |
|-----|---------|---------------------------------------|
| 0   | BOOLEAN | 1 octet, zero is false                |
| 1   | UINT64  | SDNV                                  |
| 2   | SINT64  | SDNV (two's-complement bit pattern)   |
| 3   | FIXED16 | 2 octets, big-endian                  |
| 4   | FIXED32 | 4 octets, big-endian                  |
| 5   | FIXED64 | 8 octets, big-endian                  |
| 6   | FLOAT   | 2 octets, opaque                      |
| 7   | DOUBLE  | 4 octets, opaque                      |
| 8   | STRING  | SDNV length, then that many octets    |
| 9   | BYTES   | SDNV length, then that many octets    |

The FLOAT and DOUBLE widths are narrower than the IEEE-754 sizes their
names suggest.  That is what the draft puts on the wire, so this codec
carries them as opaque 2- and 4-octet buffers rather than guessing a
re-quantization scheme.
*/

use crate::error::ParseError;
use crate::rdr::Reader;
use crate::{sdnv, MAX_FIELD_LEN};
use bytes::Bytes;

/// One-byte type code of a primitive field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tag {
    Boolean,
    UInt64,
    SInt64,
    Fixed16,
    Fixed32,
    Fixed64,
    Float,
    Double,
    String,
    Bytes,
}

/// How the body length of a primitive field is determined.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LengthClass {
    /// The tag implies a body of exactly this many octets.
    Fixed(usize),
    /// The body is an SDNV and delimits itself.
    Sdnv,
    /// The body is an SDNV length followed by that many raw octets.
    Prefixed,
}

impl Tag {
    pub fn from_u8(tag: u8) -> Option<Tag> {
        Some(match tag {
            0 => Tag::Boolean,
            1 => Tag::UInt64,
            2 => Tag::SInt64,
            3 => Tag::Fixed16,
            4 => Tag::Fixed32,
            5 => Tag::Fixed64,
            6 => Tag::Float,
            7 => Tag::Double,
            8 => Tag::String,
            9 => Tag::Bytes,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Tag::Boolean => 0,
            Tag::UInt64 => 1,
            Tag::SInt64 => 2,
            Tag::Fixed16 => 3,
            Tag::Fixed32 => 4,
            Tag::Fixed64 => 5,
            Tag::Float => 6,
            Tag::Double => 7,
            Tag::String => 8,
            Tag::Bytes => 9,
        }
    }

    pub fn length_class(self) -> LengthClass {
        match self {
            Tag::Boolean => LengthClass::Fixed(1),
            Tag::UInt64 | Tag::SInt64 => LengthClass::Sdnv,
            Tag::Fixed16 | Tag::Float => LengthClass::Fixed(2),
            Tag::Fixed32 | Tag::Double => LengthClass::Fixed(4),
            Tag::Fixed64 => LengthClass::Fixed(8),
            Tag::String | Tag::Bytes => LengthClass::Prefixed,
        }
    }
}

/// A primitive field together with its value.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Boolean(bool),
    UInt64(u64),
    SInt64(i64),
    Fixed16(u16),
    Fixed32(u32),
    Fixed64(u64),
    Float([u8; 2]),
    Double([u8; 4]),
    String(String),
    Bytes(Bytes),
}

impl Value {
    pub fn tag(&self) -> Tag {
        match self {
            Value::Boolean(_) => Tag::Boolean,
            Value::UInt64(_) => Tag::UInt64,
            Value::SInt64(_) => Tag::SInt64,
            Value::Fixed16(_) => Tag::Fixed16,
            Value::Fixed32(_) => Tag::Fixed32,
            Value::Fixed64(_) => Tag::Fixed64,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::String(_) => Tag::String,
            Value::Bytes(_) => Tag::Bytes,
        }
    }

    /// Exact octet count [`Value::write`] will produce, tag included.
    pub fn encoded_len(&self) -> usize {
        let body = match (self, self.tag().length_class()) {
            (Value::UInt64(v), LengthClass::Sdnv) => sdnv::encoded_len(*v),
            (Value::SInt64(v), LengthClass::Sdnv) => sdnv::encoded_len(*v as u64),
            (Value::String(v), LengthClass::Prefixed) => sdnv::prefixed_len(v.len()),
            (Value::Bytes(v), LengthClass::Prefixed) => sdnv::prefixed_len(v.len()),
            (_, LengthClass::Fixed(n)) => n,
            // Sdnv and Prefixed classes are fully enumerated above.
            _ => 0,
        };
        1 + body
    }

    /// Emit the tag octet and the body, reporting the octet count.
    pub fn write(&self, buf: &mut Vec<u8>) -> usize {
        buf.push(self.tag().as_u8());
        let body = match self {
            Value::Boolean(v) => {
                buf.push(u8::from(*v));
                1
            }
            Value::UInt64(v) => sdnv::write(buf, *v),
            Value::SInt64(v) => sdnv::write(buf, *v as u64),
            Value::Fixed16(v) => {
                buf.extend_from_slice(&v.to_be_bytes());
                2
            }
            Value::Fixed32(v) => {
                buf.extend_from_slice(&v.to_be_bytes());
                4
            }
            Value::Fixed64(v) => {
                buf.extend_from_slice(&v.to_be_bytes());
                8
            }
            Value::Float(v) => {
                buf.extend_from_slice(v);
                2
            }
            Value::Double(v) => {
                buf.extend_from_slice(v);
                4
            }
            Value::String(v) => sdnv::write_prefixed(buf, v.as_bytes()),
            Value::Bytes(v) => sdnv::write_prefixed(buf, v),
        };
        1 + body
    }

    /// Read one field that must carry `expected`.  A different tag is
    /// `UnexpectedTag`; short input is `Truncated`.
    pub fn read(expected: Tag, rdr: &mut Reader<'_>) -> Result<Value, ParseError> {
        let at = rdr.pos();
        let got = rdr.u8()?;
        if got != expected.as_u8() {
            return Err(ParseError::UnexpectedTag {
                expected: expected.as_u8(),
                got,
                at,
            });
        }
        Ok(match expected {
            Tag::Boolean => Value::Boolean(rdr.u8()? != 0),
            Tag::UInt64 => Value::UInt64(sdnv::read(rdr)?),
            Tag::SInt64 => Value::SInt64(sdnv::read(rdr)? as i64),
            Tag::Fixed16 => Value::Fixed16(u16::from_be_bytes(rdr.array()?)),
            Tag::Fixed32 => Value::Fixed32(u32::from_be_bytes(rdr.array()?)),
            Tag::Fixed64 => Value::Fixed64(u64::from_be_bytes(rdr.array()?)),
            Tag::Float => Value::Float(rdr.array()?),
            Tag::Double => Value::Double(rdr.array()?),
            Tag::String => {
                let bytes = sdnv::read_prefixed(rdr, MAX_FIELD_LEN)?;
                Value::String(String::from_utf8_lossy(bytes).into_owned())
            }
            Tag::Bytes => {
                let bytes = sdnv::read_prefixed(rdr, MAX_FIELD_LEN)?;
                Value::Bytes(Bytes::copy_from_slice(bytes))
            }
        })
    }
}

/// Typed readers for the shapes the service parameters use.  `Value::read`
/// constructs the variant matching its tag, so the fallthrough arms are
/// dead.
macro_rules! typed_reader {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub(crate) fn $name(rdr: &mut Reader<'_>) -> Result<$ty, ParseError> {
            match Value::read(Tag::$variant, rdr)? {
                Value::$variant(v) => Ok(v),
                _ => unreachable!(),
            }
        }
    };
}

typed_reader!(read_bool, Boolean, bool);
typed_reader!(read_u64, UInt64, u64);
typed_reader!(read_u16, Fixed16, u16);
typed_reader!(read_u32, Fixed32, u32);
typed_reader!(read_string, String, String);
typed_reader!(read_byte_string, Bytes, Bytes);
