//! Self-Delimiting Numeric Values (SDNVs) and length-prefixed byte strings.
//!
//! An SDNV encodes a non-negative integer as a sequence of 7-bit groups,
//! most significant group first, with the top bit of every octet except the
//! last set as a continuation marker (RFC 6256).  IPND uses SDNVs both as
//! integers in their own right and as the length prefix of strings and
//! opaque byte fields.

use crate::error::ParseError;
use crate::rdr::Reader;

/// Number of octets [`write`] will emit for `value`.  Between 1 and 10.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    usize::max(1, (bits + 6) / 7)
}

/// Append the SDNV encoding of `value` and report the octet count.
pub fn write(buf: &mut Vec<u8>, value: u64) -> usize {
    let n = encoded_len(value);
    for i in (0..n).rev() {
        let group = ((value >> (7 * i)) & 0x7f) as u8;
        buf.push(if i == 0 { group } else { group | 0x80 });
    }
    n
}

/// Decode one SDNV.  Rejects encodings that carry more than 64 bits of
/// payload, however they are padded.
pub fn read(rdr: &mut Reader<'_>) -> Result<u64, ParseError> {
    let start = rdr.pos();
    let mut value: u64 = 0;
    loop {
        let octet = rdr.u8()?;
        if value >> 57 != 0 {
            return Err(ParseError::SdnvOverflow { at: start });
        }
        value = (value << 7) | u64::from(octet & 0x7f);
        if octet & 0x80 == 0 {
            return Ok(value);
        }
    }
}

/// Octets taken by a length-prefixed field holding `len` bytes.
pub fn prefixed_len(len: usize) -> usize {
    encoded_len(len as u64) + len
}

/// Append an SDNV length followed by the raw bytes.
pub fn write_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) -> usize {
    let n = write(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
    n + bytes.len()
}

/// Read a length-prefixed field, refusing lengths above `cap` before any
/// allocation happens.
pub fn read_prefixed<'a>(rdr: &mut Reader<'a>, cap: usize) -> Result<&'a [u8], ParseError> {
    let len = read(rdr)?;
    if len > cap as u64 {
        return Err(ParseError::Oversize { len, cap });
    }
    rdr.take(len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        let n = write(&mut buf, value);
        assert_eq!(n, buf.len());
        assert_eq!(n, encoded_len(value));
        let mut rdr = Reader::new(&buf);
        assert_eq!(read(&mut rdr).unwrap(), value);
        assert!(rdr.is_empty());
        buf
    }

    #[test]
    fn known_vectors() {
        assert_eq!(roundtrip(0), [0x00]);
        assert_eq!(roundtrip(127), [0x7f]);
        assert_eq!(roundtrip(128), [0x81, 0x00]);
        assert_eq!(roundtrip(1337), [0x8a, 0x39]);
        assert_eq!(roundtrip(1410492227), [0x85, 0xa0, 0xc9, 0xce, 0x43]);
        assert_eq!(roundtrip(u64::MAX).len(), 10);
    }

    #[test]
    fn rejects_wide_encodings() {
        // Eleven octets of continuation is more than 64 bits of payload.
        let buf = [0xff; 11];
        let mut rdr = Reader::new(&buf);
        assert_eq!(read(&mut rdr), Err(ParseError::SdnvOverflow { at: 0 }));
    }

    #[test]
    fn truncated_mid_value() {
        let mut rdr = Reader::new(&[0x85, 0xa0]);
        assert_eq!(read(&mut rdr), Err(ParseError::Truncated { at: 2 }));
    }

    #[test]
    fn prefixed_roundtrip() {
        let mut buf = Vec::new();
        let n = write_prefixed(&mut buf, b"tcpcl");
        assert_eq!(n, 6);
        assert_eq!(n, prefixed_len(5));
        assert_eq!(buf, b"\x05tcpcl");
        let mut rdr = Reader::new(&buf);
        assert_eq!(read_prefixed(&mut rdr, 64).unwrap(), b"tcpcl");
    }

    #[test]
    fn prefixed_respects_cap() {
        let mut buf = Vec::new();
        write(&mut buf, 1 << 20);
        let mut rdr = Reader::new(&buf);
        assert_eq!(
            read_prefixed(&mut rdr, 1024),
            Err(ParseError::Oversize {
                len: 1 << 20,
                cap: 1024
            })
        );
    }
}
