//! Protocol revisions of the discovery format.

/// The revision a beacon announces in its first octet.
///
/// The bit patterns matter: they go on the wire as-is.  Only the three
/// draft revisions can be serialized or parsed; `Legacy` and `Unspecified`
/// exist so callers can name what they saw in a foreign datagram.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Version {
    /// Legacy DTND discovery, `0x00`.
    Legacy,
    /// IPND draft 00, `0x01`.
    Draft00,
    /// IPND draft 01, `0x02`.
    Draft01,
    /// IPND draft 02, `0x04`.
    Draft02,
    /// No discovery protocol specified, `0xFF`.
    Unspecified,
}

impl Version {
    pub fn from_u8(version: u8) -> Option<Version> {
        Some(match version {
            0x00 => Version::Legacy,
            0x01 => Version::Draft00,
            0x02 => Version::Draft01,
            0x04 => Version::Draft02,
            0xff => Version::Unspecified,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Version::Legacy => 0x00,
            Version::Draft00 => 0x01,
            Version::Draft01 => 0x02,
            Version::Draft02 => 0x04,
            Version::Unspecified => 0xff,
        }
    }

    /// Whether the codec implements this revision.
    pub fn is_supported(self) -> bool {
        matches!(self, Version::Draft00 | Version::Draft01 | Version::Draft02)
    }
}
