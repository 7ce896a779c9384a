use thiserror::Error;

/// A field or frame could not be decoded.
///
/// Byte offsets are relative to the start of the frame currently being
/// parsed: a service body is parsed from its own sub-reader, so an offset
/// inside a parameter refers to the parameter body, not the whole datagram.
///
/// `UnknownService` and `LengthMismatch` are recoverable at the beacon
/// level; when they are returned, the input has already been advanced past
/// the offending entry and the caller may continue with the next one.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum ParseError {
    /// The input ended in the middle of a field.
    #[error("input ended at byte {at}, mid-field")]
    Truncated { at: usize },

    /// A primitive TLV carried a different tag than the field requires.
    #[error("expected tag {expected:#04x} at byte {at}, found {got:#04x}")]
    UnexpectedTag { expected: u8, got: u8, at: usize },

    /// A service entry carried a tag outside the known set.  The declared
    /// body has been skipped; `skipped` is its length.
    #[error("unknown service tag {tag:#04x}, skipped {skipped} bytes")]
    UnknownService { tag: u8, skipped: usize },

    /// A declared length disagrees with the layout the tag implies.
    #[error("service tag {tag:#04x} cannot have a body of {declared} bytes")]
    LengthMismatch { tag: u8, declared: usize },

    /// An SDNV kept its continuation bit set past 64 bits of payload.
    #[error("SDNV wider than 64 bits at byte {at}")]
    SdnvOverflow { at: usize },

    /// A length field exceeds the allocation ceiling.
    #[error("length {len} exceeds the {cap}-byte cap")]
    Oversize { len: u64, cap: usize },
}

/// Any error this crate can produce.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum Error {
    /// The requested (or received) protocol version is not one the codec
    /// implements.
    #[error("unspecified or unsupported discovery protocol version {got:#04x}")]
    WrongVersion { got: u8 },

    /// Semantically valid input described a forbidden combination, for
    /// example an IP parameter whose address is neither IPv4 nor IPv6.
    #[error("no such service, or illegal parameters for service: {reason}")]
    IllegalService { reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
