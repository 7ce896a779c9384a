use crate::error::{Error, ParseError};
use crate::protocol::ClProtocol;
use crate::rdr::Reader;
use crate::service::ServiceTag;
use crate::tlv::{read_byte_string, read_u16, read_u32, Tag, Value};
use bytes::Bytes;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Address and port of a TCP or UDP convergence layer.
///
/// The address is held in its string form, the way it arrives from
/// configuration or off the wire.  Which draft-02 layout applies is decided
/// by shape: a dotted address of at most 15 characters is IPv4, a colon
/// address of at most 39 characters is IPv6.
#[derive(Clone, Debug)]
pub struct IpParam {
    address: String,
    port: u16,
}

/// Draft-02 body octets of the IPv4 layout: FIXED32 address + FIXED16 port.
pub(crate) const V4_BODY_LEN: usize = 1 + 4 + 1 + 2;
/// Draft-02 body octets of the IPv6 layout: BYTES(16) address + FIXED16 port.
pub(crate) const V6_BODY_LEN: usize = 1 + 1 + 16 + 1 + 2;

impl IpParam {
    pub fn new(address: impl Into<String>, port: u16) -> IpParam {
        IpParam {
            address: address.into(),
            port,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_ipv4(&self) -> bool {
        self.address.contains('.') && self.address.len() <= 15
    }

    pub fn is_ipv6(&self) -> bool {
        self.address.contains(':') && self.address.len() <= 39
    }

    pub(crate) fn service_tag(&self, protocol: ClProtocol) -> Result<ServiceTag, Error> {
        match (self.is_ipv4(), self.is_ipv6(), protocol) {
            (true, _, ClProtocol::TcpIp) => Ok(ServiceTag::TcpV4),
            (true, _, ClProtocol::UdpIp) => Ok(ServiceTag::UdpV4),
            (_, true, ClProtocol::TcpIp) => Ok(ServiceTag::TcpV6),
            (_, true, ClProtocol::UdpIp) => Ok(ServiceTag::UdpV6),
            _ => Err(Error::IllegalService {
                reason: format!(
                    "no service tag for address {:?} over {:?}",
                    self.address, protocol
                ),
            }),
        }
    }

    pub(crate) fn encoded_len_v02(&self) -> Result<usize, Error> {
        if self.is_ipv4() {
            Ok(V4_BODY_LEN)
        } else if self.is_ipv6() {
            Ok(V6_BODY_LEN)
        } else {
            Err(self.bad_address())
        }
    }

    pub(crate) fn write_v02(&self, buf: &mut Vec<u8>) -> Result<usize, Error> {
        let mut n = if self.is_ipv4() {
            let addr: Ipv4Addr = self.address.parse().map_err(|_| self.bad_address())?;
            Value::Fixed32(u32::from(addr)).write(buf)
        } else if self.is_ipv6() {
            let addr: Ipv6Addr = self.address.parse().map_err(|_| self.bad_address())?;
            Value::Bytes(Bytes::copy_from_slice(&addr.octets())).write(buf)
        } else {
            return Err(self.bad_address());
        };
        n += Value::Fixed16(self.port).write(buf);
        Ok(n)
    }

    /// Parse a draft-02 body.  The caller passes the address family implied
    /// by the outer service tag.
    pub(crate) fn read_v02(rdr: &mut Reader<'_>, v6: bool) -> Result<IpParam, Error> {
        let address = if v6 {
            let bytes = read_byte_string(rdr)?;
            let octets: [u8; 16] = bytes.as_ref().try_into().map_err(|_| {
                ParseError::LengthMismatch {
                    tag: Tag::Bytes.as_u8(),
                    declared: bytes.len(),
                }
            })?;
            Ipv6Addr::from(octets).to_string()
        } else {
            Ipv4Addr::from(read_u32(rdr)?).to_string()
        };
        let port = read_u16(rdr)?;
        Ok(IpParam { address, port })
    }

    /// Draft 00/01 `key=value` body.
    pub(crate) fn param_string(&self) -> String {
        let mut kv = format!("port={}", self.port);
        if !self.address.is_empty() {
            kv.push_str(";ip=");
            kv.push_str(&self.address);
        }
        kv
    }

    fn bad_address(&self) -> Error {
        Error::IllegalService {
            reason: format!("address {:?} is neither IPv4 nor IPv6", self.address),
        }
    }
}

/// Addresses compare by parsed value, so `"::1"` equals
/// `"0:0:0:0:0:0:0:1"`.  Unparseable addresses of the same family compare
/// unequal; addresses of no family at all fall back to string comparison.
impl PartialEq for IpParam {
    fn eq(&self, other: &IpParam) -> bool {
        if self.port != other.port {
            return false;
        }
        if self.is_ipv4() {
            match (
                self.address.parse::<Ipv4Addr>(),
                other.address.parse::<Ipv4Addr>(),
            ) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
        } else if self.is_ipv6() {
            match (
                self.address.parse::<Ipv6Addr>(),
                other.address.parse::<Ipv6Addr>(),
            ) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
        } else {
            self.address == other.address
        }
    }
}
