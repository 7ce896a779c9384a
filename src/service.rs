/*! One service entry inside a beacon.

Draft 02 frames a service as `[tag:1][body_len:SDNV][body]`, where the tag
is one of the constructed codes below and the body is the parameter's TLV
sequence.  Drafts 00/01 frame it as two length-prefixed strings instead:
the protocol's short tag (`"tcpcl"`, `"dgram:udp"`, ...) followed by the
parameter string.

The draft-02 parser always consumes the declared body, whether or not the
body parses: the body is cut out of the input before the parameter factory
runs, so a failure inside it leaves the outer reader at the start of the
next entry and the beacon parser can carry on.
*/

use crate::error::{Error, ParseError};
use crate::param::ServiceParam;
use crate::protocol::ClProtocol;
use crate::rdr::Reader;
use crate::sdnv;
use crate::version::Version;
use crate::MAX_FIELD_LEN;

/// Constructed type code of a service entry under draft 02.
///
/// The codes below 128 come from the draft itself; the rest live in the
/// private-use range.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ServiceTag {
    /// TCP over IPv4, code 64.
    TcpV4,
    /// UDP over IPv4, code 65.
    UdpV4,
    /// TCP over IPv6, code 66.
    TcpV6,
    /// UDP over IPv6, code 67.
    UdpV6,
    /// Datagram CL over UDP, code 187.
    DgramUdp,
    /// Datagram CL over Ethernet, code 188.
    DgramEthernet,
    /// Datagram CL over LoWPAN, code 189.
    DgramLowpan,
    /// LoWPAN CL, code 190.
    Lowpan,
    /// E-mail CL, code 191.
    Email,
    /// DHT name service, code 192.
    Dht,
    /// DTNTP time sync, code 193.
    Dtntp,
    /// A code this codec does not know.  The entry it frames is skipped.
    Unknown(u8),
}

impl From<u8> for ServiceTag {
    fn from(code: u8) -> ServiceTag {
        match code {
            64 => ServiceTag::TcpV4,
            65 => ServiceTag::UdpV4,
            66 => ServiceTag::TcpV6,
            67 => ServiceTag::UdpV6,
            187 => ServiceTag::DgramUdp,
            188 => ServiceTag::DgramEthernet,
            189 => ServiceTag::DgramLowpan,
            190 => ServiceTag::Lowpan,
            191 => ServiceTag::Email,
            192 => ServiceTag::Dht,
            193 => ServiceTag::Dtntp,
            n => ServiceTag::Unknown(n),
        }
    }
}

impl ServiceTag {
    pub fn as_u8(self) -> u8 {
        match self {
            ServiceTag::TcpV4 => 64,
            ServiceTag::UdpV4 => 65,
            ServiceTag::TcpV6 => 66,
            ServiceTag::UdpV6 => 67,
            ServiceTag::DgramUdp => 187,
            ServiceTag::DgramEthernet => 188,
            ServiceTag::DgramLowpan => 189,
            ServiceTag::Lowpan => 190,
            ServiceTag::Email => 191,
            ServiceTag::Dht => 192,
            ServiceTag::Dtntp => 193,
            ServiceTag::Unknown(n) => n,
        }
    }

    /// The convergence-layer protocol a tag implies, if any.
    pub fn protocol(self) -> Option<ClProtocol> {
        Some(match self {
            ServiceTag::TcpV4 | ServiceTag::TcpV6 => ClProtocol::TcpIp,
            ServiceTag::UdpV4 | ServiceTag::UdpV6 => ClProtocol::UdpIp,
            ServiceTag::DgramUdp => ClProtocol::DgramUdp,
            ServiceTag::DgramEthernet => ClProtocol::DgramEthernet,
            ServiceTag::DgramLowpan => ClProtocol::DgramLowpan,
            ServiceTag::Lowpan => ClProtocol::Lowpan,
            ServiceTag::Email => ClProtocol::Email,
            ServiceTag::Dht => ClProtocol::Dht,
            ServiceTag::Dtntp => ClProtocol::Dtntp,
            ServiceTag::Unknown(_) => return None,
        })
    }
}

/// One advertised service: a convergence-layer protocol, its short name
/// and its parameter.
#[derive(Clone, PartialEq, Debug)]
pub struct DiscoveryService {
    protocol: ClProtocol,
    name: String,
    param: ServiceParam,
}

impl DiscoveryService {
    /// The name is derived from the protocol, so both stay consistent.
    pub fn new(protocol: ClProtocol, param: ServiceParam) -> DiscoveryService {
        DiscoveryService {
            protocol,
            name: protocol.as_tag().to_owned(),
            param,
        }
    }

    pub fn protocol(&self) -> ClProtocol {
        self.protocol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self) -> &ServiceParam {
        &self.param
    }

    /// Replace the parameter, keeping protocol and name.
    pub fn update(&mut self, param: ServiceParam) {
        self.param = param;
    }

    /// Exact octet count of the whole entry under `version`.
    pub fn encoded_len(&self, version: Version) -> Result<usize, Error> {
        match version {
            Version::Draft02 => {
                let body = self.param.encoded_len(version)?;
                Ok(1 + sdnv::encoded_len(body as u64) + body)
            }
            Version::Draft00 | Version::Draft01 => {
                Ok(sdnv::prefixed_len(self.name.len()) + self.param.encoded_len(version)?)
            }
            v => Err(Error::WrongVersion { got: v.as_u8() }),
        }
    }

    /// Write the whole entry and report the octet count.
    pub fn serialize(&self, version: Version, buf: &mut Vec<u8>) -> Result<usize, Error> {
        match version {
            Version::Draft02 => {
                let tag = self.param.service_tag(self.protocol)?;
                let mut body = Vec::new();
                self.param.serialize(version, &mut body)?;
                buf.push(tag.as_u8());
                let n = sdnv::write(buf, body.len() as u64);
                buf.extend_from_slice(&body);
                Ok(1 + n + body.len())
            }
            Version::Draft00 | Version::Draft01 => {
                let mut n = sdnv::write_prefixed(buf, self.name.as_bytes());
                n += self.param.serialize(version, buf)?;
                Ok(n)
            }
            v => Err(Error::WrongVersion { got: v.as_u8() }),
        }
    }

    /// Parse one entry.
    ///
    /// On `UnknownService` and `LengthMismatch` the reader has been
    /// advanced past the entry; the caller can continue with the next one.
    pub fn deserialize(version: Version, rdr: &mut Reader<'_>) -> Result<DiscoveryService, Error> {
        match version {
            Version::Draft02 => {
                let tag_byte = rdr.u8()?;
                let declared = sdnv::read(rdr)?;
                if declared > MAX_FIELD_LEN as u64 {
                    return Err(ParseError::Oversize {
                        len: declared,
                        cap: MAX_FIELD_LEN,
                    }
                    .into());
                }
                let declared = declared as usize;
                let tag = ServiceTag::from(tag_byte);
                match tag.protocol() {
                    None => {
                        let skipped = rdr.skip(declared);
                        if skipped < declared {
                            return Err(ParseError::Truncated { at: rdr.pos() }.into());
                        }
                        Err(ParseError::UnknownService {
                            tag: tag_byte,
                            skipped: declared,
                        }
                        .into())
                    }
                    Some(protocol) => {
                        let body = rdr.take(declared)?;
                        let mut body_rdr = Reader::new(body);
                        let param = ServiceParam::deserialize_v02(tag, declared, &mut body_rdr)?;
                        Ok(DiscoveryService {
                            protocol,
                            name: protocol.as_tag().to_owned(),
                            param,
                        })
                    }
                }
            }
            Version::Draft00 | Version::Draft01 => {
                let name_bytes = sdnv::read_prefixed(rdr, MAX_FIELD_LEN)?;
                let name = String::from_utf8_lossy(name_bytes).into_owned();
                let protocol = ClProtocol::from_tag(&name);
                let kv_bytes = sdnv::read_prefixed(rdr, MAX_FIELD_LEN)?;
                let kv = String::from_utf8_lossy(kv_bytes).into_owned();
                let param = match protocol {
                    ClProtocol::DgramUdp | ClProtocol::DgramEthernet | ClProtocol::DgramLowpan => {
                        ServiceParam::Datagram(crate::param::DatagramParam::new(kv))
                    }
                    ClProtocol::Dht => {
                        ServiceParam::Dht(crate::param::DhtParam::from_kv(&kv)?)
                    }
                    _ => ServiceParam::from_kv(&kv)?,
                };
                Ok(DiscoveryService {
                    protocol,
                    name,
                    param,
                })
            }
            v => Err(Error::WrongVersion { got: v.as_u8() }),
        }
    }
}
