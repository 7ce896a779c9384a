/*! Service parameters: the seven concrete shapes a service entry can carry.

Every parameter knows three encodings:

* its draft-02 body, a sequence of primitive TLV fields;
* its draft-00/01 body, a single length-prefixed `key=value` string;
* its exact encoded length under either representation.

Two factory paths construct parameters when parsing.  Under draft 02 the
outer service tag selects the variant directly.  Under drafts 00/01 the
variant is inferred from which keys the parameter string contains, checked
in a fixed order: `email` wins outright, then the DTNTP triple, then a
short numeric address makes a LoWPAN service, then any `port` makes an IP
service.  Datagram and DHT services never take the inference path; the
service parser dispatches on their protocol name and calls the variant's
own grammar.
*/

mod dgram;
mod dht;
mod dtntp;
mod email;
mod ip;
mod lowpan;

pub use self::dgram::DatagramParam;
pub use self::dht::DhtParam;
pub use self::dtntp::DtntpParam;
pub use self::email::EmailParam;
pub use self::ip::IpParam;
pub use self::lowpan::LowpanParam;

use crate::error::{Error, ParseError};
use crate::protocol::ClProtocol;
use crate::rdr::Reader;
use crate::sdnv;
use crate::service::ServiceTag;
use crate::version::Version;

/// One service parameter of any shape.
#[derive(Clone, PartialEq, Debug)]
pub enum ServiceParam {
    Ip(IpParam),
    Lowpan(LowpanParam),
    Datagram(DatagramParam),
    Email(EmailParam),
    Dht(DhtParam),
    Dtntp(DtntpParam),
}

impl ServiceParam {
    /// The draft-02 service tag this parameter is framed under.  For IP
    /// parameters the tag depends on address family and transport; for
    /// datagram parameters on which datagram flavor `protocol` names.
    pub fn service_tag(&self, protocol: ClProtocol) -> Result<ServiceTag, Error> {
        match self {
            ServiceParam::Ip(p) => p.service_tag(protocol),
            ServiceParam::Lowpan(_) => Ok(ServiceTag::Lowpan),
            ServiceParam::Datagram(_) => match protocol {
                ClProtocol::DgramUdp => Ok(ServiceTag::DgramUdp),
                ClProtocol::DgramEthernet => Ok(ServiceTag::DgramEthernet),
                ClProtocol::DgramLowpan => Ok(ServiceTag::DgramLowpan),
                _ => Err(Error::IllegalService {
                    reason: format!("no datagram service tag for {protocol:?}"),
                }),
            },
            ServiceParam::Email(_) => Ok(ServiceTag::Email),
            ServiceParam::Dht(_) => Ok(ServiceTag::Dht),
            ServiceParam::Dtntp(_) => Ok(ServiceTag::Dtntp),
        }
    }

    /// Exact octet count of the parameter body under `version`, excluding
    /// the tag and length the service frame adds around it.
    pub fn encoded_len(&self, version: Version) -> Result<usize, Error> {
        match version {
            Version::Draft02 => match self {
                ServiceParam::Ip(p) => p.encoded_len_v02(),
                ServiceParam::Lowpan(_) => Ok(LowpanParam::BODY_LEN),
                ServiceParam::Datagram(p) => Ok(p.encoded_len_v02()),
                ServiceParam::Email(p) => Ok(p.encoded_len_v02()),
                ServiceParam::Dht(_) => Ok(DhtParam::BODY_LEN),
                ServiceParam::Dtntp(p) => Ok(p.encoded_len_v02()),
            },
            Version::Draft00 | Version::Draft01 => {
                Ok(sdnv::prefixed_len(self.nonempty_param_string()?.len()))
            }
            v => Err(Error::WrongVersion { got: v.as_u8() }),
        }
    }

    /// Write the parameter body and report the octet count.
    pub fn serialize(&self, version: Version, buf: &mut Vec<u8>) -> Result<usize, Error> {
        match version {
            Version::Draft02 => match self {
                ServiceParam::Ip(p) => p.write_v02(buf),
                ServiceParam::Lowpan(p) => Ok(p.write_v02(buf)),
                ServiceParam::Datagram(p) => Ok(p.write_v02(buf)),
                ServiceParam::Email(p) => Ok(p.write_v02(buf)),
                ServiceParam::Dht(p) => Ok(p.write_v02(buf)),
                ServiceParam::Dtntp(p) => Ok(p.write_v02(buf)),
            },
            Version::Draft00 | Version::Draft01 => {
                let kv = self.nonempty_param_string()?;
                Ok(sdnv::write_prefixed(buf, kv.as_bytes()))
            }
            v => Err(Error::WrongVersion { got: v.as_u8() }),
        }
    }

    /// The draft-00/01 parameter string, whatever its grammar.
    pub fn param_string(&self) -> String {
        match self {
            ServiceParam::Ip(p) => p.param_string(),
            ServiceParam::Lowpan(p) => p.param_string(),
            ServiceParam::Datagram(p) => p.param_string(),
            ServiceParam::Email(p) => p.param_string(),
            ServiceParam::Dht(p) => p.param_string(),
            ServiceParam::Dtntp(p) => p.param_string(),
        }
    }

    fn nonempty_param_string(&self) -> Result<String, Error> {
        let kv = self.param_string();
        if kv.is_empty() {
            return Err(Error::IllegalService {
                reason: "empty parameter string".into(),
            });
        }
        Ok(kv)
    }

    /// Draft-02 factory: select and parse the variant the service tag
    /// names.  `declared` is the body length announced by the service
    /// frame; for the IP tags it must match the v4 or v6 layout exactly.
    pub(crate) fn deserialize_v02(
        tag: ServiceTag,
        declared: usize,
        rdr: &mut Reader<'_>,
    ) -> Result<ServiceParam, Error> {
        match tag {
            ServiceTag::TcpV4 | ServiceTag::UdpV4 => {
                if declared != ip::V4_BODY_LEN {
                    return Err(ParseError::LengthMismatch {
                        tag: tag.as_u8(),
                        declared,
                    }
                    .into());
                }
                Ok(ServiceParam::Ip(IpParam::read_v02(rdr, false)?))
            }
            ServiceTag::TcpV6 | ServiceTag::UdpV6 => {
                if declared != ip::V6_BODY_LEN {
                    return Err(ParseError::LengthMismatch {
                        tag: tag.as_u8(),
                        declared,
                    }
                    .into());
                }
                Ok(ServiceParam::Ip(IpParam::read_v02(rdr, true)?))
            }
            ServiceTag::DgramUdp | ServiceTag::DgramEthernet | ServiceTag::DgramLowpan => {
                Ok(ServiceParam::Datagram(DatagramParam::read_v02(rdr)?))
            }
            ServiceTag::Lowpan => Ok(ServiceParam::Lowpan(LowpanParam::read_v02(rdr)?)),
            ServiceTag::Email => Ok(ServiceParam::Email(EmailParam::read_v02(rdr)?)),
            ServiceTag::Dht => Ok(ServiceParam::Dht(DhtParam::read_v02(rdr)?)),
            ServiceTag::Dtntp => Ok(ServiceParam::Dtntp(DtntpParam::read_v02(rdr)?)),
            ServiceTag::Unknown(tag) => Err(ParseError::UnknownService {
                tag,
                skipped: declared,
            }
            .into()),
        }
    }

    /// Draft-00/01 factory: infer the variant from the keys present in a
    /// free-form `key=value` string.
    pub(crate) fn from_kv(params: &str) -> Result<ServiceParam, Error> {
        let mut address: Option<&str> = None;
        let mut port: Option<u16> = None;
        let mut version: Option<u32> = None;
        let mut quality: Option<f64> = None;
        let mut timestamp: Option<u64> = None;

        let bad_value = |key: &str, value: &str| Error::IllegalService {
            reason: format!("could not parse {key}={value}"),
        };

        for (key, value) in split_kv(params) {
            match key {
                "email" => return Ok(ServiceParam::Email(EmailParam::new(value))),
                "port" => port = Some(value.parse().map_err(|_| bad_value(key, value))?),
                "ip" => {
                    let dotted = value.contains('.');
                    let colon = value.contains(':');
                    if (dotted && value.len() > 15)
                        || (colon && value.len() > 39)
                        || (!dotted && !colon && value.len() > 5)
                    {
                        return Err(Error::IllegalService {
                            reason: format!("could not parse address {value:?}"),
                        });
                    }
                    address = Some(value);
                }
                "version" => version = Some(value.parse().map_err(|_| bad_value(key, value))?),
                "quality" => quality = Some(value.parse().map_err(|_| bad_value(key, value))?),
                "timestamp" => timestamp = Some(value.parse().map_err(|_| bad_value(key, value))?),
                _ => {}
            }
        }

        if let (Some(version), Some(quality), Some(timestamp)) = (version, quality, timestamp) {
            return Ok(ServiceParam::Dtntp(DtntpParam::new(
                version, quality, timestamp,
            )));
        }
        if let (Some(port), Some(address)) = (port, address) {
            // Drafts 00/01 cannot tell LoWPAN from IP on the wire; a short
            // address that parses as a PAN id is the former.  "::1" is
            // short too, so the parse check decides, not the length alone.
            if address.len() <= 5 {
                if let Ok(pan) = address.parse() {
                    return Ok(ServiceParam::Lowpan(LowpanParam::new(pan, port)));
                }
            }
        }
        if let Some(port) = port {
            return Ok(ServiceParam::Ip(IpParam::new(
                address.unwrap_or_default(),
                port,
            )));
        }
        Err(Error::IllegalService {
            reason: format!("cannot interpret parameter string {params:?}"),
        })
    }
}

/// Split a `key=value;key=value` string into pairs.  Pairs without a value
/// are dropped, the way the original tokenizer ignored them.
pub(crate) fn split_kv(s: &str) -> impl Iterator<Item = (&str, &str)> {
    s.split(';').filter_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (!value.is_empty()).then_some((key, value))
    })
}

/// `"true"` and `"1"` are true; every other string is false.
pub(crate) fn parse_bool(s: &str) -> bool {
    matches!(s, "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_inference_order() {
        // An email key wins over everything else.
        assert!(matches!(
            ServiceParam::from_kv("port=80;email=a@b.c").unwrap(),
            ServiceParam::Email(_)
        ));
        // The full DTNTP triple beats the port rules.
        assert!(matches!(
            ServiceParam::from_kv("version=1;quality=15.63;timestamp=1410492227;").unwrap(),
            ServiceParam::Dtntp(_)
        ));
        // A short numeric address with a port is LoWPAN.
        assert!(matches!(
            ServiceParam::from_kv("port=1337;ip=3749").unwrap(),
            ServiceParam::Lowpan(_)
        ));
        // A short address that is not a PAN id stays an IP service.
        assert!(matches!(
            ServiceParam::from_kv("port=80;ip=::1").unwrap(),
            ServiceParam::Ip(_)
        ));
        // A port alone is an IP service with an empty address.
        let param = ServiceParam::from_kv("port=8080").unwrap();
        match &param {
            ServiceParam::Ip(ip) => {
                assert_eq!(ip.address(), "");
                assert_eq!(ip.port(), 8080);
            }
            other => panic!("expected an IP param, got {other:?}"),
        }
        // Nothing recognizable.
        assert!(ServiceParam::from_kv("flavor=vanilla").is_err());
        assert!(ServiceParam::from_kv("").is_err());
    }

    #[test]
    fn kv_is_order_independent() {
        let a = ServiceParam::from_kv("port=225;ip=198.51.100.23").unwrap();
        let b = ServiceParam::from_kv("ip=198.51.100.23;port=225").unwrap();
        assert_eq!(a, b);

        let a = ServiceParam::from_kv("version=1;quality=0.5;timestamp=7").unwrap();
        let b = ServiceParam::from_kv("timestamp=7;version=1;quality=0.5").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn kv_rejects_oversized_addresses() {
        assert!(ServiceParam::from_kv("port=80;ip=1.2.3.4.5.6.7.8").is_err());
        assert!(ServiceParam::from_kv("port=80;ip=abcdef").is_err());
        let long_v6 = format!("port=80;ip={}", "a:".repeat(20));
        assert!(ServiceParam::from_kv(&long_v6).is_err());
    }

    #[test]
    fn kv_ignores_valueless_pairs() {
        let param = ServiceParam::from_kv("ip=;port=80;junk").unwrap();
        assert!(matches!(param, ServiceParam::Ip(_)));
    }

    #[test]
    fn tag_dispatch_is_sound() {
        // For every known tag, parsing a well-formed body and asking the
        // result for its tag under the matching protocol returns the tag
        // the factory dispatched on.
        let cases: [(ServiceTag, ClProtocol, Vec<u8>); 11] = [
            (ServiceTag::TcpV4, ClProtocol::TcpIp, ip_v4_body()),
            (ServiceTag::UdpV4, ClProtocol::UdpIp, ip_v4_body()),
            (ServiceTag::TcpV6, ClProtocol::TcpIp, ip_v6_body()),
            (ServiceTag::UdpV6, ClProtocol::UdpIp, ip_v6_body()),
            (ServiceTag::DgramUdp, ClProtocol::DgramUdp, dgram_body()),
            (ServiceTag::DgramEthernet, ClProtocol::DgramEthernet, dgram_body()),
            (ServiceTag::DgramLowpan, ClProtocol::DgramLowpan, dgram_body()),
            (ServiceTag::Lowpan, ClProtocol::Lowpan, lowpan_body()),
            (ServiceTag::Email, ClProtocol::Email, email_body()),
            (ServiceTag::Dht, ClProtocol::Dht, dht_body()),
            (ServiceTag::Dtntp, ClProtocol::Dtntp, dtntp_body()),
        ];
        for (tag, protocol, body) in cases {
            let mut rdr = Reader::new(&body);
            let param = ServiceParam::deserialize_v02(tag, body.len(), &mut rdr).unwrap();
            assert_eq!(param.service_tag(protocol).unwrap(), tag);
        }
    }

    #[test]
    fn ip_length_must_match_a_layout() {
        let body = ip_v4_body();
        let mut rdr = Reader::new(&body);
        let err = ServiceParam::deserialize_v02(ServiceTag::TcpV4, 9, &mut rdr).unwrap_err();
        assert_eq!(
            err,
            Error::Parse(ParseError::LengthMismatch {
                tag: 64,
                declared: 9
            })
        );

        let body = ip_v6_body();
        let mut rdr = Reader::new(&body);
        assert!(ServiceParam::deserialize_v02(ServiceTag::UdpV6, 8, &mut rdr).is_err());
    }

    #[test]
    fn unknown_tag_reports_skip() {
        let mut rdr = Reader::new(&[]);
        let err = ServiceParam::deserialize_v02(ServiceTag::Unknown(0x7f), 5, &mut rdr).unwrap_err();
        assert_eq!(
            err,
            Error::Parse(ParseError::UnknownService {
                tag: 0x7f,
                skipped: 5
            })
        );
    }

    fn ip_v4_body() -> Vec<u8> {
        let mut buf = Vec::new();
        IpParam::new("10.0.0.1", 80).write_v02(&mut buf).unwrap();
        buf
    }

    fn ip_v6_body() -> Vec<u8> {
        let mut buf = Vec::new();
        IpParam::new("::1", 80).write_v02(&mut buf).unwrap();
        buf
    }

    fn dgram_body() -> Vec<u8> {
        let mut buf = Vec::new();
        DatagramParam::new("lladdr").write_v02(&mut buf);
        buf
    }

    fn lowpan_body() -> Vec<u8> {
        let mut buf = Vec::new();
        LowpanParam::new(1, 2).write_v02(&mut buf);
        buf
    }

    fn email_body() -> Vec<u8> {
        let mut buf = Vec::new();
        EmailParam::new("a@b.c").write_v02(&mut buf);
        buf
    }

    fn dht_body() -> Vec<u8> {
        let mut buf = Vec::new();
        DhtParam::new(1, true).write_v02(&mut buf);
        buf
    }

    fn dtntp_body() -> Vec<u8> {
        let mut buf = Vec::new();
        DtntpParam::new(1, 0.5, 7).write_v02(&mut buf);
        buf
    }
}
