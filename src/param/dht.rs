use crate::error::Error;
use crate::param::{parse_bool, split_kv};
use crate::rdr::Reader;
use crate::tlv::{read_bool, read_u16, Value};

/// Listening port and proxy mode of the DHT name service.
///
/// The proxy flag defaults to true; drafts 00/01 only put `proxy=false` on
/// the wire, and omit the port key when the port is zero.  A parameter with
/// port zero and the default proxy mode therefore has an empty draft-00/01
/// body, which is not a legal service entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DhtParam {
    port: u16,
    proxy: bool,
}

impl DhtParam {
    pub fn new(port: u16, proxy: bool) -> DhtParam {
        DhtParam { port, proxy }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn proxy(&self) -> bool {
        self.proxy
    }

    pub(crate) const BODY_LEN: usize = 1 + 2 + 1 + 1;

    pub(crate) fn write_v02(&self, buf: &mut Vec<u8>) -> usize {
        Value::Fixed16(self.port).write(buf) + Value::Boolean(self.proxy).write(buf)
    }

    pub(crate) fn read_v02(rdr: &mut Reader<'_>) -> Result<DhtParam, Error> {
        let port = read_u16(rdr)?;
        let proxy = read_bool(rdr)?;
        Ok(DhtParam { port, proxy })
    }

    pub(crate) fn param_string(&self) -> String {
        let mut kv = String::new();
        if self.port != 0 {
            kv.push_str(&format!("port={};", self.port));
        }
        if !self.proxy {
            kv.push_str("proxy=false");
        }
        kv
    }

    /// Parse a draft 00/01 body.  Unlike the generic key inference, the DHT
    /// grammar is handled by the variant itself.
    pub(crate) fn from_kv(kv: &str) -> Result<DhtParam, Error> {
        let mut port = 0u16;
        let mut proxy = true;
        for (key, value) in split_kv(kv) {
            match key {
                "port" => {
                    port = value.parse().map_err(|_| Error::IllegalService {
                        reason: format!("bad DHT port {value:?}"),
                    })?;
                }
                "proxy" => proxy = parse_bool(value),
                _ => {}
            }
        }
        if port == 0 {
            return Err(Error::IllegalService {
                reason: format!("cannot interpret DHT parameter string {kv:?}"),
            });
        }
        Ok(DhtParam { port, proxy })
    }
}
