use crate::error::Error;
use crate::rdr::Reader;
use crate::tlv::{read_u16, Value};

/// PAN identifier and port of a 6LoWPAN convergence layer.
///
/// Drafts 00/01 cannot tell this apart from an IP service on the wire; the
/// factory recognizes it by the short numeric `ip` value instead.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LowpanParam {
    address: u16,
    port: u16,
}

impl LowpanParam {
    pub fn new(address: u16, port: u16) -> LowpanParam {
        LowpanParam { address, port }
    }

    /// The 16-bit PAN identifier.
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub(crate) const BODY_LEN: usize = 1 + 2 + 1 + 2;

    pub(crate) fn write_v02(&self, buf: &mut Vec<u8>) -> usize {
        Value::Fixed16(self.address).write(buf) + Value::Fixed16(self.port).write(buf)
    }

    pub(crate) fn read_v02(rdr: &mut Reader<'_>) -> Result<LowpanParam, Error> {
        let address = read_u16(rdr)?;
        let port = read_u16(rdr)?;
        Ok(LowpanParam { address, port })
    }

    pub(crate) fn param_string(&self) -> String {
        format!("port={};ip={}", self.port, self.address)
    }
}
