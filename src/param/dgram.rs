use crate::error::Error;
use crate::rdr::Reader;
use crate::tlv::{read_string, Value};

/// Link-layer address of a datagram convergence layer (UDP, Ethernet or
/// LoWPAN framing).  The body is the address string alone; drafts 00/01
/// carry it raw, without a `key=` prefix.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DatagramParam {
    address: String,
}

impl DatagramParam {
    pub fn new(address: impl Into<String>) -> DatagramParam {
        DatagramParam {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub(crate) fn encoded_len_v02(&self) -> usize {
        Value::String(self.address.clone()).encoded_len()
    }

    pub(crate) fn write_v02(&self, buf: &mut Vec<u8>) -> usize {
        Value::String(self.address.clone()).write(buf)
    }

    pub(crate) fn read_v02(rdr: &mut Reader<'_>) -> Result<DatagramParam, Error> {
        Ok(DatagramParam {
            address: read_string(rdr)?,
        })
    }

    pub(crate) fn param_string(&self) -> String {
        self.address.clone()
    }
}
