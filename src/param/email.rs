use crate::error::Error;
use crate::rdr::Reader;
use crate::tlv::{read_string, Value};

/// Mailbox of the e-mail convergence layer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EmailParam {
    address: String,
}

impl EmailParam {
    pub fn new(address: impl Into<String>) -> EmailParam {
        EmailParam {
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

    pub(crate) fn read_v02(rdr: &mut Reader<'_>) -> Result<EmailParam, Error> {
        Ok(EmailParam {
            address: read_string(rdr)?,
        })
    }

    pub(crate) fn param_string(&self) -> String {
        format!("email={}", self.address)
    }
}
