use crate::error::Error;
use crate::rdr::Reader;
use crate::sdnv;
use crate::tlv::{read_string, read_u64, Value};

/// Time-sync advertisement of the DTNTP service: protocol version, clock
/// quality and the current timestamp.
///
/// The quality travels as text in every draft so that no assumption about
/// float endianness or width leaks onto the wire.  Rust's default float
/// formatting always uses `.` as the decimal separator, which is the same
/// guarantee the C locale gives.
#[derive(Clone, Debug)]
pub struct DtntpParam {
    version: u32,
    quality: f64,
    timestamp: u64,
}

impl DtntpParam {
    pub fn new(version: u32, quality: f64, timestamp: u64) -> DtntpParam {
        DtntpParam {
            version,
            quality,
            timestamp,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn quality_string(&self) -> String {
        format!("{}", self.quality)
    }

    pub(crate) fn encoded_len_v02(&self) -> usize {
        1 + sdnv::encoded_len(u64::from(self.version))
            + 1
            + sdnv::prefixed_len(self.quality_string().len())
            + 1
            + sdnv::encoded_len(self.timestamp)
    }

    pub(crate) fn write_v02(&self, buf: &mut Vec<u8>) -> usize {
        Value::UInt64(u64::from(self.version)).write(buf)
            + Value::String(self.quality_string()).write(buf)
            + Value::UInt64(self.timestamp).write(buf)
    }

    pub(crate) fn read_v02(rdr: &mut Reader<'_>) -> Result<DtntpParam, Error> {
        let version = read_u64(rdr)?;
        let version = u32::try_from(version).map_err(|_| Error::IllegalService {
            reason: format!("DTNTP version {version} does not fit in 32 bits"),
        })?;
        let quality = read_string(rdr)?;
        let quality = quality.parse().map_err(|_| Error::IllegalService {
            reason: format!("bad DTNTP quality {quality:?}"),
        })?;
        let timestamp = read_u64(rdr)?;
        Ok(DtntpParam {
            version,
            quality,
            timestamp,
        })
    }

    pub(crate) fn param_string(&self) -> String {
        format!(
            "version={};quality={};timestamp={};",
            self.version,
            self.quality_string(),
            self.timestamp
        )
    }
}

/// Quality compares with an absolute tolerance of 1e-4 so that a value
/// which round-tripped through its string form still matches the original.
impl PartialEq for DtntpParam {
    fn eq(&self, other: &DtntpParam) -> bool {
        self.version == other.version
            && self.timestamp == other.timestamp
            && (self.quality - other.quality).abs() < 1e-4
    }
}
