/*! The discovery beacon: one datagram advertising a node and its services.

Wire layout, fields in order:

```text
[version:1][flags:1]
[eid: SDNV length + bytes]      if CONTAINS_EID
[sequence: u16 BE]
[period: u16 BE]                draft 02 only, if CONTAINS_PERIOD
service list                    if SERVICE_BLOCK
```

Under draft 02 the service list is an SDNV count followed by that many
entries; under drafts 00/01 the entries simply run to the end of the
datagram.  The flags octet is derived from the beacon's contents when
serializing, so it can never disagree with what follows it.

A malformed service entry does not poison the beacon.  When an entry fails
with `UnknownService` or `LengthMismatch` the parser logs the skip and
continues with the next entry; anything else (truncation, a primitive tag
mismatch inside a known body) is surfaced to the caller.

The neighborhood bloom filter some implementations append after the
service list is outside this codec's scope: its flag bit is never set on
serialize, and on parse the trailing octets are left unconsumed.
*/

use crate::error::{Error, ParseError};
use crate::rdr::Reader;
use crate::sdnv;
use crate::service::DiscoveryService;
use crate::version::Version;
use crate::MAX_FIELD_LEN;
use bitflags::bitflags;
use tracing::*;

bitflags! {
    /// Flag bits in the second octet of every beacon.
    pub struct BeaconFlags: u8 {
        const CONTAINS_EID = 0x01;
        const SERVICE_BLOCK = 0x02;
        const BLOOM_FILTER = 0x04;
        const CONTAINS_PERIOD = 0x08;
    }
}

/// A discovery beacon.
#[derive(Clone, PartialEq, Debug)]
pub struct DiscoveryBeacon {
    version: Version,
    eid: String,
    sequence: u16,
    period: Option<u16>,
    services: Vec<DiscoveryService>,
}

impl DiscoveryBeacon {
    pub fn new(version: Version, eid: impl Into<String>) -> DiscoveryBeacon {
        DiscoveryBeacon {
            version,
            eid: eid.into(),
            sequence: 0,
            period: None,
            services: Vec::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// The endpoint identifier of the advertising node.
    pub fn eid(&self) -> &str {
        &self.eid
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: u16) {
        self.sequence = sequence;
    }

    /// The advertisement interval in seconds, if announced.  Only carried
    /// on the wire by draft 02.
    pub fn period(&self) -> Option<u16> {
        self.period
    }

    pub fn set_period(&mut self, period: Option<u16>) {
        self.period = period;
    }

    pub fn services(&self) -> &[DiscoveryService] {
        &self.services
    }

    pub fn add_service(&mut self, service: DiscoveryService) {
        self.services.push(service);
    }

    /// The flags octet this beacon serializes with.  Derived from content.
    pub fn flags(&self) -> BeaconFlags {
        let mut flags = BeaconFlags::empty();
        if !self.eid.is_empty() {
            flags |= BeaconFlags::CONTAINS_EID;
        }
        if !self.services.is_empty() {
            flags |= BeaconFlags::SERVICE_BLOCK;
        }
        if self.period.is_some() && self.version == Version::Draft02 {
            flags |= BeaconFlags::CONTAINS_PERIOD;
        }
        flags
    }

    /// Exact octet count [`DiscoveryBeacon::serialize`] will produce.
    pub fn encoded_len(&self) -> Result<usize, Error> {
        if !self.version.is_supported() {
            return Err(Error::WrongVersion {
                got: self.version.as_u8(),
            });
        }
        let flags = self.flags();
        let mut n = 2 + 2; // version, flags, sequence
        if flags.contains(BeaconFlags::CONTAINS_EID) {
            n += sdnv::prefixed_len(self.eid.len());
        }
        if flags.contains(BeaconFlags::CONTAINS_PERIOD) {
            n += 2;
        }
        if flags.contains(BeaconFlags::SERVICE_BLOCK) {
            if self.version == Version::Draft02 {
                n += sdnv::encoded_len(self.services.len() as u64);
            }
            for service in &self.services {
                n += service.encoded_len(self.version)?;
            }
        }
        Ok(n)
    }

    /// Write the beacon and report the octet count.  On error the sink is
    /// restored to its previous length.
    pub fn serialize(&self, buf: &mut Vec<u8>) -> Result<usize, Error> {
        let start = buf.len();
        self.serialize_inner(buf).map_err(|e| {
            buf.truncate(start);
            e
        })
    }

    /// The beacon as a fresh byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        self.serialize(&mut buf)?;
        Ok(buf)
    }

    fn serialize_inner(&self, buf: &mut Vec<u8>) -> Result<usize, Error> {
        if !self.version.is_supported() {
            return Err(Error::WrongVersion {
                got: self.version.as_u8(),
            });
        }
        let flags = self.flags();
        buf.push(self.version.as_u8());
        buf.push(flags.bits());
        let mut n = 2;
        if flags.contains(BeaconFlags::CONTAINS_EID) {
            n += sdnv::write_prefixed(buf, self.eid.as_bytes());
        }
        buf.extend_from_slice(&self.sequence.to_be_bytes());
        n += 2;
        if flags.contains(BeaconFlags::CONTAINS_PERIOD) {
            if let Some(period) = self.period {
                buf.extend_from_slice(&period.to_be_bytes());
                n += 2;
            }
        }
        if flags.contains(BeaconFlags::SERVICE_BLOCK) {
            if self.version == Version::Draft02 {
                n += sdnv::write(buf, self.services.len() as u64);
            }
            for service in &self.services {
                n += service.serialize(self.version, buf)?;
            }
        }
        Ok(n)
    }

    /// Parse a beacon from the front of `input`.
    ///
    /// Returns the beacon and the number of octets consumed.  Octets after
    /// the service list (for example a neighborhood bloom filter) are left
    /// unconsumed.
    pub fn deserialize(input: &[u8]) -> Result<(DiscoveryBeacon, usize), Error> {
        let mut rdr = Reader::new(input);

        let version_byte = rdr.u8()?;
        let version = Version::from_u8(version_byte)
            .filter(|v| v.is_supported())
            .ok_or(Error::WrongVersion { got: version_byte })?;

        let flags_byte = rdr.u8()?;
        let flags = match BeaconFlags::from_bits(flags_byte) {
            Some(flags) => flags,
            None => {
                warn!("beacon advertises unknown flag bits in {flags_byte:#04x}; ignoring them");
                BeaconFlags::from_bits_truncate(flags_byte)
            }
        };

        let eid = if flags.contains(BeaconFlags::CONTAINS_EID) {
            String::from_utf8_lossy(sdnv::read_prefixed(&mut rdr, MAX_FIELD_LEN)?).into_owned()
        } else {
            String::new()
        };

        let sequence = rdr.u16()?;

        let period = if version == Version::Draft02 && flags.contains(BeaconFlags::CONTAINS_PERIOD)
        {
            Some(rdr.u16()?)
        } else {
            None
        };

        let mut services = Vec::new();
        if flags.contains(BeaconFlags::SERVICE_BLOCK) {
            match version {
                Version::Draft02 => {
                    let count = sdnv::read(&mut rdr)?;
                    for _ in 0..count {
                        Self::parse_service(version, &mut rdr, &mut services)?;
                    }
                }
                _ => {
                    while !rdr.is_empty() {
                        Self::parse_service(version, &mut rdr, &mut services)?;
                    }
                }
            }
        }

        if rdr.remaining() > 0 {
            if flags.contains(BeaconFlags::BLOOM_FILTER) {
                trace!(
                    "leaving {} octets of bloom filter unconsumed",
                    rdr.remaining()
                );
            } else {
                warn!("beacon has {} octets after the service list", rdr.remaining());
            }
        }

        let beacon = DiscoveryBeacon {
            version,
            eid,
            sequence,
            period,
            services,
        };
        Ok((beacon, rdr.pos()))
    }

    /// Parse one service entry, skipping it if it is recoverable garbage.
    fn parse_service(
        version: Version,
        rdr: &mut Reader<'_>,
        services: &mut Vec<DiscoveryService>,
    ) -> Result<(), Error> {
        match DiscoveryService::deserialize(version, rdr) {
            Ok(service) => services.push(service),
            Err(Error::Parse(ParseError::UnknownService { tag, skipped })) => {
                warn!("skipping service with unknown tag {tag:#04x} ({skipped} bytes)");
            }
            Err(Error::Parse(ParseError::LengthMismatch { tag, declared })) => {
                warn!("skipping malformed service with tag {tag:#04x} ({declared} bytes)");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
