/*!

A codec for IP Neighbor Discovery (IPND) beacons, the link-local datagrams a
DTN daemon broadcasts to advertise itself to its neighbors.  A beacon names
the node's endpoint identifier, a sequence number, optionally the
advertisement period, and the list of convergence layers the node speaks,
each with its parameters ("TCP on 198.51.100.23:225", "DHT on 2553 without
proxy", ...).

Three revisions of the format are in the field and this codec speaks all of
them:

* **draft 00** (`0x01`) and **draft 01** (`0x02`) describe each service as
  two length-prefixed strings, a short protocol tag such as `"tcpcl"` and a
  textual `key=value` parameter list;
* **draft 02** (`0x04`) replaces the text with typed binary TLV entries
  under numeric service tags.

The same in-memory value tree serializes to any supported revision, and a
beacon parsed from one revision compares equal to the tree that produced
it.  Parsing is strict about byte accounting: when a service entry cannot
be understood, the error says how many octets were consumed, the input is
left at the next entry, and the beacon parser skips the garbage and keeps
the rest of the beacon.

This is a pure, synchronous byte transformation.  Sockets, timers, the
node database and the bundle protocol live elsewhere.

```
use ipnd::{ClProtocol, DiscoveryBeacon, DiscoveryService, IpParam, ServiceParam, Version};

let mut beacon = DiscoveryBeacon::new(Version::Draft02, "dtn://node.dtn");
beacon.set_sequence(42);
beacon.add_service(DiscoveryService::new(
    ClProtocol::TcpIp,
    ServiceParam::Ip(IpParam::new("198.51.100.23", 225)),
));

let bytes = beacon.to_bytes().unwrap();
let (parsed, consumed) = DiscoveryBeacon::deserialize(&bytes).unwrap();
assert_eq!(consumed, bytes.len());
assert_eq!(parsed, beacon);
```

*/

pub mod beacon;
pub mod error;
pub mod param;
pub mod protocol;
pub mod rdr;
pub mod sdnv;
pub mod service;
pub mod tlv;
pub mod version;

pub use crate::beacon::{BeaconFlags, DiscoveryBeacon};
pub use crate::error::{Error, ParseError};
pub use crate::param::{
    DatagramParam, DhtParam, DtntpParam, EmailParam, IpParam, LowpanParam, ServiceParam,
};
pub use crate::protocol::ClProtocol;
pub use crate::service::{DiscoveryService, ServiceTag};
pub use crate::version::Version;

/// Ceiling applied to any SDNV that is about to be used as a length, before
/// anything is allocated.  A beacon travels in a single UDP datagram, so
/// nothing legitimate comes close.
pub const MAX_FIELD_LEN: usize = 64 * 1024;
