//! Property tests over the public API: round-tripping, length agreement,
//! key-order independence and resynchronization after garbage entries.

use ipnd::{
    ClProtocol, DatagramParam, DhtParam, DiscoveryBeacon, DiscoveryService, DtntpParam, EmailParam,
    IpParam, LowpanParam, ServiceParam, Version,
};
use proptest::prelude::*;

fn arb_version() -> impl Strategy<Value = Version> {
    prop_oneof![
        Just(Version::Draft00),
        Just(Version::Draft01),
        Just(Version::Draft02),
    ]
}

/// A parameter together with a protocol it can legally be advertised under.
fn arb_service() -> impl Strategy<Value = DiscoveryService> {
    let ip = (
        prop_oneof![Just(ClProtocol::TcpIp), Just(ClProtocol::UdpIp)],
        prop_oneof![
            any::<[u8; 4]>().prop_map(|a| std::net::Ipv4Addr::from(a).to_string()),
            any::<[u8; 16]>().prop_map(|a| std::net::Ipv6Addr::from(a).to_string()),
        ],
        any::<u16>(),
    )
        .prop_map(|(proto, addr, port)| {
            DiscoveryService::new(proto, ServiceParam::Ip(IpParam::new(addr, port)))
        });

    let lowpan = (any::<u16>(), any::<u16>()).prop_map(|(pan, port)| {
        DiscoveryService::new(
            ClProtocol::Lowpan,
            ServiceParam::Lowpan(LowpanParam::new(pan, port)),
        )
    });

    let dgram = (
        prop_oneof![
            Just(ClProtocol::DgramUdp),
            Just(ClProtocol::DgramEthernet),
            Just(ClProtocol::DgramLowpan),
        ],
        "[a-z0-9:.]{1,20}",
    )
        .prop_map(|(proto, addr)| {
            DiscoveryService::new(proto, ServiceParam::Datagram(DatagramParam::new(addr)))
        });

    let email = "[a-z]{1,10}@[a-z]{1,10}\\.[a-z]{2,3}".prop_map(|addr| {
        DiscoveryService::new(ClProtocol::Email, ServiceParam::Email(EmailParam::new(addr)))
    });

    let dht = (1u16.., any::<bool>()).prop_map(|(port, proxy)| {
        DiscoveryService::new(ClProtocol::Dht, ServiceParam::Dht(DhtParam::new(port, proxy)))
    });

    // Quality is generated in hundredths so its textual form stays short;
    // equality tolerates far more than that anyway.
    let dtntp = (any::<u32>(), 0u32..1_000_000, any::<u64>()).prop_map(|(version, q, ts)| {
        DiscoveryService::new(
            ClProtocol::Dtntp,
            ServiceParam::Dtntp(DtntpParam::new(version, f64::from(q) / 100.0, ts)),
        )
    });

    prop_oneof![ip, lowpan, dgram, email, dht, dtntp]
}

fn arb_beacon() -> impl Strategy<Value = DiscoveryBeacon> {
    (
        arb_version(),
        "dtn://[a-z]{1,12}\\.dtn",
        any::<u16>(),
        proptest::option::of(any::<u16>()),
        proptest::collection::vec(arb_service(), 0..6),
    )
        .prop_map(|(version, eid, sequence, period, services)| {
            let mut beacon = DiscoveryBeacon::new(version, eid);
            beacon.set_sequence(sequence);
            if version == Version::Draft02 {
                beacon.set_period(period);
            }
            for service in services {
                beacon.add_service(service);
            }
            beacon
        })
}

proptest! {
    /// Whatever the codec serializes, it parses back to an equal tree.
    #[test]
    fn beacon_roundtrip(beacon in arb_beacon()) {
        let bytes = beacon.to_bytes().unwrap();
        let (parsed, consumed) = DiscoveryBeacon::deserialize(&bytes).unwrap();
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(parsed, beacon);
    }

    /// The length query agrees byte-for-byte with serialization, at
    /// every level of the tree.
    #[test]
    fn length_agreement(service in arb_service(), version in arb_version()) {
        let mut buf = Vec::new();
        let n = service.param().serialize(version, &mut buf).unwrap();
        prop_assert_eq!(n, buf.len());
        prop_assert_eq!(n, service.param().encoded_len(version).unwrap());

        let mut buf = Vec::new();
        let n = service.serialize(version, &mut buf).unwrap();
        prop_assert_eq!(n, buf.len());
        prop_assert_eq!(n, service.encoded_len(version).unwrap());
    }

    /// The order of key=value pairs does not affect what drafts 00/01
    /// parse into.
    #[test]
    fn key_order_independence(service in arb_service(), seed in any::<u64>()) {
        let kv = service.param().param_string();
        let mut pairs: Vec<&str> = kv.split(';').filter(|p| !p.is_empty()).collect();
        if pairs.len() < 2 {
            return Ok(());
        }
        // A cheap deterministic shuffle.
        let rot = (seed as usize) % pairs.len();
        pairs.rotate_left(rot);
        let shuffled = pairs.join(";");

        let mut buf = Vec::new();
        ipnd::sdnv::write_prefixed(&mut buf, service.name().as_bytes());
        ipnd::sdnv::write_prefixed(&mut buf, shuffled.as_bytes());
        let mut rdr = ipnd::rdr::Reader::new(&buf);
        let parsed = DiscoveryService::deserialize(Version::Draft00, &mut rdr).unwrap();
        prop_assert_eq!(parsed.param(), service.param());
    }

    /// An unknown-tag entry of any declared length is skipped exactly,
    /// and the services around it survive.
    #[test]
    fn recoverability(
        garbage in proptest::collection::vec(any::<u8>(), 0..64),
        tag in 128u8..187,
    ) {
        let mut beacon = DiscoveryBeacon::new(Version::Draft02, "dtn://survivor.dtn");
        beacon.add_service(DiscoveryService::new(
            ClProtocol::TcpIp,
            ServiceParam::Ip(IpParam::new("198.51.100.23", 225)),
        ));
        beacon.add_service(DiscoveryService::new(
            ClProtocol::Dht,
            ServiceParam::Dht(DhtParam::new(2553, false)),
        ));
        let good = beacon.to_bytes().unwrap();

        let svc1 = beacon.services()[0].encoded_len(Version::Draft02).unwrap();
        let svc2 = beacon.services()[1].encoded_len(Version::Draft02).unwrap();
        let count_at = good.len() - svc2 - svc1 - 1;

        let mut spliced = good[..count_at].to_vec();
        spliced.push(3);
        spliced.extend_from_slice(&good[count_at + 1..count_at + 1 + svc1]);
        let entry_start = spliced.len();
        spliced.push(tag);
        ipnd::sdnv::write(&mut spliced, garbage.len() as u64);
        spliced.extend_from_slice(&garbage);
        let entry_len = spliced.len() - entry_start;
        spliced.extend_from_slice(&good[count_at + 1 + svc1..]);

        let (parsed, consumed) = DiscoveryBeacon::deserialize(&spliced).unwrap();
        prop_assert_eq!(consumed, spliced.len());
        prop_assert_eq!(parsed.services(), beacon.services());
        // The skipped entry is its tag, its length field and its body.
        prop_assert_eq!(
            entry_len,
            1 + ipnd::sdnv::encoded_len(garbage.len() as u64) + garbage.len()
        );
    }

    /// Arbitrary input never panics, whatever it decodes to.
    #[test]
    fn deserialize_never_panics(input in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = DiscoveryBeacon::deserialize(&input);
    }
}
