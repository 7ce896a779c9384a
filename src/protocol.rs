//! Convergence-layer protocols and their short string tags.
//!
//! Drafts 00 and 01 name a service by one of these strings on the wire;
//! draft 02 derives the same protocol from the numeric service tag instead.

/// A transport binding a node can advertise.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClProtocol {
    Undefined,
    UdpIp,
    TcpIp,
    Lowpan,
    Bluetooth,
    Http,
    File,
    DgramUdp,
    DgramEthernet,
    DgramLowpan,
    P2pWifi,
    P2pBt,
    Email,
    Dht,
    Dtntp,
    /// A protocol this node does not speak.  Unrecognized tag strings map
    /// here so the rest of a beacon still parses.
    Unsupported,
}

impl ClProtocol {
    /// The short tag written into draft 00/01 service entries.
    pub fn as_tag(self) -> &'static str {
        match self {
            ClProtocol::Undefined => "undefined",
            ClProtocol::UdpIp => "udpcl",
            ClProtocol::TcpIp => "tcpcl",
            ClProtocol::Lowpan => "lowpancl",
            ClProtocol::Bluetooth => "bt",
            ClProtocol::Http => "http",
            ClProtocol::File => "file",
            ClProtocol::DgramUdp => "dgram:udp",
            ClProtocol::DgramEthernet => "dgram:eth",
            ClProtocol::DgramLowpan => "dgram:lowpan",
            ClProtocol::P2pWifi => "p2p:wifi",
            ClProtocol::P2pBt => "p2p:bt",
            ClProtocol::Email => "email",
            ClProtocol::Dht => "dhtns",
            ClProtocol::Dtntp => "dtntp",
            ClProtocol::Unsupported => "unsupported",
        }
    }

    pub fn from_tag(tag: &str) -> ClProtocol {
        match tag {
            "undefined" => ClProtocol::Undefined,
            "udpcl" => ClProtocol::UdpIp,
            "tcpcl" => ClProtocol::TcpIp,
            "lowpancl" => ClProtocol::Lowpan,
            "bt" => ClProtocol::Bluetooth,
            "http" => ClProtocol::Http,
            "file" => ClProtocol::File,
            "dgram:udp" => ClProtocol::DgramUdp,
            "dgram:eth" => ClProtocol::DgramEthernet,
            "dgram:lowpan" => ClProtocol::DgramLowpan,
            "p2p:wifi" => ClProtocol::P2pWifi,
            "p2p:bt" => ClProtocol::P2pBt,
            "email" => ClProtocol::Email,
            "dhtns" => ClProtocol::Dht,
            "dtntp" => ClProtocol::Dtntp,
            _ => ClProtocol::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ClProtocol; 16] = [
        ClProtocol::Undefined,
        ClProtocol::UdpIp,
        ClProtocol::TcpIp,
        ClProtocol::Lowpan,
        ClProtocol::Bluetooth,
        ClProtocol::Http,
        ClProtocol::File,
        ClProtocol::DgramUdp,
        ClProtocol::DgramEthernet,
        ClProtocol::DgramLowpan,
        ClProtocol::P2pWifi,
        ClProtocol::P2pBt,
        ClProtocol::Email,
        ClProtocol::Dht,
        ClProtocol::Dtntp,
        ClProtocol::Unsupported,
    ];

    #[test]
    fn tags_are_reversible() {
        for protocol in ALL {
            assert_eq!(ClProtocol::from_tag(protocol.as_tag()), protocol);
        }
    }

    #[test]
    fn unknown_tags_are_unsupported() {
        assert_eq!(ClProtocol::from_tag("unknown"), ClProtocol::Unsupported);
        assert_eq!(ClProtocol::from_tag("carrier-pigeon"), ClProtocol::Unsupported);
        assert_eq!(ClProtocol::from_tag(""), ClProtocol::Unsupported);
    }
}
