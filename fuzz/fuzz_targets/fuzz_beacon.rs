#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((beacon, _)) = ipnd::DiscoveryBeacon::deserialize(data) {
        // Whatever parsed must also serialize.
        let _ = beacon.to_bytes();
    }
});
