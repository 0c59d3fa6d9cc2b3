#![no_main]

use libfuzzer_sys::fuzz_target;
use passport_personhood::StateSnapshot;

// Decoding untrusted snapshot bytes must fail cleanly, never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(snapshot) = StateSnapshot::decode(data) {
        // Whatever decoded must encode again.
        assert!(snapshot.encode().is_ok());
    }
});
