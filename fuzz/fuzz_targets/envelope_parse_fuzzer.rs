//! Fuzz target for [`Envelope`] JSON parsing
//!
//! # Invariants
//!
//! - NEVER panic on arbitrary input
//! - An accepted envelope carries exactly one of iv/nonce
//! - Accepted envelopes re-serialize and re-parse to the same value

#![no_main]

use libfuzzer_sys::fuzz_target;
use selkie_codec::Envelope;

fuzz_target!(|data: &str| {
    if let Ok(envelope) = Envelope::from_json(data) {
        assert!(
            envelope.iv().is_some() ^ envelope.nonce().is_some(),
            "envelope must belong to exactly one scheme"
        );

        let json = envelope.to_json().expect("accepted envelope must re-serialize");
        let reparsed = Envelope::from_json(&json).expect("canonical form must re-parse");
        assert_eq!(envelope, reparsed);
    }
});
