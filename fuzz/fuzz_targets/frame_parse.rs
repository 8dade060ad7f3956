//! Fuzz target for ParsedFrame::parse
//!
//! This fuzzer feeds arbitrary byte sequences to the frame parser to find:
//! - Parser crashes or panics
//! - Out-of-bounds slicing in the length-dispatched decoders
//! - Special-frame detection confusing normal envelopes
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use maps_proto::ParsedFrame;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either parse or fail cleanly, never panic.
    let _ = ParsedFrame::parse(data);
});
