#![no_main]

use libfuzzer_sys::fuzz_target;
use objcat::engine::signature::{parse_call, parse_signature};

fuzz_target!(|input: &str| {
    // Parsing arbitrary input must never panic; it either yields a
    // structured reference or a syntax error
    if let Ok(sig) = parse_signature(input) {
        // Anything that parsed must re-render and re-parse to itself
        let rendered = sig.to_string();
        let reparsed = parse_signature(&rendered).expect("rendered signature must reparse");
        assert_eq!(reparsed, sig);
    }

    if let Ok(call) = parse_call(input) {
        // The selector carries one colon per parsed argument
        assert_eq!(call.selector.matches(':').count() == 0, call.args.is_empty());
    }
});
