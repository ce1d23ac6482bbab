#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use objcat::NamePattern;

#[derive(Arbitrary, Debug)]
struct PatternFuzzInput {
    pattern: String,
    names: Vec<String>,
}

fuzz_target!(|input: PatternFuzzInput| {
    // Compiling and matching arbitrary patterns must never panic
    let pattern = NamePattern::parse(&input.pattern);

    for name in &input.names {
        let _ = pattern.matches(name);
    }

    // A wildcard-free pattern is an exact match for its own text
    if !input.pattern.contains('*') {
        assert!(pattern.matches(&input.pattern));
        assert!(!pattern.is_wildcard());
    }
});
