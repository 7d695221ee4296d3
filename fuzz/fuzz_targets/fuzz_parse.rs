#![no_main]

use libfuzzer_sys::fuzz_target;
use nd_core::Severity;
use nd_parser::parse;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let parsed = parse(input);

    assert!(!parsed.diagnostics.is_empty());
    let successes = parsed
        .diagnostics
        .iter()
        .filter(|diag| diag.severity == Severity::Success)
        .count();
    assert!(successes == 0 || parsed.diagnostics.len() == 1);
    assert!(parsed.net.integrity_violations().is_empty());
});
