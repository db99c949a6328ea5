#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|line: &str| {
    // Tokenization must never panic, and every token must come out
    // case-normalized: class markers upper, words lower.
    for token in latc::utils::tokenize(line) {
        assert!(!token.is_empty());
        if token.starts_with('!') {
            assert_eq!(token, token.to_uppercase());
        } else {
            assert_eq!(token, token.to_lowercase());
        }
    }
});
