#![no_main]

use libfuzzer_sys::fuzz_target;
use lexy::frontend::lexer;
use lexy::{LexyParser, ParserOptions};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the tokenizer line by line
        for line in s.lines() {
            let _ = lexer::tokenize(line);
        }
        // Then the whole pipeline; errors are collected, never raised
        let lines: Vec<&str> = s.lines().collect();
        let parser = LexyParser::new(ParserOptions::new().with_suppress_exceptions(true));
        let _ = parser.parse(&lines, "fuzz.lexy");
    }
});
