#![no_main]

use cmdpal_core::command_score;
use libfuzzer_sys::fuzz_target;

const MAX_LEN: usize = 96;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut parts = text.splitn(3, '\u{0}');
    let value: String = parts.next().unwrap_or_default().chars().take(MAX_LEN).collect();
    let search: String = parts.next().unwrap_or_default().chars().take(MAX_LEN).collect();
    let keywords: Vec<String> = parts
        .next()
        .map(|rest| rest.split(',').take(4).map(str::to_owned).collect())
        .unwrap_or_default();

    let score = command_score(&value, &search, &keywords);
    assert!((0.0..=1.0).contains(&score), "score {score} out of range");
    if search.is_empty() {
        assert!(score > 0.0);
    }
});
