#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Fuzz the shard parser with arbitrary strings.
    // Parsing must never panic; accepted input must survive a
    // serialize-then-reparse round trip.
    if let Ok(records) = dxi::index::parse_shard_source(data) {
        let rendered = dxi::index::writer::serialize_shard(&records);
        let reparsed = dxi::index::parse_shard_source(&rendered)
            .expect("serialized shard failed to reparse");
        assert_eq!(records, reparsed);
    }
});
