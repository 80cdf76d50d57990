#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Key decoding must never panic, and every encoded name must decode
    // back to its ASCII-lowercased form.
    let _ = dxi::utils::decode_key(data);

    let key = dxi::utils::encode_key(data);
    let decoded = dxi::utils::decode_key(&key).expect("encoded key failed to decode");
    assert_eq!(decoded, data.to_ascii_lowercase());

    // Slug decoding is lenient and must accept anything
    let _ = dxi::utils::decode_slug(data);
});
