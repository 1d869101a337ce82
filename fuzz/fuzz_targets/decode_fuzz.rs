#![no_main]
use libfuzzer_sys::fuzz_target;
use magicblock::{CipherKey, decode_all};

fuzz_target!(|data: &[u8]| {
    // Fuzz the decoder with arbitrary bytes.
    // The decoder must never panic, only return errors.
    let key = CipherKey::new([0x42; 32], [0x24; 16]);
    if let Ok(out) = decode_all(data, Some(&key)) {
        // A successful decode always honours the declared length.
        let declared = u32::from_le_bytes([data[16], data[17], data[18], data[19]]);
        assert_eq!(out.len(), declared as usize);
    }

    // Without a key, cipher modes must fail cleanly.
    let _ = decode_all(data, None);
});
