#![no_main]
use libfuzzer_sys::fuzz_target;
use magicblock::{CipherKey, MagicBlock, Mode, decode_all};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks mode and level; the rest is the payload.
    let control = data[0];
    let payload = &data[1..];
    let mode = Mode::ALL[control as usize % Mode::ALL.len()];
    let level = (control as u32 >> 3) % 10;

    let key = CipherKey::new([control; 32], [!control; 16]);
    let block = MagicBlock::encode(payload, mode, level, Some(&key)).unwrap();
    assert_eq!(block.as_bytes().len() as u64, block.header().total_len());

    let decoded = decode_all(block.as_bytes(), Some(&key)).unwrap();
    assert_eq!(decoded, payload);
});
