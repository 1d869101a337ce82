#![no_main]
use libfuzzer_sys::fuzz_target;
use magicblock::format::{HEADER_SIZE, Header, parse_header};

fuzz_target!(|data: &[u8]| {
    let peeked = Header::peek(data);

    if let Ok(header) = parse_header(data) {
        // Full validation implies the prefix check and exact size accounting.
        assert_eq!(peeked.ok(), Some(header));
        assert_eq!(header.total_len(), data.len() as u64);
        assert_eq!(&header.to_bytes()[..], &data[..HEADER_SIZE]);
        assert!(header.payload_range().end <= data.len());
    }
});
