// Magic-block wire format.
//
// - `header`: fixed 24-byte header, `Mode` wire values, layout constants

pub mod header;

pub use header::{HEADER_SIZE, Header, LZMA_PROPS_SIZE, MAGIC, Mode, VERSION, parse_header};
