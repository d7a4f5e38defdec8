//! yEnc decoding for compressed overview bodies
//!
//! Some servers frame the compressed XZVER payload as a yEnc block. The
//! decoder is lenient: it only needs `size` on the
//! `=ybegin` line and treats a CRC32 mismatch as a warning.
//!
//! Reference: http://www.yenc.org/yenc-draft.1.3.txt

pub mod decode;
pub mod encode;
mod params;
pub mod types;

pub use decode::decode;
pub use encode::encode;
pub use types::{YencDecoded, YencEnd, YencHeader};
