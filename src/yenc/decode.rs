use crc32fast::Hasher;
use tracing::warn;

use crate::{NntpError, Result};

use super::params::{parse_ybegin, parse_yend};
use super::types::YencDecoded;

/// Offset of the first line in `input[from..]` that starts with `marker`
fn find_line(input: &[u8], from: usize, marker: &[u8]) -> Option<usize> {
    let mut pos = from;
    while pos < input.len() {
        if input[pos..].starts_with(marker) {
            return Some(pos);
        }
        pos += input[pos..].iter().position(|&b| b == b'\n')? + 1;
    }
    None
}

/// End of the line starting at `start`, and the offset of the next line
fn line_bounds(input: &[u8], start: usize) -> (usize, usize) {
    match input[start..].iter().position(|&b| b == b'\n') {
        Some(i) => (start + i, start + i + 1),
        None => (input.len(), input.len()),
    }
}

fn line_str(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map(|s| s.trim_end_matches('\r'))
        .map_err(|_| NntpError::Encoding("Invalid UTF-8 in yEnc control line".to_string()))
}

/// Decode a yEnc block
///
/// Locates the `=ybegin` … `=yend` region anywhere in `input`, drops line
/// breaks and reverses the escape encoding. The decoded length must equal
/// the declared `size`. A CRC32 mismatch is only logged: servers that wrap
/// compressed overview data in yEnc do not compute it reliably.
///
/// # Example
/// ```
/// use nntp_engine::yenc;
///
/// let encoded = yenc::encode(b"Hello", "hello.txt", 128).unwrap();
/// let decoded = yenc::decode(&encoded).unwrap();
/// assert_eq!(decoded.data, b"Hello");
/// assert_eq!(decoded.header.name, "hello.txt");
/// ```
pub fn decode(input: &[u8]) -> Result<YencDecoded> {
    let begin = find_line(input, 0, b"=ybegin")
        .ok_or_else(|| NntpError::Encoding("Missing =ybegin header".to_string()))?;
    let (header_end, mut data_start) = line_bounds(input, begin);
    let header = parse_ybegin(line_str(&input[begin..header_end])?)?;

    // Multi-part posts carry a =ypart line that is not data
    if input[data_start..].starts_with(b"=ypart") {
        data_start = line_bounds(input, data_start).1;
    }

    let trailer_start = find_line(input, data_start, b"=yend")
        .ok_or_else(|| NntpError::Encoding("Missing =yend trailer".to_string()))?;
    let (trailer_end, _) = line_bounds(input, trailer_start);
    let trailer = parse_yend(line_str(&input[trailer_start..trailer_end])?)?;

    let mut data = Vec::with_capacity(trailer_start - data_start);
    decode_bytes(&input[data_start..trailer_start], &mut data)?;

    if data.len() as u64 != header.size {
        return Err(NntpError::Encoding(format!(
            "declared size does not match decoded size ({} != {})",
            header.size,
            data.len()
        )));
    }

    let mut hasher = Hasher::new();
    hasher.update(&data);
    let calculated_crc32 = hasher.finalize();

    let decoded = YencDecoded {
        header,
        trailer,
        data,
        calculated_crc32,
    };
    if decoded.crc32_matches() == Some(false) {
        warn!(
            "yEnc CRC32 mismatch for {:?}: calculated {:08x}",
            decoded.header.name, decoded.calculated_crc32
        );
    }

    Ok(decoded)
}

/// Decode yEnc data, ignoring line breaks
///
/// yEnc decoding: output = (input - 42) mod 256
/// Escape sequences: =X means (X - 64 - 42) mod 256
fn decode_bytes(encoded: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut bytes = encoded.iter().copied().filter(|&b| b != b'\r' && b != b'\n');

    while let Some(byte) = bytes.next() {
        if byte == b'=' {
            let escaped = bytes.next().ok_or_else(|| {
                NntpError::Encoding("Incomplete escape sequence at end of data".to_string())
            })?;
            output.push(escaped.wrapping_sub(64).wrapping_sub(42));
        } else {
            output.push(byte.wrapping_sub(42));
        }
    }

    Ok(())
}
