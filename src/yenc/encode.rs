use crc32fast::Hasher;

use crate::{NntpError, Result};

/// Encode binary data as a single-part yEnc block
///
/// Produces `=ybegin`, CRLF data lines of at most `line_length` encoded
/// bytes and a `=yend` trailer carrying size and CRC32. A leading `.` is
/// escaped, so the output can pass through multi-line framing unchanged.
pub fn encode(data: &[u8], name: &str, line_length: usize) -> Result<Vec<u8>> {
    if line_length < 2 || line_length > 997 {
        return Err(NntpError::Encoding(format!(
            "Invalid line length: {} (must be 2-997)",
            line_length
        )));
    }

    let mut output = format!(
        "=ybegin line={} size={} name={}\r\n",
        line_length,
        data.len(),
        name
    )
    .into_bytes();

    output.extend_from_slice(&encode_data(data, line_length));

    let mut hasher = Hasher::new();
    hasher.update(data);
    output.extend_from_slice(
        format!("=yend size={} crc32={:08x}\r\n", data.len(), hasher.finalize()).as_bytes(),
    );

    Ok(output)
}

/// Encode binary data with proper escaping and line breaks
///
/// yEnc encoding: output = (input + 42) mod 256
/// Critical bytes that must be escaped:
/// - NUL, LF, CR and '=' anywhere
/// - TAB and SPACE at line start/end
/// - '.' at line start
///
/// Escape sequence: = followed by (byte + 64)
fn encode_data(data: &[u8], line_length: usize) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() + data.len() / 32 + 8);
    let mut current_line: Vec<u8> = Vec::with_capacity(line_length + 1);

    let flush = |output: &mut Vec<u8>, line: &mut Vec<u8>| {
        output.extend_from_slice(line);
        output.extend_from_slice(b"\r\n");
        line.clear();
    };

    for (i, &byte) in data.iter().enumerate() {
        let encoded = byte.wrapping_add(42);
        let at_start = current_line.is_empty();
        let last_on_line = current_line.len() + 2 >= line_length || i + 1 == data.len();

        let needs_escape = is_critical_byte(encoded)
            || (at_start && matches!(encoded, b'\t' | b' ' | b'.'))
            || (last_on_line && matches!(encoded, b'\t' | b' '));

        if needs_escape {
            if current_line.len() + 2 > line_length {
                flush(&mut output, &mut current_line);
            }
            current_line.push(b'=');
            current_line.push(encoded.wrapping_add(64));
        } else {
            current_line.push(encoded);
        }

        if current_line.len() >= line_length {
            flush(&mut output, &mut current_line);
        }
    }

    if !current_line.is_empty() {
        flush(&mut output, &mut current_line);
    }

    output
}

/// Check if a byte is a critical byte that must always be escaped
fn is_critical_byte(byte: u8) -> bool {
    matches!(
        byte,
        0x00 |  // NUL
        0x0A |  // LF
        0x0D |  // CR
        0x3D // '='
    )
}
