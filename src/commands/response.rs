//! Status line parsing

use crate::error::{NntpError, Result};
use crate::response::StatusResponse;

/// Longest excerpt of a malformed line carried in the error
const EXCERPT_LEN: usize = 100;

fn invalid(line: &str) -> NntpError {
    NntpError::InvalidResponse(line.chars().take(EXCERPT_LEN).collect())
}

/// Parse an NNTP status line into code and trimmed text
///
/// The line may still carry its CRLF. Leading whitespace and a UTF-8 BOM are
/// ignored.
pub fn parse_status_line(line: &str) -> Result<StatusResponse> {
    // Some broken servers/proxies prefix a BOM
    let line = line.trim_start_matches('\u{FEFF}').trim_start();
    let line = line.trim_end_matches(['\r', '\n']);

    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(invalid(line));
    }

    // "99999" must not parse as 999
    if bytes.len() > 3 && bytes[3].is_ascii_digit() {
        return Err(invalid(line));
    }

    let code = line[..3].parse::<u16>().map_err(|_| invalid(line))?;

    Ok(StatusResponse {
        code,
        message: line[3..].trim().to_string(),
    })
}

/// Parse a decimal article number field
pub(crate) fn parse_number(field: &str, what: &str) -> Result<u64> {
    field
        .parse()
        .map_err(|_| NntpError::InvalidResponse(format!("invalid {what}: {field:?}")))
}
