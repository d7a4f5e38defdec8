use std::collections::HashMap;

use crate::{NntpError, Result};

use super::types::{YencEnd, YencHeader};

fn malformed(what: &str, line: &str) -> NntpError {
    NntpError::Encoding(format!("{}: {}", what, line.chars().take(100).collect::<String>()))
}

/// Parse yEnc =ybegin header line
///
/// Format: =ybegin [part=1 total=5] line=128 size=123456 name=file name.bin
///
/// `name` always comes last and runs to the end of the line, so it may
/// contain spaces. Only `size` is required.
pub(crate) fn parse_ybegin(line: &str) -> Result<YencHeader> {
    let rest = line
        .strip_prefix("=ybegin")
        .ok_or_else(|| malformed("Invalid yEnc header", line))?;

    let (params, name) = match rest.find("name=") {
        Some(pos) => (&rest[..pos], rest[pos + 5..].trim_end_matches(['\r', '\n'])),
        None => (rest, ""),
    };
    let params = parse_yenc_params(params);

    let size = params
        .get("size")
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| malformed("Missing 'size' parameter", line))?;

    Ok(YencHeader {
        size,
        name: name.to_string(),
        line: params.get("line").and_then(|s| s.parse().ok()),
        part: params.get("part").and_then(|s| s.parse().ok()),
        total: params.get("total").and_then(|s| s.parse().ok()),
    })
}

/// Parse yEnc =yend line
///
/// Format: =yend [size=123456] [crc32=12345678] [pcrc32=87654321]
pub(crate) fn parse_yend(line: &str) -> Result<YencEnd> {
    let rest = line
        .strip_prefix("=yend")
        .ok_or_else(|| malformed("Invalid yEnc trailer", line))?;
    let params = parse_yenc_params(rest);

    Ok(YencEnd {
        size: params.get("size").and_then(|s| s.parse().ok()),
        // CRC32 is in hex format
        crc32: params
            .get("crc32")
            .and_then(|s| u32::from_str_radix(s, 16).ok()),
        pcrc32: params
            .get("pcrc32")
            .and_then(|s| u32::from_str_radix(s, 16).ok()),
    })
}

/// Parse yEnc key=value parameters separated by whitespace
fn parse_yenc_params(params: &str) -> HashMap<&str, &str> {
    params
        .split_whitespace()
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
