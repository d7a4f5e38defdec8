//! XHDR, XPAT and XROVER header entries

/// Header value for one article (RFC 2980 §2.6, §2.9)
///
/// Line format: "article value"; the article is a number, or a message-id
/// when the request named one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderEntry {
    /// Article number or message-id, as sent by the server
    pub article: String,
    /// Header value; values may contain spaces
    pub value: String,
}

impl HeaderEntry {
    /// Article number, if the reference is numeric
    pub fn article_number(&self) -> Option<u64> {
        self.article.parse().ok()
    }
}

/// Parse one header entry line
///
/// # Examples
///
/// ```
/// # use nntp_engine::commands::parse_header_line;
/// let entry = parse_header_line("12345 Re: Test Subject").unwrap();
/// assert_eq!(entry.article_number(), Some(12345));
/// assert_eq!(entry.value, "Re: Test Subject");
/// ```
pub fn parse_header_line(line: &str) -> Option<HeaderEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (article, value) = line.split_once(' ').unwrap_or((line, ""));
    Some(HeaderEntry {
        article: article.to_string(),
        value: value.to_string(),
    })
}

/// Parse a header entry block, skipping blank lines
pub fn parse_header_entries(lines: &[String]) -> Vec<HeaderEntry> {
    lines.iter().filter_map(|line| parse_header_line(line)).collect()
}
