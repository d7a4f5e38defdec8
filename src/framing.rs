//! Multi-line block framing (RFC 977 §2.4.1, RFC 3977 §3.1.1)
//!
//! Multi-line blocks are CRLF-terminated lines ending with a line holding a
//! single `.`. Content lines that begin with `.` are sent with the dot
//! doubled so the receiver never mistakes them for the terminator.

/// Line terminator
pub const CRLF: &str = "\r\n";

/// Terminator line of a multi-line block, without its CRLF
pub const TERMINATOR: &str = ".";

/// Remove NNTP byte-stuffing from a received line (leading ".." becomes ".")
///
/// Works on raw bytes because block lines are not necessarily UTF-8.
pub fn unstuff_line(line: &[u8]) -> &[u8] {
    if line.starts_with(b"..") {
        &line[1..]
    } else {
        line
    }
}

/// Apply NNTP byte-stuffing to a line about to be sent (leading "." doubled)
pub fn stuff_line(line: &str) -> std::borrow::Cow<'_, str> {
    if line.starts_with('.') {
        std::borrow::Cow::Owned(format!(".{}", line))
    } else {
        std::borrow::Cow::Borrowed(line)
    }
}

/// Article handed to the second phase of POST or IHAVE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingArticle {
    /// Complete article text (headers, blank line, body), sent as-is apart
    /// from line-ending normalisation and dot-stuffing
    Raw(String),
    /// Header block and body, joined with the separating blank line
    Parts {
        /// Header lines
        header: String,
        /// Body text
        body: String,
    },
}

impl OutgoingArticle {
    /// Article from a pre-formatted string
    pub fn raw(text: impl Into<String>) -> Self {
        OutgoingArticle::Raw(text.into())
    }

    /// Article from a header block and a body
    pub fn parts(header: impl Into<String>, body: impl Into<String>) -> Self {
        OutgoingArticle::Parts {
            header: header.into(),
            body: body.into(),
        }
    }

    /// Wire form: CRLF lines, dot-stuffed, followed by the terminator line
    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            OutgoingArticle::Raw(text) => push_stuffed(&mut out, text),
            OutgoingArticle::Parts { header, body } => {
                push_stuffed(&mut out, header.trim_end_matches(['\r', '\n']));
                out.extend_from_slice(CRLF.as_bytes());
                push_stuffed(&mut out, body);
            }
        }
        out.extend_from_slice(TERMINATOR.as_bytes());
        out.extend_from_slice(CRLF.as_bytes());
        out
    }
}

/// Append `text` as stuffed CRLF lines; a trailing line break does not add
/// an extra empty line
fn push_stuffed(out: &mut Vec<u8>, text: &str) {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        out.extend_from_slice(stuff_line(line).as_bytes());
        out.extend_from_slice(CRLF.as_bytes());
    }
}

/// Split a decompressed overview payload into lines
///
/// Some servers compress the text-protocol terminator along with the data,
/// so a trailing `"."` followed by an empty entry is dropped once. Remaining
/// empty entries are dropped as well.
pub fn split_decompressed_lines(data: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(data);
    let mut lines: Vec<&str> = text.split(CRLF).collect();

    let n = lines.len();
    if n >= 2 && lines[n - 2] == TERMINATOR && lines[n - 1].is_empty() {
        lines.truncate(n - 2);
    }

    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
