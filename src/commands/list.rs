//! LIST NEWSGROUPS, XGTITLE and LIST OVERVIEW.FMT parsing

use tracing::warn;

/// Newsgroup description from LIST NEWSGROUPS or XGTITLE
///
/// Line format: "group description", separated by whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupDescription {
    /// Newsgroup name
    pub name: String,
    /// Free-form description (may be empty)
    pub description: String,
}

/// Parse one description line
///
/// Returns `None` for lines without a group name.
pub fn parse_description_line(line: &str) -> Option<GroupDescription> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, description) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (line, ""),
    };
    Some(GroupDescription {
        name: name.to_string(),
        description: description.to_string(),
    })
}

/// Parse a description listing, warning about non-standard lines
pub fn parse_descriptions(lines: &[String]) -> Vec<GroupDescription> {
    lines
        .iter()
        .filter_map(|line| {
            let parsed = parse_description_line(line);
            if parsed.is_none() {
                warn!("Received non-standard description line: {:?}", line);
            }
            parsed
        })
        .collect()
}

/// One field of the overview format (LIST OVERVIEW.FMT, RFC 3977 §8.4)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverviewField {
    /// Field name without the trailing colon or `:full` suffix
    pub name: String,
    /// Whether overview lines carry the header name too (`:full`)
    pub full: bool,
}

/// Parse one overview format line
///
/// "Subject:" → `Subject`, "Xref:full" → `Xref` (full), ":bytes" stays
/// `:bytes`.
pub fn parse_overview_field(line: &str) -> OverviewField {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();
    if lower.ends_with(":full") && line.len() > 5 {
        return OverviewField {
            name: line[..line.len() - 5].to_string(),
            full: true,
        };
    }
    let name = match line.strip_suffix(':') {
        Some(name) if !name.is_empty() => name,
        _ => line,
    };
    OverviewField {
        name: name.to_string(),
        full: false,
    }
}

/// Parse an overview format listing
pub fn parse_overview_format(lines: &[String]) -> Vec<OverviewField> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_overview_field(line))
        .collect()
}
