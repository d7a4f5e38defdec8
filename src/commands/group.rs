//! Group selection and newsgroup listings

use tracing::debug;

use super::response::parse_number;
use crate::error::{NntpError, Result};

/// Group summary returned by GROUP and LISTGROUP
///
/// Status format: "211 count first last group-name"
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupSummary {
    /// Newsgroup name
    pub group: String,
    /// Number of the first article
    pub first: u64,
    /// Number of the last article
    pub last: u64,
    /// Estimated number of articles in the group
    pub count: u64,
}

impl GroupSummary {
    /// Parse the status text of a 211 response (without the code)
    pub fn parse(message: &str) -> Result<Self> {
        let parts: Vec<&str> = message.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(NntpError::InvalidResponse(message.to_string()));
        }

        Ok(GroupSummary {
            count: parse_number(parts[0], "article count")?,
            first: parse_number(parts[1], "first article")?,
            last: parse_number(parts[2], "last article")?,
            group: parts[3].to_string(),
        })
    }

    /// Like [`parse`](Self::parse), but `None` for a non-numeric summary
    ///
    /// Some servers answer LISTGROUP with a bare "211 list follows".
    pub fn parse_lenient(message: &str) -> Option<Self> {
        Self::parse(message).ok()
    }
}

/// Result of LISTGROUP: optional group summary plus article numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupListing {
    /// Summary from the status line, when the server provided one
    pub summary: Option<GroupSummary>,
    /// Article numbers, in server order
    pub articles: Vec<u64>,
}

/// Parse the LISTGROUP status text and body
pub fn parse_group_listing(message: &str, lines: &[String]) -> Result<GroupListing> {
    let articles = lines
        .iter()
        .map(|line| parse_number(line.trim(), "article number"))
        .collect::<Result<Vec<u64>>>()?;

    Ok(GroupListing {
        summary: GroupSummary::parse_lenient(message),
        articles,
    })
}

/// Newsgroup entry from LIST, LIST ACTIVE and NEWGROUPS
///
/// Line format: "group last first posting"
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveGroup {
    /// Newsgroup name
    pub name: String,
    /// Highest article number
    pub last: u64,
    /// Lowest article number
    pub first: u64,
    /// Posting status:
    /// - "y" = posting allowed
    /// - "n" = posting not allowed
    /// - "m" = moderated
    /// - "=group.name" = alias to another group
    pub posting: String,
}

impl ActiveGroup {
    /// Whether local posting is permitted
    pub fn posting_allowed(&self) -> bool {
        self.posting == "y"
    }
}

/// Parse one active-file line
pub fn parse_active_line(line: &str) -> Result<ActiveGroup> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(NntpError::InvalidResponse(line.to_string()));
    }

    Ok(ActiveGroup {
        name: parts[0].to_string(),
        last: parse_number(parts[1], "last article")?,
        first: parse_number(parts[2], "first article")?,
        posting: parts[3].to_string(),
    })
}

/// Parse an active-file listing, skipping malformed lines
pub fn parse_active_list(lines: &[String]) -> Vec<ActiveGroup> {
    lines
        .iter()
        .filter_map(|line| match parse_active_line(line) {
            Ok(group) => Some(group),
            Err(_) => {
                debug!("Skipping malformed active line: {:?}", line);
                None
            }
        })
        .collect()
}
