//! NNTP commands, their response tables and payload parsers

pub mod article;
pub mod catalog;
pub mod group;
pub mod hdr;
pub mod list;
pub mod over;
pub mod response;

pub use article::*;
pub use catalog::{CommandSpec, Outcome, PayloadShape};
pub use group::*;
pub use hdr::*;
pub use list::*;
pub use over::*;
pub use response::parse_status_line;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{NntpError, Result};

/// Longest command line accepted, excluding the CRLF (RFC 3977 §3.1)
pub const MAX_COMMAND_LEN: usize = 510;

/// Article selector: number in the current group or message-id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleId {
    /// Article number in the selected group
    Number(u64),
    /// Message-id including angle brackets
    MessageId(String),
}

impl From<u64> for ArticleId {
    fn from(number: u64) -> Self {
        ArticleId::Number(number)
    }
}

impl From<&str> for ArticleId {
    fn from(message_id: &str) -> Self {
        ArticleId::MessageId(message_id.to_string())
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Number(n) => write!(f, "{}", n),
            ArticleId::MessageId(id) => f.write_str(id),
        }
    }
}

/// Article range argument (RFC 3977 §6.1.2, RFC 2980 §2.8)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleRange {
    /// One article number
    Single(u64),
    /// From a number to the end of the group (`n-`)
    From(u64),
    /// Inclusive range (`n-m`)
    Between(u64, u64),
    /// One article by message-id
    MessageId(String),
}

impl From<u64> for ArticleRange {
    fn from(number: u64) -> Self {
        ArticleRange::Single(number)
    }
}

impl From<std::ops::RangeInclusive<u64>> for ArticleRange {
    fn from(range: std::ops::RangeInclusive<u64>) -> Self {
        ArticleRange::Between(*range.start(), *range.end())
    }
}

impl From<std::ops::RangeFrom<u64>> for ArticleRange {
    fn from(range: std::ops::RangeFrom<u64>) -> Self {
        ArticleRange::From(range.start)
    }
}

impl fmt::Display for ArticleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleRange::Single(n) => write!(f, "{}", n),
            ArticleRange::From(n) => write!(f, "{}-", n),
            ArticleRange::Between(first, last) => write!(f, "{}-{}", first, last),
            ArticleRange::MessageId(id) => f.write_str(id),
        }
    }
}

/// Every command the engine can send
///
/// `line()` renders the wire form without CRLF and `spec()` selects the
/// response table the engine dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// CAPABILITIES (RFC 3977 §5.2)
    Capabilities,
    /// MODE READER (RFC 3977 §5.3)
    ModeReader,
    /// QUIT
    Quit,
    /// STARTTLS (RFC 4642)
    StartTls,
    /// GROUP newsgroup
    Group(String),
    /// LISTGROUP [newsgroup [range]]
    ListGroup {
        /// Group to select; the current group when absent
        group: Option<String>,
        /// Restrict the listing; ignored without `group`
        range: Option<ArticleRange>,
    },
    /// LAST
    Last,
    /// NEXT
    Next,
    /// ARTICLE [id]
    Article(Option<ArticleId>),
    /// HEAD [id]
    Head(Option<ArticleId>),
    /// BODY [id]
    Body(Option<ArticleId>),
    /// STAT [id]
    Stat(Option<ArticleId>),
    /// POST
    Post,
    /// IHAVE message-id
    Ihave(String),
    /// DATE
    Date,
    /// HELP
    Help,
    /// NEWGROUPS yymmdd hhmmss GMT [<distributions>]
    NewGroups {
        /// Groups created after this instant
        since: DateTime<Utc>,
        /// Comma-separated distributions
        distributions: Option<String>,
    },
    /// NEWNEWS wildmat yymmdd hhmmss GMT [<distributions>]
    NewNews {
        /// Newsgroups to search (comma-separated wildmats)
        wildmat: String,
        /// Articles arrived after this instant
        since: DateTime<Utc>,
        /// Comma-separated distributions
        distributions: Option<String>,
    },
    /// LIST
    List,
    /// LIST ACTIVE [wildmat]
    ListActive(Option<String>),
    /// LIST NEWSGROUPS [wildmat]
    ListNewsgroups(Option<String>),
    /// LIST OVERVIEW.FMT
    ListOverviewFmt,
    /// OVER [range]
    Over(Option<ArticleRange>),
    /// XOVER [range]
    XOver(Option<ArticleRange>),
    /// XZVER [range], compressed overview
    XZVer(Option<ArticleRange>),
    /// XHDR field [range]
    XHdr {
        /// Header name
        field: String,
        /// Articles; the current article when absent
        range: Option<ArticleRange>,
    },
    /// XROVER [range]
    XROver(Option<ArticleRange>),
    /// XPAT field range pattern...
    XPat {
        /// Header name
        field: String,
        /// Articles to match
        range: ArticleRange,
        /// Wildmat patterns, joined with spaces
        patterns: Vec<String>,
    },
    /// XGTITLE [wildmat]
    XGTitle(Option<String>),
    /// AUTHINFO USER name
    AuthInfoUser(String),
    /// AUTHINFO PASS password
    AuthInfoPass(String),
}

fn push_arg(line: &mut String, arg: &impl fmt::Display) {
    line.push(' ');
    line.push_str(&arg.to_string());
}

fn push_opt(line: &mut String, arg: &Option<impl fmt::Display>) {
    if let Some(arg) = arg {
        push_arg(line, arg);
    }
}

/// NEWGROUPS/NEWNEWS time argument (RFC 977 §3.7 form, always GMT)
fn push_since(line: &mut String, since: &DateTime<Utc>, distributions: &Option<String>) {
    line.push(' ');
    line.push_str(&since.format("%y%m%d %H%M%S GMT").to_string());
    if let Some(distributions) = distributions {
        line.push_str(&format!(" <{}>", distributions));
    }
}

impl Command {
    /// Response table for this command
    pub fn spec(&self) -> &'static CommandSpec {
        match self {
            Command::Capabilities => &catalog::CAPABILITIES,
            Command::ModeReader => &catalog::MODE_READER,
            Command::Quit => &catalog::QUIT,
            Command::StartTls => &catalog::STARTTLS,
            Command::Group(_) => &catalog::GROUP,
            Command::ListGroup { .. } => &catalog::LISTGROUP,
            Command::Last => &catalog::LAST,
            Command::Next => &catalog::NEXT,
            Command::Article(_) => &catalog::ARTICLE,
            Command::Head(_) => &catalog::HEAD,
            Command::Body(_) => &catalog::BODY,
            Command::Stat(_) => &catalog::STAT,
            Command::Post => &catalog::POST,
            Command::Ihave(_) => &catalog::IHAVE,
            Command::Date => &catalog::DATE,
            Command::Help => &catalog::HELP,
            Command::NewGroups { .. } => &catalog::NEWGROUPS,
            Command::NewNews { .. } => &catalog::NEWNEWS,
            Command::List => &catalog::LIST,
            Command::ListActive(_) => &catalog::LIST_ACTIVE,
            Command::ListNewsgroups(_) => &catalog::LIST_NEWSGROUPS,
            Command::ListOverviewFmt => &catalog::LIST_OVERVIEW_FMT,
            Command::Over(_) => &catalog::OVER,
            Command::XOver(_) => &catalog::XOVER,
            Command::XZVer(_) => &catalog::XZVER,
            Command::XHdr { .. } => &catalog::XHDR,
            Command::XROver(_) => &catalog::XROVER,
            Command::XPat { .. } => &catalog::XPAT,
            Command::XGTitle(_) => &catalog::XGTITLE,
            Command::AuthInfoUser(_) => &catalog::AUTHINFO_USER,
            Command::AuthInfoPass(_) => &catalog::AUTHINFO_PASS,
        }
    }

    /// Command name, as used in errors and logs
    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Wire form of the command, without the CRLF
    pub fn line(&self) -> String {
        let mut line = String::from(self.name());
        match self {
            Command::Group(group) => push_arg(&mut line, group),
            Command::ListGroup { group, range } => {
                if let Some(group) = group {
                    push_arg(&mut line, group);
                    push_opt(&mut line, range);
                }
            }
            Command::Article(id) | Command::Head(id) | Command::Body(id) | Command::Stat(id) => {
                push_opt(&mut line, id)
            }
            Command::Ihave(message_id) => push_arg(&mut line, message_id),
            Command::NewGroups {
                since,
                distributions,
            } => push_since(&mut line, since, distributions),
            Command::NewNews {
                wildmat,
                since,
                distributions,
            } => {
                push_arg(&mut line, wildmat);
                push_since(&mut line, since, distributions);
            }
            Command::ListActive(wildmat) | Command::ListNewsgroups(wildmat) => {
                push_opt(&mut line, wildmat)
            }
            Command::Over(range)
            | Command::XOver(range)
            | Command::XZVer(range)
            | Command::XROver(range) => push_opt(&mut line, range),
            Command::XHdr { field, range } => {
                push_arg(&mut line, field);
                push_opt(&mut line, range);
            }
            Command::XPat {
                field,
                range,
                patterns,
            } => {
                push_arg(&mut line, field);
                push_arg(&mut line, range);
                push_arg(&mut line, &patterns.join(" "));
            }
            Command::XGTitle(wildmat) => {
                push_arg(&mut line, &wildmat.as_deref().unwrap_or("*"))
            }
            Command::AuthInfoUser(user) => push_arg(&mut line, user),
            Command::AuthInfoPass(pass) => push_arg(&mut line, pass),
            Command::Capabilities
            | Command::ModeReader
            | Command::Quit
            | Command::StartTls
            | Command::Last
            | Command::Next
            | Command::Post
            | Command::Date
            | Command::Help
            | Command::List
            | Command::ListOverviewFmt => {}
        }
        line
    }

    /// Command line safe to write to logs (credentials masked)
    pub fn log_line(&self) -> String {
        match self {
            Command::AuthInfoPass(_) => "AUTHINFO PASS ********".to_string(),
            _ => self.line(),
        }
    }
}

/// Reject command lines that would break framing
///
/// Lines longer than [`MAX_COMMAND_LEN`] bytes or containing CR or LF are
/// refused before anything reaches the wire.
pub fn validate_command_line(line: &str) -> Result<()> {
    if line.len() > MAX_COMMAND_LEN {
        return Err(NntpError::IllegalCommand(format!(
            "command line is {} bytes, limit is {}",
            line.len(),
            MAX_COMMAND_LEN
        )));
    }
    if line.contains(['\r', '\n']) {
        return Err(NntpError::IllegalCommand(
            "command line contains CR or LF".to_string(),
        ));
    }
    Ok(())
}
