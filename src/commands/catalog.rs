//! Static response-code tables, one per command
//!
//! Each table maps the codes a command may legitimately return to either the
//! payload that follows a success, or the meaning of a failure. The session
//! engine is generic over these tables; adding a command means adding a
//! table here and a [`Command`](super::Command) variant.

use crate::response::codes;

/// What follows a successful status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Nothing
    None,
    /// Whitespace-separated fields of the status text
    StatusFields,
    /// Dot-terminated multi-line block
    TextBlock,
    /// Compressed block (yEnc-framed or bare deflate)
    CompressedBlock,
    /// The status text itself
    StatusText,
    /// Server waits for the client (article transfer or TLS handshake)
    Continue,
}

/// Meaning of a status code for one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Success, followed by a payload of this shape
    Success(PayloadShape),
    /// Recognized negative response with its meaning
    Failure(&'static str),
}

/// Declarative description of one command's responses
#[derive(Debug)]
pub struct CommandSpec {
    /// Command name as used in errors and logs
    pub name: &'static str,
    /// The server expects a selected group (informational, not pre-checked)
    pub requires_group: bool,
    /// The server expects a current article (informational, not pre-checked)
    pub requires_article: bool,
    /// Command-specific codes, consulted before [`COMMON_FAILURES`]
    pub outcomes: &'static [(u16, Outcome)],
    /// Whether [`COMMON_FAILURES`] apply
    pub common_failures: bool,
}

impl CommandSpec {
    /// Look up the outcome of `code`; `None` means the code is unexpected
    pub fn outcome(&self, code: u16) -> Option<Outcome> {
        self.outcomes
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, outcome)| *outcome)
            .or_else(|| {
                if !self.common_failures {
                    return None;
                }
                COMMON_FAILURES
                    .iter()
                    .find(|(c, _)| *c == code)
                    .map(|(_, reason)| Outcome::Failure(*reason))
            })
    }

    /// Codes that count as success for this command
    pub fn success_codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.outcomes.iter().filter_map(|(code, outcome)| match outcome {
            Outcome::Success(_) => Some(*code),
            Outcome::Failure(_) => None,
        })
    }
}

/// Generic responses valid for any command (RFC 3977 §3.2.1, RFC 4643 §2.2)
pub const COMMON_FAILURES: &[(u16, &str)] = &[
    (codes::AUTH_REQUIRED, "Authentication required"),
    (
        codes::ENCRYPTION_REQUIRED,
        "Encryption or stronger authentication required",
    ),
    (codes::COMMAND_NOT_RECOGNIZED, "Command not recognized"),
    (codes::COMMAND_SYNTAX_ERROR, "Command syntax error"),
    (
        codes::ACCESS_DENIED,
        "Command not permitted / Access restriction / Permission denied",
    ),
    (codes::FEATURE_NOT_SUPPORTED, "Feature not supported"),
];

use Outcome::{Failure, Success};
use PayloadShape as P;

const NO_GROUP: (u16, Outcome) = (
    codes::NO_GROUP_SELECTED,
    Failure("No newsgroup has been selected"),
);
const NO_CURRENT_ARTICLE: (u16, Outcome) = (
    codes::NO_CURRENT_ARTICLE,
    Failure("No current article has been selected"),
);
const NO_SUCH_NUMBER: (u16, Outcome) = (
    codes::NO_SUCH_ARTICLE_NUMBER,
    Failure("No such article number in this group"),
);
const NO_SUCH_ID: (u16, Outcome) = (codes::NO_SUCH_ARTICLE_ID, Failure("No such article found"));
const NO_PERMISSION: (u16, Outcome) = (codes::ACCESS_DENIED, Failure("No permission"));
const OVERVIEW_NO_GROUP: (u16, Outcome) = (
    codes::NO_GROUP_SELECTED,
    Failure("No news group current selected"),
);
const OVERVIEW_NO_ARTICLE: (u16, Outcome) =
    (codes::NO_CURRENT_ARTICLE, Failure("No article(s) selected"));
const PROGRAM_FAULT: (u16, Outcome) = (
    codes::FEATURE_NOT_SUPPORTED,
    Failure("Internal server error, function not performed"),
);

const fn spec(name: &'static str, outcomes: &'static [(u16, Outcome)]) -> CommandSpec {
    CommandSpec {
        name,
        requires_group: false,
        requires_article: false,
        outcomes,
        common_failures: true,
    }
}

const fn in_group(name: &'static str, outcomes: &'static [(u16, Outcome)]) -> CommandSpec {
    CommandSpec {
        requires_group: true,
        ..spec(name, outcomes)
    }
}

const fn on_article(name: &'static str, outcomes: &'static [(u16, Outcome)]) -> CommandSpec {
    CommandSpec {
        requires_group: true,
        requires_article: true,
        ..spec(name, outcomes)
    }
}

/// Initial greeting; anything but 200/201 is a protocol error
pub static GREETING: CommandSpec = CommandSpec {
    common_failures: false,
    ..spec(
        "greeting",
        &[
            (codes::READY_POSTING_ALLOWED, Success(P::None)),
            (codes::READY_NO_POSTING, Success(P::None)),
        ],
    )
};

pub static CAPABILITIES: CommandSpec =
    spec("CAPABILITIES", &[(codes::CAPABILITY_LIST, Success(P::TextBlock))]);

pub static MODE_READER: CommandSpec = spec(
    "MODE READER",
    &[
        (codes::READY_POSTING_ALLOWED, Success(P::None)),
        (codes::READY_NO_POSTING, Success(P::None)),
        (
            codes::ACCESS_DENIED,
            Failure("Connection being closed, since service so permanently unavailable"),
        ),
    ],
);

pub static QUIT: CommandSpec = spec("QUIT", &[(codes::CLOSING_CONNECTION, Success(P::None))]);

pub static STARTTLS: CommandSpec = spec(
    "STARTTLS",
    &[
        (codes::CONTINUE_WITH_TLS, Success(P::Continue)),
        (codes::TLS_NOT_POSSIBLE, Failure("Can not initiate TLS negotiation")),
    ],
);

pub static GROUP: CommandSpec = spec(
    "GROUP",
    &[
        (codes::GROUP_SELECTED, Success(P::StatusFields)),
        (codes::NO_SUCH_GROUP, Failure("No such news group")),
    ],
);

pub static LISTGROUP: CommandSpec = spec(
    "LISTGROUP",
    &[
        (codes::GROUP_SELECTED, Success(P::TextBlock)),
        (codes::NO_GROUP_SELECTED, Failure("Not currently in newsgroup")),
        NO_PERMISSION,
    ],
);

pub static LAST: CommandSpec = on_article(
    "LAST",
    &[
        (codes::ARTICLE_STAT, Success(P::StatusFields)),
        NO_GROUP,
        NO_CURRENT_ARTICLE,
        (codes::NO_PREV_ARTICLE, Failure("No previous article in this group")),
    ],
);

pub static NEXT: CommandSpec = on_article(
    "NEXT",
    &[
        (codes::ARTICLE_STAT, Success(P::StatusFields)),
        NO_GROUP,
        NO_CURRENT_ARTICLE,
        (codes::NO_NEXT_ARTICLE, Failure("No next article in this group")),
    ],
);

pub static ARTICLE: CommandSpec = on_article(
    "ARTICLE",
    &[
        (codes::ARTICLE_FOLLOWS, Success(P::TextBlock)),
        NO_GROUP,
        NO_CURRENT_ARTICLE,
        NO_SUCH_NUMBER,
        NO_SUCH_ID,
    ],
);

pub static HEAD: CommandSpec = on_article(
    "HEAD",
    &[
        (codes::HEAD_FOLLOWS, Success(P::TextBlock)),
        NO_GROUP,
        NO_CURRENT_ARTICLE,
        NO_SUCH_NUMBER,
        NO_SUCH_ID,
    ],
);

pub static BODY: CommandSpec = on_article(
    "BODY",
    &[
        (codes::BODY_FOLLOWS, Success(P::TextBlock)),
        NO_GROUP,
        NO_CURRENT_ARTICLE,
        NO_SUCH_NUMBER,
        NO_SUCH_ID,
    ],
);

pub static STAT: CommandSpec = on_article(
    "STAT",
    &[
        (codes::ARTICLE_STAT, Success(P::StatusFields)),
        NO_GROUP,
        NO_CURRENT_ARTICLE,
        NO_SUCH_NUMBER,
        NO_SUCH_ID,
    ],
);

pub static POST: CommandSpec = spec(
    "POST",
    &[
        (codes::SEND_ARTICLE, Success(P::Continue)),
        (codes::POSTING_NOT_PERMITTED, Failure("Posting not allowed")),
    ],
);

/// Second phase of POST, after the article was sent
pub static POST_TRANSFER: CommandSpec = spec(
    "POST",
    &[
        (codes::ARTICLE_POSTED, Success(P::None)),
        (codes::POSTING_FAILED, Failure("Posting failed")),
    ],
);

pub static IHAVE: CommandSpec = spec(
    "IHAVE",
    &[
        (codes::SEND_ARTICLE_TRANSFER, Success(P::Continue)),
        (codes::ARTICLE_NOT_WANTED, Failure("Article not wanted")),
        (
            codes::TRANSFER_NOT_POSSIBLE,
            Failure("Transfer not possible; try again later"),
        ),
    ],
);

/// Second phase of IHAVE, after the article was sent
pub static IHAVE_TRANSFER: CommandSpec = spec(
    "IHAVE",
    &[
        (codes::ARTICLE_TRANSFERRED, Success(P::None)),
        (
            codes::TRANSFER_NOT_POSSIBLE,
            Failure("Transfer not possible; try again later"),
        ),
        (codes::TRANSFER_REJECTED, Failure("Transfer rejected; do not retry")),
    ],
);

pub static DATE: CommandSpec = spec("DATE", &[(codes::SERVER_DATE, Success(P::StatusText))]);

pub static HELP: CommandSpec = spec("HELP", &[(codes::HELP_TEXT_FOLLOWS, Success(P::TextBlock))]);

pub static NEWGROUPS: CommandSpec = spec(
    "NEWGROUPS",
    &[(codes::NEW_NEWSGROUPS_FOLLOW, Success(P::TextBlock))],
);

pub static NEWNEWS: CommandSpec = spec(
    "NEWNEWS",
    &[(codes::NEW_ARTICLE_LIST_FOLLOWS, Success(P::TextBlock))],
);

pub static LIST: CommandSpec = spec(
    "LIST",
    &[(codes::LIST_INFORMATION_FOLLOWS, Success(P::TextBlock))],
);

pub static LIST_ACTIVE: CommandSpec = spec(
    "LIST ACTIVE",
    &[(codes::LIST_INFORMATION_FOLLOWS, Success(P::TextBlock))],
);

pub static LIST_NEWSGROUPS: CommandSpec = spec(
    "LIST NEWSGROUPS",
    &[
        (codes::LIST_INFORMATION_FOLLOWS, Success(P::TextBlock)),
        PROGRAM_FAULT,
    ],
);

pub static LIST_OVERVIEW_FMT: CommandSpec = spec(
    "LIST OVERVIEW.FMT",
    &[
        (codes::LIST_INFORMATION_FOLLOWS, Success(P::TextBlock)),
        PROGRAM_FAULT,
    ],
);

pub static OVER: CommandSpec = in_group(
    "OVER",
    &[
        (codes::OVERVIEW_INFO_FOLLOWS, Success(P::TextBlock)),
        OVERVIEW_NO_GROUP,
        OVERVIEW_NO_ARTICLE,
        (codes::NO_SUCH_ARTICLE_NUMBER, Failure("No articles in that range")),
        NO_PERMISSION,
    ],
);

pub static XOVER: CommandSpec = in_group(
    "XOVER",
    &[
        (codes::OVERVIEW_INFO_FOLLOWS, Success(P::TextBlock)),
        OVERVIEW_NO_GROUP,
        OVERVIEW_NO_ARTICLE,
        NO_PERMISSION,
    ],
);

pub static XZVER: CommandSpec = in_group(
    "XZVER",
    &[
        (codes::OVERVIEW_INFO_FOLLOWS, Success(P::CompressedBlock)),
        OVERVIEW_NO_GROUP,
        OVERVIEW_NO_ARTICLE,
        NO_PERMISSION,
    ],
);

pub static XROVER: CommandSpec = in_group(
    "XROVER",
    &[
        (codes::OVERVIEW_INFO_FOLLOWS, Success(P::TextBlock)),
        OVERVIEW_NO_GROUP,
        OVERVIEW_NO_ARTICLE,
        NO_PERMISSION,
    ],
);

pub static XHDR: CommandSpec = in_group(
    "XHDR",
    &[
        (codes::HEAD_FOLLOWS, Success(P::TextBlock)),
        OVERVIEW_NO_GROUP,
        (codes::NO_CURRENT_ARTICLE, Failure("No current article selected")),
        (codes::NO_SUCH_ARTICLE_ID, Failure("No such article")),
        NO_PERMISSION,
    ],
);

pub static XPAT: CommandSpec = spec(
    "XPAT",
    &[
        (codes::HEAD_FOLLOWS, Success(P::TextBlock)),
        (codes::NO_SUCH_ARTICLE_ID, Failure("No such article")),
        NO_PERMISSION,
    ],
);

pub static XGTITLE: CommandSpec = spec(
    "XGTITLE",
    &[
        (codes::DESCRIPTIONS_FOLLOW, Success(P::TextBlock)),
        (codes::AUTH_REJECTED, Failure("Groups and descriptions unavailable")),
    ],
);

pub static AUTHINFO_USER: CommandSpec = spec(
    "AUTHINFO USER",
    &[
        (codes::AUTH_ACCEPTED, Success(P::None)),
        (codes::AUTH_CONTINUE, Success(P::None)),
        (codes::AUTH_REJECTED, Failure("Authentication rejected")),
        (codes::AUTH_OUT_OF_SEQUENCE, Failure("Authentication rejected")),
        (codes::ACCESS_DENIED, Failure("Authentication rejected")),
    ],
);

pub static AUTHINFO_PASS: CommandSpec = spec(
    "AUTHINFO PASS",
    &[
        (codes::AUTH_ACCEPTED, Success(P::None)),
        (codes::AUTH_CONTINUE, Failure("Authentication uncompleted")),
        (codes::AUTH_REJECTED, Failure("Authentication rejected")),
        (codes::AUTH_OUT_OF_SEQUENCE, Failure("Authentication rejected")),
        (codes::ACCESS_DENIED, Failure("Authentication rejected")),
    ],
);
