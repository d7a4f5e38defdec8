//! NNTP status responses and status codes

/// Status line returned for every command: 3-digit code plus trailing text
///
/// Only the most recent one is kept by the session; it is replaced, not
/// accumulated, when the next command is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    /// 3-digit NNTP response code
    pub code: u16,
    /// Status text from server (trimmed)
    pub message: String,
}

impl StatusResponse {
    /// Check if response indicates success (1xx or 2xx)
    pub fn is_success(&self) -> bool {
        self.code >= 100 && self.code < 300
    }

    /// Check if response indicates continuation (3xx)
    pub fn is_continuation(&self) -> bool {
        self.code >= 300 && self.code < 400
    }

    /// Check if response indicates error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.code >= 400
    }
}

/// Payload read after a successful status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// No payload (plain acknowledgement or continuation)
    Empty,
    /// Status text split on whitespace
    Fields(Vec<String>),
    /// The status text
    Text(String),
    /// Lines of a multi-line or compressed block
    Lines(Vec<String>),
}

impl Payload {
    /// Block lines, or an empty slice for single-line payloads
    pub fn lines(&self) -> &[String] {
        match self {
            Payload::Lines(lines) => lines,
            _ => &[],
        }
    }

    /// Take the block lines, or an empty vector for single-line payloads
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Payload::Lines(lines) => lines,
            _ => Vec::new(),
        }
    }
}

/// Successful reply to one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Status line that opened the reply
    pub status: StatusResponse,
    /// Data declared by the command's response table for this code
    pub payload: Payload,
}

/// NNTP response codes (RFC 977, RFC 2980, RFC 3977, RFC 4642, RFC 4643)
pub mod codes {
    // 1xx - Informational
    /// Help text follows
    pub const HELP_TEXT_FOLLOWS: u16 = 100;
    /// Capability list follows
    pub const CAPABILITY_LIST: u16 = 101;
    /// Server date/time
    pub const SERVER_DATE: u16 = 111;

    // 2xx - Success
    /// Server ready, posting allowed
    pub const READY_POSTING_ALLOWED: u16 = 200;
    /// Server ready, no posting
    pub const READY_NO_POSTING: u16 = 201;
    /// Closing connection
    pub const CLOSING_CONNECTION: u16 = 205;
    /// Group selected
    pub const GROUP_SELECTED: u16 = 211;
    /// Information follows (LIST and variants)
    pub const LIST_INFORMATION_FOLLOWS: u16 = 215;
    /// Article follows
    pub const ARTICLE_FOLLOWS: u16 = 220;
    /// Head follows (also XHDR/XPAT header data)
    pub const HEAD_FOLLOWS: u16 = 221;
    /// Body follows
    pub const BODY_FOLLOWS: u16 = 222;
    /// Article selected / stat
    pub const ARTICLE_STAT: u16 = 223;
    /// Overview information follows
    pub const OVERVIEW_INFO_FOLLOWS: u16 = 224;
    /// List of new articles follows
    pub const NEW_ARTICLE_LIST_FOLLOWS: u16 = 230;
    /// List of new newsgroups follows
    pub const NEW_NEWSGROUPS_FOLLOW: u16 = 231;
    /// Article transferred OK (IHAVE)
    pub const ARTICLE_TRANSFERRED: u16 = 235;
    /// Article posted successfully
    pub const ARTICLE_POSTED: u16 = 240;
    /// Authentication accepted
    pub const AUTH_ACCEPTED: u16 = 281;
    /// Group descriptions follow (XGTITLE)
    pub const DESCRIPTIONS_FOLLOW: u16 = 282;

    // 3xx - Continuation
    /// Send article to be transferred (IHAVE)
    pub const SEND_ARTICLE_TRANSFER: u16 = 335;
    /// Send article to be posted
    pub const SEND_ARTICLE: u16 = 340;
    /// Continue with authentication
    pub const AUTH_CONTINUE: u16 = 381;
    /// Continue with TLS negotiation (RFC 4642)
    pub const CONTINUE_WITH_TLS: u16 = 382;

    // 4xx - Temporary errors
    /// Service temporarily unavailable
    pub const SERVICE_UNAVAILABLE: u16 = 400;
    /// No such newsgroup
    pub const NO_SUCH_GROUP: u16 = 411;
    /// No newsgroup selected
    pub const NO_GROUP_SELECTED: u16 = 412;
    /// No current article
    pub const NO_CURRENT_ARTICLE: u16 = 420;
    /// No next article
    pub const NO_NEXT_ARTICLE: u16 = 421;
    /// No previous article
    pub const NO_PREV_ARTICLE: u16 = 422;
    /// No article with that number
    pub const NO_SUCH_ARTICLE_NUMBER: u16 = 423;
    /// No article with that message-id
    pub const NO_SUCH_ARTICLE_ID: u16 = 430;
    /// Article not wanted
    pub const ARTICLE_NOT_WANTED: u16 = 435;
    /// Transfer not possible; try again later
    pub const TRANSFER_NOT_POSSIBLE: u16 = 436;
    /// Transfer rejected; do not retry
    pub const TRANSFER_REJECTED: u16 = 437;
    /// Posting not permitted
    pub const POSTING_NOT_PERMITTED: u16 = 440;
    /// Posting failed
    pub const POSTING_FAILED: u16 = 441;
    /// Authentication required
    pub const AUTH_REQUIRED: u16 = 480;
    /// Authentication rejected (also "descriptions unavailable" for XGTITLE)
    pub const AUTH_REJECTED: u16 = 481;
    /// Authentication out of sequence / rejected (RFC 2980)
    pub const AUTH_OUT_OF_SEQUENCE: u16 = 482;
    /// Encryption or stronger authentication required
    pub const ENCRYPTION_REQUIRED: u16 = 483;

    // 5xx - Permanent errors
    /// Command not recognized
    pub const COMMAND_NOT_RECOGNIZED: u16 = 500;
    /// Command syntax error
    pub const COMMAND_SYNTAX_ERROR: u16 = 501;
    /// Access denied / command unavailable
    pub const ACCESS_DENIED: u16 = 502;
    /// Feature not supported / program fault
    pub const FEATURE_NOT_SUPPORTED: u16 = 503;
    /// Can not initiate TLS negotiation (RFC 4642)
    pub const TLS_NOT_POSSIBLE: u16 = 580;
}
