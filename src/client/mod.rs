//! NNTP session with TLS, STARTTLS and compressed overview support

mod articles;
mod auth;
mod compression;
mod connection;
mod group_ops;
mod io;
mod listing;
mod posting;
mod state;

pub use state::{ReadMode, SessionState, TransferKind};

use crate::commands::GroupSummary;
use crate::config::ServerConfig;
use crate::response::StatusResponse;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::debug;

/// Byte stream an NNTP session can run over
///
/// Implemented for anything that is async readable and writable, so plain
/// TCP, TLS streams and in-memory pipes all qualify.
pub trait NntpIo: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> NntpIo for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Async NNTP session: one connection, one command at a time
///
/// # Example
///
/// ```no_run
/// use nntp_engine::{ArticleId, NntpSession, ServerConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = NntpSession::open(ServerConfig::tls("news.example.com")).await?;
/// session.authenticate("user", "pass").await?;
///
/// let group = session.group("alt.test").await?;
/// println!("Group has {} articles", group.count);
///
/// let article = session.article(Some(ArticleId::Number(group.last))).await?;
/// println!("{}", article.to_text());
/// session.disconnect().await?;
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct NntpSession {
    /// Buffered stream, `None` while disconnected
    stream: Option<BufReader<Box<dyn NntpIo>>>,
    /// Server configuration
    config: ServerConfig,
    /// Whether the stream is wrapped in TLS
    encrypted: bool,
    /// Request/response position
    state: SessionState,
    /// How reads currently wait
    read_mode: ReadMode,
    /// Status of the most recent reply
    last_status: Option<StatusResponse>,
    /// Group selected by the last successful GROUP or LISTGROUP
    current_group: Option<GroupSummary>,
    /// Posting permission from the greeting or MODE READER
    posting_allowed: bool,
}

impl NntpSession {
    /// Create a disconnected session; call [`connect`](Self::connect) next
    pub fn new(config: ServerConfig) -> Self {
        Self {
            stream: None,
            config,
            encrypted: false,
            state: SessionState::Disconnected,
            read_mode: ReadMode::Blocking,
            last_status: None,
            current_group: None,
            posting_allowed: false,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Check if a stream is open
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Check if the stream is TLS-wrapped
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Current request/response state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current read mode
    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// Status line of the most recent reply, successful or not
    pub fn last_status(&self) -> Option<&StatusResponse> {
        self.last_status.as_ref()
    }

    /// The currently selected newsgroup, if any
    pub fn current_group(&self) -> Option<&GroupSummary> {
        self.current_group.as_ref()
    }

    /// Whether the server said posting is allowed
    pub fn posting_allowed(&self) -> bool {
        self.posting_allowed
    }
}

impl Drop for NntpSession {
    fn drop(&mut self) {
        debug!("NntpSession dropped (connected: {})", self.stream.is_some());
    }
}
