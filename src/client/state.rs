//! Session and read-mode state

use std::time::Duration;

use crate::commands::{CommandSpec, catalog};

/// Article transfer started by POST or IHAVE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// POST, answered by 240/441
    Post,
    /// IHAVE, answered by 235/436/437
    Ihave,
}

impl TransferKind {
    /// Response table for the article transfer itself
    pub(super) fn spec(self) -> &'static CommandSpec {
        match self {
            TransferKind::Post => &catalog::POST_TRANSFER,
            TransferKind::Ihave => &catalog::IHAVE_TRANSFER,
        }
    }
}

/// Where the session stands in the request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stream
    Disconnected,
    /// Connected, no reply outstanding
    Ready,
    /// A command was written and its reply is not fully consumed yet
    InFlight(&'static str),
    /// POST or IHAVE was accepted; only the article may be sent next
    AwaitingArticle(TransferKind),
}

/// How reads wait for data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Wait up to the idle timeout; elapsing is a connection error
    Blocking,
    /// Wait up to `interval`; elapsing just means nothing arrived yet
    Polling {
        /// Length of one poll
        interval: Duration,
    },
}
