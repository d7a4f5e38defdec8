//! NNTP error types

use thiserror::Error;

/// Coarse classification of an [`NntpError`]
///
/// Callers usually only need to know how far an error reaches: a
/// [`Connection`](ErrorKind::Connection) error ends the session, everything
/// else leaves it usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Socket open/read/write failure, timeout, TLS failure or premature EOF
    Connection,
    /// Malformed status line, illegal command or unrecognized response code
    Protocol,
    /// A recognized, command-specific negative response
    CommandRejected,
    /// yEnc size mismatch or undecodable compressed body
    Encoding,
    /// Operation not valid in the current session state
    State,
}

/// NNTP protocol and connection errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during handshake or configuration
    #[error("TLS error: {0}")]
    Tls(String),

    /// Read or write exceeded the idle timeout
    #[error("Connection timeout")]
    Timeout,

    /// Stream ended before the expected data arrived
    #[error("Connection closed")]
    ConnectionClosed,

    /// Status line could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Command line rejected before it was written
    #[error("Illegal command: {0}")]
    IllegalCommand(String),

    /// Response code not listed for the command that was sent
    #[error("Unexpected response to {command}: {code} {message}")]
    UnexpectedResponse {
        /// Command name (e.g., "ARTICLE")
        command: &'static str,
        /// NNTP response code
        code: u16,
        /// Status text from server
        message: String,
    },

    /// Recognized negative response for the command that was sent
    #[error("{reason} ({code} {message})")]
    CommandRejected {
        /// Command name (e.g., "GROUP")
        command: &'static str,
        /// NNTP response code (e.g., 411, 423, 440)
        code: u16,
        /// Status text from server
        message: String,
        /// Meaning of the code for this command
        reason: &'static str,
    },

    /// Body payload could not be decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// No connection is open
    #[error("Not connected")]
    NotConnected,

    /// `connect` called on an open session
    #[error("Already connected, disconnect first")]
    AlreadyConnected,

    /// A previous command was abandoned before its reply was fully read
    #[error("Session desynchronized: reply to {0} was not fully consumed")]
    Desynchronized(&'static str),

    /// Operation not allowed in the current transaction state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl NntpError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            NntpError::Io(_)
            | NntpError::Tls(_)
            | NntpError::Timeout
            | NntpError::ConnectionClosed => ErrorKind::Connection,
            NntpError::InvalidResponse(_)
            | NntpError::IllegalCommand(_)
            | NntpError::UnexpectedResponse { .. } => ErrorKind::Protocol,
            NntpError::CommandRejected { .. } => ErrorKind::CommandRejected,
            NntpError::Encoding(_) => ErrorKind::Encoding,
            NntpError::NotConnected
            | NntpError::AlreadyConnected
            | NntpError::Desynchronized(_)
            | NntpError::InvalidState(_) => ErrorKind::State,
        }
    }

    /// Whether the session that produced this error is gone
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }

    /// Response code that caused this error, if a status line was involved
    pub fn code(&self) -> Option<u16> {
        match self {
            NntpError::UnexpectedResponse { code, .. }
            | NntpError::CommandRejected { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Raw server status text that caused this error, if any
    pub fn server_text(&self) -> Option<&str> {
        match self {
            NntpError::UnexpectedResponse { message, .. }
            | NntpError::CommandRejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;
