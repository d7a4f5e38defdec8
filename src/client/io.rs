//! Request/response engine
//!
//! Every command goes through [`NntpSession::execute`]: validate the line,
//! write it, read the status line, look the code up in the command's
//! response table and read whatever payload that table declares. The
//! session is marked in-flight from the write until the last byte of the
//! reply is consumed, so an abandoned call is detected by the next one.

use super::state::{SessionState, TransferKind};
use super::{NntpIo, NntpSession};
use crate::commands::{
    Command, CommandSpec, GroupSummary, Outcome, PayloadShape, parse_status_line,
    validate_command_line,
};
use crate::error::{NntpError, Result};
use crate::framing::unstuff_line;
use crate::response::{Payload, Reply, StatusResponse, codes};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::timeout;
use tracing::{debug, info, trace};

/// Initial capacity for status and block lines
const LINE_CAPACITY: usize = 512;

/// Longest line accepted from the server
const MAX_LINE_LEN: usize = 1024 * 1024;

/// Map a status line to the payload it announces, or to an error
pub(super) fn classify(spec: &CommandSpec, status: &StatusResponse) -> Result<PayloadShape> {
    match spec.outcome(status.code) {
        Some(Outcome::Success(shape)) => Ok(shape),
        Some(Outcome::Failure(reason)) => Err(NntpError::CommandRejected {
            command: spec.name,
            code: status.code,
            message: status.message.clone(),
            reason,
        }),
        None => Err(NntpError::UnexpectedResponse {
            command: spec.name,
            code: status.code,
            message: status.message.clone(),
        }),
    }
}

impl NntpSession {
    /// Send a command and read its complete reply
    ///
    /// Success codes yield the payload the command's response table declares;
    /// listed failure codes become [`NntpError::CommandRejected`] and any other
    /// code [`NntpError::UnexpectedResponse`]. Connection-level errors close
    /// the session.
    ///
    /// # Errors
    ///
    /// - [`NntpError::IllegalCommand`] - line too long or contains CR/LF (nothing is sent)
    /// - [`NntpError::NotConnected`] - no stream
    /// - [`NntpError::Desynchronized`] - an earlier call was abandoned mid-reply
    /// - [`NntpError::InvalidState`] - POST/IHAVE is waiting for the article
    pub async fn execute(&mut self, command: &Command) -> Result<Reply> {
        let line = command.line();
        validate_command_line(&line)?;

        if matches!(command, Command::StartTls) && self.encrypted {
            return Err(NntpError::InvalidState(
                "session is already encrypted".to_string(),
            ));
        }

        let spec = command.spec();
        self.begin(spec.name)?;

        let result = self.transact(command, &line, spec).await;
        if let Err(e) = &result {
            if e.is_fatal() {
                debug!("{} failed, closing session: {}", spec.name, e);
                self.teardown();
            }
        }
        result
    }

    /// Check the session can take a new command and mark it in flight
    fn begin(&mut self, name: &'static str) -> Result<()> {
        if self.stream.is_none() {
            return Err(NntpError::NotConnected);
        }
        match self.state {
            SessionState::Ready => {
                self.state = SessionState::InFlight(name);
                Ok(())
            }
            SessionState::InFlight(previous) => Err(NntpError::Desynchronized(previous)),
            SessionState::AwaitingArticle(kind) => Err(NntpError::InvalidState(format!(
                "{:?} is waiting for the article; call send_article first",
                kind
            ))),
            SessionState::Disconnected => Err(NntpError::NotConnected),
        }
    }

    /// The reply has been read to its last byte
    pub(super) fn complete(&mut self) {
        if let SessionState::InFlight(_) = self.state {
            self.state = SessionState::Ready;
        }
    }

    async fn transact(
        &mut self,
        command: &Command,
        line: &str,
        spec: &'static CommandSpec,
    ) -> Result<Reply> {
        trace!("Sending command: {}", command.log_line());
        self.write_all(format!("{}\r\n", line).as_bytes()).await?;

        let status = self.read_status().await?;

        let shape = match classify(spec, &status) {
            Ok(shape) => shape,
            Err(e) => {
                self.complete();
                return Err(e);
            }
        };

        let payload = match shape {
            PayloadShape::None | PayloadShape::Continue => Payload::Empty,
            PayloadShape::StatusFields => Payload::Fields(
                status
                    .message
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
            ),
            PayloadShape::StatusText => Payload::Text(status.message.clone()),
            PayloadShape::TextBlock => Payload::Lines(self.read_text_block().await?),
            PayloadShape::CompressedBlock => Payload::Lines(self.read_compressed_block().await?),
        };

        self.track(command, &status);

        match (command, shape) {
            (Command::Post, PayloadShape::Continue) => {
                self.state = SessionState::AwaitingArticle(TransferKind::Post);
            }
            (Command::Ihave(_), PayloadShape::Continue) => {
                self.state = SessionState::AwaitingArticle(TransferKind::Ihave);
            }
            (Command::StartTls, PayloadShape::Continue) => {
                self.complete();
                self.start_tls().await?;
            }
            (Command::Quit, _) => {
                self.complete();
                self.teardown();
            }
            _ => self.complete(),
        }

        Ok(Reply { status, payload })
    }

    /// Session bookkeeping driven by successful replies
    fn track(&mut self, command: &Command, status: &StatusResponse) {
        match command {
            Command::Group(_) | Command::ListGroup { .. } => {
                if let Some(summary) = GroupSummary::parse_lenient(&status.message) {
                    info!(
                        "Selected group {} ({} articles, {}-{})",
                        summary.group, summary.count, summary.first, summary.last
                    );
                    self.current_group = Some(summary);
                }
            }
            Command::ModeReader => {
                self.posting_allowed = status.code == codes::READY_POSTING_ALLOWED;
            }
            _ => {}
        }
    }

    pub(super) fn reader(&mut self) -> Result<&mut BufReader<Box<dyn NntpIo>>> {
        self.stream.as_mut().ok_or(NntpError::NotConnected)
    }

    /// Write bytes and flush, bounded by the idle timeout
    pub(super) async fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let idle = self.config.idle_timeout;
        let stream = self.reader()?.get_mut();
        timeout(idle, async {
            stream.write_all(bytes).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| NntpError::Timeout)??;
        Ok(())
    }

    /// Append bytes up to and including the next LF to `buf`
    ///
    /// Fails with [`NntpError::InvalidResponse`] once `buf` grows past
    /// [`MAX_LINE_LEN`]; the rest of that line is left unread.
    pub(super) async fn read_raw_line(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        let idle = self.config.idle_timeout;
        let reader = self.reader()?;
        loop {
            let available = timeout(idle, reader.fill_buf())
                .await
                .map_err(|_| NntpError::Timeout)??;
            if available.is_empty() {
                return Err(NntpError::ConnectionClosed);
            }

            let (used, found) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            };
            buf.extend_from_slice(&available[..used]);
            reader.consume(used);

            if buf.len() > MAX_LINE_LEN {
                return Err(NntpError::InvalidResponse(format!(
                    "line exceeds {} bytes",
                    MAX_LINE_LEN
                )));
            }
            if found {
                return Ok(());
            }
        }
    }

    /// Read and parse one status line, remembering it as the last status
    ///
    /// A line that was read in full but does not parse still ends the reply.
    pub(super) async fn read_status(&mut self) -> Result<StatusResponse> {
        let mut line = Vec::with_capacity(LINE_CAPACITY);
        self.read_raw_line(&mut line).await?;

        let line = String::from_utf8_lossy(&line);
        trace!("Received: {}", line.trim_end());

        let status = match parse_status_line(&line) {
            Ok(status) => status,
            Err(e) => {
                self.complete();
                return Err(e);
            }
        };
        self.last_status = Some(status.clone());
        Ok(status)
    }

    /// Read one line of a multi-line block, unstuffed and without its CRLF
    ///
    /// `line` may already hold bytes consumed while peeking. Only CRLF ends a
    /// line; a bare LF is kept as content. Returns `None` at the terminator.
    pub(super) async fn read_block_line(&mut self, mut line: Vec<u8>) -> Result<Option<Vec<u8>>> {
        loop {
            self.read_raw_line(&mut line).await?;
            if line.ends_with(b"\r\n") {
                break;
            }
        }
        line.truncate(line.len() - 2);

        if line == b"." {
            return Ok(None);
        }
        let stuffing = line.len() - unstuff_line(&line).len();
        line.drain(..stuffing);
        Ok(Some(line))
    }

    /// Read a dot-terminated block into unstuffed lines
    pub(super) async fn read_text_block(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_block_line(Vec::with_capacity(LINE_CAPACITY)).await? {
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        trace!("Read {} block lines", lines.len());
        Ok(lines)
    }
}
