//! Compressed overview bodies (XZVER)
//!
//! Servers send XZVER data in one of two ways:
//! - yEnc-encoded deflate data framed by `=ybegin`/`=yend` lines inside a
//!   normal dot-terminated block
//! - a bare deflate stream with no terminator the reader can rely on
//!
//! The second form is read by polling: data is accumulated until it
//! decompresses, with a bounded number of empty polls before giving up.

use std::io::Read;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use flate2::read::GzDecoder;
use flate2::{Decompress, FlushDecompress, Status};
use tokio::io::{AsyncBufReadExt, AsyncReadExt};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use super::NntpSession;
use super::state::ReadMode;
use crate::config::CompressedReadConfig;
use crate::error::{NntpError, Result};
use crate::framing::split_decompressed_lines;
use crate::yenc;

/// First bytes of a yEnc-framed body
const YBEGIN: &[u8] = b"=ybegin";

/// Prefix of the yEnc trailer line
const YEND: &[u8] = b"=yend";

/// gzip magic number
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read size while polling for bare deflate data
const COMPRESSED_READ_CHUNK: usize = 64 * 1024;

/// Switches the session into polling reads for as long as it lives
///
/// The previous read mode is restored on drop, so every exit path out of a
/// polling read (success, error, or the caller dropping the future) leaves
/// the session in the mode it had before.
pub(super) struct PollingScope<'a> {
    session: &'a mut NntpSession,
    previous: ReadMode,
}

impl<'a> PollingScope<'a> {
    pub(super) fn enter(session: &'a mut NntpSession, interval: Duration) -> Self {
        let previous = std::mem::replace(&mut session.read_mode, ReadMode::Polling { interval });
        trace!("Entering polling reads ({:?})", interval);
        Self { session, previous }
    }
}

impl Deref for PollingScope<'_> {
    type Target = NntpSession;

    fn deref(&self) -> &NntpSession {
        self.session
    }
}

impl DerefMut for PollingScope<'_> {
    fn deref_mut(&mut self) -> &mut NntpSession {
        self.session
    }
}

impl Drop for PollingScope<'_> {
    fn drop(&mut self) {
        self.session.read_mode = self.previous;
        trace!("Restored read mode {:?}", self.previous);
    }
}

/// Decompress a complete gzip, zlib or raw deflate stream
///
/// Returns `None` while the data is incomplete, or when it is not a
/// compressed stream at all.
pub(crate) fn inflate(data: &[u8]) -> Option<Vec<u8>> {
    if data.is_empty() {
        return None;
    }
    if data.starts_with(&GZIP_MAGIC) {
        return inflate_gzip(data);
    }
    inflate_stream(data, true).or_else(|| inflate_stream(data, false))
}

fn inflate_gzip(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).ok()?;
    Some(out)
}

/// Inflate a zlib (`zlib_header`) or raw deflate stream to its end marker
fn inflate_stream(data: &[u8], zlib_header: bool) -> Option<Vec<u8>> {
    let mut decoder = Decompress::new(zlib_header);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).max(4096));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let consumed = decoder.total_in() as usize;
        let produced = decoder.total_out();

        let status = decoder
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
            .ok()?;
        if status == Status::StreamEnd {
            return Some(out);
        }

        // Input exhausted without the end marker
        if decoder.total_in() as usize == consumed && decoder.total_out() == produced {
            return None;
        }
    }
}

impl NntpSession {
    /// Read a compressed block and split the decompressed text into lines
    ///
    /// The reply counts as consumed once the last compressed byte is read;
    /// decoding errors after that point leave the session usable.
    pub(super) async fn read_compressed_block(&mut self) -> Result<Vec<String>> {
        let head = self.read_compressed_head().await?;

        let data = if head == YBEGIN {
            self.read_yenc_block(head).await?
        } else {
            self.read_deflate_block(head).await?
        };

        let lines = split_decompressed_lines(&data);
        debug!(
            "Decompressed block: {} bytes, {} lines",
            data.len(),
            lines.len()
        );
        Ok(lines)
    }

    /// Consume up to the length of `=ybegin`, stopping at the first byte
    /// that rules it out
    async fn read_compressed_head(&mut self) -> Result<Vec<u8>> {
        let idle = self.config.idle_timeout;
        let reader = self.reader()?;
        let mut head = Vec::with_capacity(YBEGIN.len());

        while head.len() < YBEGIN.len() && YBEGIN.starts_with(&head) {
            let available = timeout(idle, reader.fill_buf())
                .await
                .map_err(|_| NntpError::Timeout)??;
            if available.is_empty() {
                return Err(NntpError::ConnectionClosed);
            }
            let take = available.len().min(YBEGIN.len() - head.len());
            head.extend_from_slice(&available[..take]);
            reader.consume(take);
        }
        Ok(head)
    }

    /// yEnc framing: block lines up to the `.` terminator, then decode and
    /// inflate
    ///
    /// The terminator is awaited with the normal idle timeout; lines after
    /// `=yend` are discarded.
    async fn read_yenc_block(&mut self, head: Vec<u8>) -> Result<Vec<u8>> {
        let mut encoded = Vec::new();
        let mut carry = head;
        let mut saw_trailer = false;
        let mut discarded = 0usize;

        while let Some(line) = self.read_block_line(std::mem::take(&mut carry)).await? {
            if saw_trailer {
                discarded += 1;
                continue;
            }
            encoded.extend_from_slice(&line);
            encoded.extend_from_slice(b"\r\n");
            saw_trailer = line.starts_with(YEND);
        }
        if discarded > 0 {
            warn!("Discarded {} lines after the yEnc trailer", discarded);
        }
        self.complete();

        let decoded = yenc::decode(&encoded)?;
        trace!(
            "yEnc block: {} encoded bytes, {} decoded",
            encoded.len(),
            decoded.data.len()
        );
        inflate(&decoded.data).ok_or_else(|| {
            NntpError::Encoding("yEnc payload is not a complete compressed stream".to_string())
        })
    }

    /// Bare deflate: poll until the accumulated bytes decompress
    async fn read_deflate_block(&mut self, head: Vec<u8>) -> Result<Vec<u8>> {
        let tuning = self.config.compressed.clone();
        let inflated = {
            let mut scope = PollingScope::enter(self, tuning.poll_interval);
            scope.poll_deflate(head, &tuning).await?
        };
        self.drain_terminator().await?;
        self.complete();
        Ok(inflated)
    }

    async fn poll_deflate(&mut self, mut data: Vec<u8>, tuning: &CompressedReadConfig) -> Result<Vec<u8>> {
        let mut chunk = vec![0u8; COMPRESSED_READ_CHUNK];
        let mut empty_polls: u32 = 0;

        loop {
            match self.read_chunk(&mut chunk).await? {
                Some(0) => {
                    debug!("EOF after {} compressed bytes", data.len());
                    if data.starts_with(b".\r\n") {
                        return Ok(Vec::new());
                    }
                    return inflate(&data).ok_or(NntpError::ConnectionClosed);
                }
                Some(n) => {
                    data.extend_from_slice(&chunk[..n]);
                    if data.len() > tuning.max_block_size {
                        return Err(NntpError::Encoding(format!(
                            "compressed block exceeds {} bytes",
                            tuning.max_block_size
                        )));
                    }
                }
                None => {
                    empty_polls += 1;

                    // A deflate stream can never start with '.', so this is
                    // an empty block
                    if data.starts_with(b".\r\n") {
                        return Ok(Vec::new());
                    }
                    if let Some(inflated) = inflate(&data) {
                        trace!(
                            "Inflated {} bytes to {} after {} empty polls",
                            data.len(),
                            inflated.len(),
                            empty_polls
                        );
                        return Ok(inflated);
                    }
                    if empty_polls >= tuning.max_empty_polls {
                        warn!(
                            "Giving up on compressed block: {} bytes after {} empty polls",
                            data.len(),
                            empty_polls
                        );
                        return Err(NntpError::Encoding(format!(
                            "compressed block did not decode after {} empty polls",
                            empty_polls
                        )));
                    }
                    if tuning.backoff_every > 0 && empty_polls % tuning.backoff_every == 0 {
                        tokio::time::sleep(tuning.backoff).await;
                    }
                }
            }
        }
    }

    /// Read whatever is available into `buf`
    ///
    /// In polling mode `Ok(None)` means nothing arrived within the interval;
    /// in blocking mode the idle timeout applies and elapsing is an error.
    async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        let mode = self.read_mode;
        let idle = self.config.idle_timeout;
        let reader = self.reader()?;

        match mode {
            ReadMode::Blocking => {
                let n = timeout(idle, reader.read(buf))
                    .await
                    .map_err(|_| NntpError::Timeout)??;
                Ok(Some(n))
            }
            ReadMode::Polling { interval } => match timeout(interval, reader.read(buf)).await {
                Ok(n) => Ok(Some(n?)),
                Err(_) => Ok(None),
            },
        }
    }

    /// Consume a `.` terminator line following a bare deflate body, if one
    /// arrives within a poll interval
    ///
    /// A terminator arriving later than that is left unread and fails the
    /// next command's status parse.
    async fn drain_terminator(&mut self) -> Result<()> {
        let interval = self.config.compressed.poll_interval;
        let reader = self.reader()?;

        let next_is_dot = match timeout(interval, reader.fill_buf()).await {
            Ok(available) => available?.first() == Some(&b'.'),
            Err(_) => false,
        };
        if !next_is_dot {
            return Ok(());
        }

        let mut line = Vec::new();
        self.read_raw_line(&mut line).await?;
        if line != b".\r\n" {
            warn!(
                "Discarded unexpected line after compressed block: {:?}",
                String::from_utf8_lossy(&line)
            );
        }
        Ok(())
    }
}
