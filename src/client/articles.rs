//! Article retrieval, navigation and overview commands
//!
//! - ARTICLE, HEAD, BODY, STAT (RFC 3977 §6.2)
//! - LAST, NEXT (RFC 3977 §6.1.3, §6.1.4)
//! - OVER (RFC 3977 §8.3), XOVER, XHDR, XPAT (RFC 2980), XROVER, XZVER

use super::NntpSession;
use crate::commands::{
    ArticleId, ArticlePointer, ArticleRange, ArticleText, Command, HeaderEntry,
    parse_header_entries, parse_overview,
};
use crate::error::Result;
use crate::response::{Payload, Reply};
use tracing::trace;

fn pointer(reply: Reply) -> Result<ArticlePointer> {
    match reply.payload {
        Payload::Fields(fields) => ArticlePointer::from_fields(&fields),
        _ => ArticlePointer::from_fields(&[]),
    }
}

fn article_text(reply: Reply) -> ArticleText {
    ArticleText {
        pointer: ArticlePointer::parse_lenient(&reply.status.message),
        lines: reply.payload.into_lines(),
    }
}

impl NntpSession {
    /// Fetch a full article (headers and body)
    ///
    /// `None` fetches the current article of the selected group.
    ///
    /// # Errors
    ///
    /// - [`NntpError::CommandRejected`](crate::NntpError::CommandRejected) -
    ///   412, 420, 423 or 430 (no group, no current article, no such article)
    /// - [`NntpError::Timeout`](crate::NntpError::Timeout) - server did not respond in time
    pub async fn article(&mut self, id: Option<ArticleId>) -> Result<ArticleText> {
        trace!("Fetching article: {:?}", id);
        let reply = self.execute(&Command::Article(id)).await?;
        Ok(article_text(reply))
    }

    /// Fetch article headers only
    pub async fn head(&mut self, id: Option<ArticleId>) -> Result<ArticleText> {
        trace!("Fetching head: {:?}", id);
        let reply = self.execute(&Command::Head(id)).await?;
        Ok(article_text(reply))
    }

    /// Fetch article body only
    pub async fn body(&mut self, id: Option<ArticleId>) -> Result<ArticleText> {
        trace!("Fetching body: {:?}", id);
        let reply = self.execute(&Command::Body(id)).await?;
        Ok(article_text(reply))
    }

    /// Check that an article exists without transferring it
    ///
    /// Selecting by number also makes it the current article.
    pub async fn stat(&mut self, id: Option<ArticleId>) -> Result<ArticlePointer> {
        let reply = self.execute(&Command::Stat(id)).await?;
        pointer(reply)
    }

    /// Move the current article pointer back (LAST)
    pub async fn last(&mut self) -> Result<ArticlePointer> {
        let reply = self.execute(&Command::Last).await?;
        pointer(reply)
    }

    /// Move the current article pointer forward (NEXT)
    pub async fn next(&mut self) -> Result<ArticlePointer> {
        let reply = self.execute(&Command::Next).await?;
        pointer(reply)
    }

    /// Overview rows for a range (OVER)
    ///
    /// Each row is split on tabs; use
    /// [`list_overview_fmt`](Self::list_overview_fmt) for the field names.
    pub async fn over(&mut self, range: Option<ArticleRange>) -> Result<Vec<Vec<String>>> {
        let reply = self.execute(&Command::Over(range)).await?;
        Ok(parse_overview(reply.payload.lines()))
    }

    /// Overview rows for a range (XOVER)
    pub async fn xover(&mut self, range: Option<ArticleRange>) -> Result<Vec<Vec<String>>> {
        let reply = self.execute(&Command::XOver(range)).await?;
        Ok(parse_overview(reply.payload.lines()))
    }

    /// Compressed overview rows for a range (XZVER)
    ///
    /// Handles both yEnc-framed and bare deflate bodies; see
    /// [`CompressedReadConfig`](crate::CompressedReadConfig) for the polling
    /// budget used by the latter.
    pub async fn xzver(&mut self, range: Option<ArticleRange>) -> Result<Vec<Vec<String>>> {
        let reply = self.execute(&Command::XZVer(range)).await?;
        Ok(parse_overview(reply.payload.lines()))
    }

    /// One header field for a range of articles (XHDR)
    pub async fn xhdr(
        &mut self,
        field: &str,
        range: Option<ArticleRange>,
    ) -> Result<Vec<HeaderEntry>> {
        let reply = self
            .execute(&Command::XHdr {
                field: field.to_string(),
                range,
            })
            .await?;
        Ok(parse_header_entries(reply.payload.lines()))
    }

    /// References headers for a range of articles (XROVER)
    pub async fn xrover(&mut self, range: Option<ArticleRange>) -> Result<Vec<HeaderEntry>> {
        let reply = self.execute(&Command::XROver(range)).await?;
        Ok(parse_header_entries(reply.payload.lines()))
    }

    /// Header values matching any of `patterns` (XPAT)
    pub async fn xpat(
        &mut self,
        field: &str,
        range: ArticleRange,
        patterns: &[&str],
    ) -> Result<Vec<HeaderEntry>> {
        let reply = self
            .execute(&Command::XPat {
                field: field.to_string(),
                range,
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
            })
            .await?;
        Ok(parse_header_entries(reply.payload.lines()))
    }
}
