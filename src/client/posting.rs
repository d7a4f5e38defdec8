//! Article submission (POST, IHAVE)
//!
//! Both commands are two-phase: the command itself is answered with a
//! continuation code, then the article is sent and answered with the final
//! status. Between the two phases the session accepts nothing but
//! [`NntpSession::send_article`].

use super::NntpSession;
use super::io::classify;
use super::state::SessionState;
use crate::commands::{Command, CommandSpec};
use crate::error::{NntpError, Result};
use crate::framing::OutgoingArticle;
use crate::response::StatusResponse;
use tracing::{debug, info};

impl NntpSession {
    /// Start posting an article (POST)
    ///
    /// On 340 the session waits for [`send_article`](Self::send_article).
    ///
    /// # Errors
    ///
    /// - [`NntpError::CommandRejected`] - 440 posting not permitted
    pub async fn post(&mut self) -> Result<()> {
        self.execute(&Command::Post).await?;
        Ok(())
    }

    /// Offer an article to the server (IHAVE)
    ///
    /// On 335 the session waits for [`send_article`](Self::send_article).
    ///
    /// # Errors
    ///
    /// - [`NntpError::CommandRejected`] - 435 not wanted or 436 try again later
    pub async fn ihave(&mut self, message_id: &str) -> Result<()> {
        self.execute(&Command::Ihave(message_id.to_string())).await?;
        Ok(())
    }

    /// Send the article for a pending POST or IHAVE
    ///
    /// The article is normalised to CRLF lines, dot-stuffed and terminated.
    /// Returns the final status (240 or 235).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpSession, OutgoingArticle};
    /// # async fn example(session: &mut NntpSession) -> nntp_engine::Result<()> {
    /// session.post().await?;
    /// let article = OutgoingArticle::parts(
    ///     "From: poster@example.com\r\nNewsgroups: misc.test\r\nSubject: test",
    ///     "Hello",
    /// );
    /// session.send_article(&article).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - [`NntpError::InvalidState`] - no POST or IHAVE is waiting for an article
    /// - [`NntpError::CommandRejected`] - 441 posting failed, 436/437 transfer failed
    pub async fn send_article(&mut self, article: &OutgoingArticle) -> Result<StatusResponse> {
        if self.stream.is_none() {
            return Err(NntpError::NotConnected);
        }
        let kind = match self.state {
            SessionState::AwaitingArticle(kind) => kind,
            SessionState::InFlight(previous) => return Err(NntpError::Desynchronized(previous)),
            SessionState::Ready | SessionState::Disconnected => {
                return Err(NntpError::InvalidState(
                    "no POST or IHAVE is waiting for an article".to_string(),
                ));
            }
        };

        let spec = kind.spec();
        self.state = SessionState::InFlight(spec.name);

        let result = self.transfer(article, spec).await;
        if let Err(e) = &result {
            if e.is_fatal() {
                debug!("Article transfer failed, closing session: {}", e);
                self.teardown();
            }
        }
        result
    }

    async fn transfer(
        &mut self,
        article: &OutgoingArticle,
        spec: &'static CommandSpec,
    ) -> Result<StatusResponse> {
        let wire = article.to_wire();
        debug!("Sending article ({} bytes)", wire.len());
        self.write_all(&wire).await?;

        let status = self.read_status().await?;
        self.complete();

        classify(spec, &status)?;
        info!("Article accepted: {} {}", status.code, status.message);
        Ok(status)
    }
}
