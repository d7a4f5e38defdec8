//! NNTP authentication (AUTHINFO USER/PASS, RFC 4643 §2.3)

use super::NntpSession;
use crate::commands::Command;
use crate::error::Result;
use crate::response::codes;
use tracing::{debug, info};

impl NntpSession {
    /// Authenticate with username and password (AUTHINFO USER/PASS)
    ///
    /// Sends AUTHINFO USER and, when the server asks for it with 381,
    /// AUTHINFO PASS. A 281 to USER alone completes authentication. The
    /// password never appears in logs.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpSession, ServerConfig};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut session = NntpSession::open(ServerConfig::tls("news.example.com")).await?;
    /// session.authenticate("user", "pass").await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - [`NntpError::CommandRejected`](crate::NntpError::CommandRejected) -
    ///   481/482 rejected, 502 not permitted, 381 to PASS (uncompleted)
    /// - [`NntpError::ConnectionClosed`](crate::NntpError::ConnectionClosed) - server closed the connection
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        debug!("Authenticating as {}", username);

        let reply = self
            .execute(&Command::AuthInfoUser(username.to_string()))
            .await?;

        if reply.status.code == codes::AUTH_CONTINUE {
            self.execute(&Command::AuthInfoPass(password.to_string()))
                .await?;
        }

        info!("Authenticated as {}", username);
        Ok(())
    }
}
