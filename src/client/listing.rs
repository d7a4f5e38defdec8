//! Server information and listing commands
//!
//! - CAPABILITIES, MODE READER, DATE, HELP (RFC 3977 §5, §7.1, §7.2)
//! - NEWGROUPS, NEWNEWS (RFC 3977 §7.3, §7.4)
//! - LIST, LIST ACTIVE, LIST NEWSGROUPS, LIST OVERVIEW.FMT (RFC 3977 §7.6, §8.4)
//! - XGTITLE (RFC 2980 §2.4)

use super::NntpSession;
use crate::commands::{
    ActiveGroup, Command, GroupDescription, OverviewField, parse_active_list,
    parse_descriptions, parse_overview_format,
};
use crate::error::Result;
use crate::response::{Payload, codes};
use chrono::{DateTime, Utc};
use tracing::debug;

impl NntpSession {
    /// Capability lines (CAPABILITIES), first line being `VERSION n`
    pub async fn capabilities(&mut self) -> Result<Vec<String>> {
        let reply = self.execute(&Command::Capabilities).await?;
        Ok(reply.payload.into_lines())
    }

    /// Switch a mode-switching server to reader mode (MODE READER)
    ///
    /// Returns whether posting is allowed afterwards; 502 is reported as
    /// [`NntpError::CommandRejected`](crate::NntpError::CommandRejected).
    pub async fn mode_reader(&mut self) -> Result<bool> {
        let reply = self.execute(&Command::ModeReader).await?;
        let allowed = reply.status.code == codes::READY_POSTING_ALLOWED;
        debug!("Reader mode active (posting allowed: {})", allowed);
        Ok(allowed)
    }

    /// Server time as sent (DATE, `yyyymmddhhmmss` in UTC)
    pub async fn date(&mut self) -> Result<String> {
        let reply = self.execute(&Command::Date).await?;
        match reply.payload {
            Payload::Text(text) => Ok(text),
            _ => Ok(reply.status.message),
        }
    }

    /// Help text lines (HELP)
    pub async fn help(&mut self) -> Result<Vec<String>> {
        let reply = self.execute(&Command::Help).await?;
        Ok(reply.payload.into_lines())
    }

    /// Groups created since `since` (NEWGROUPS)
    pub async fn new_groups(
        &mut self,
        since: DateTime<Utc>,
        distributions: Option<&str>,
    ) -> Result<Vec<ActiveGroup>> {
        let reply = self
            .execute(&Command::NewGroups {
                since,
                distributions: distributions.map(str::to_string),
            })
            .await?;
        Ok(parse_active_list(reply.payload.lines()))
    }

    /// Message-ids of articles that arrived since `since` (NEWNEWS)
    pub async fn new_news(
        &mut self,
        wildmat: &str,
        since: DateTime<Utc>,
        distributions: Option<&str>,
    ) -> Result<Vec<String>> {
        let reply = self
            .execute(&Command::NewNews {
                wildmat: wildmat.to_string(),
                since,
                distributions: distributions.map(str::to_string),
            })
            .await?;
        Ok(reply
            .payload
            .into_lines()
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// All newsgroups (LIST)
    pub async fn list(&mut self) -> Result<Vec<ActiveGroup>> {
        let reply = self.execute(&Command::List).await?;
        Ok(parse_active_list(reply.payload.lines()))
    }

    /// Newsgroups matching `wildmat` (LIST ACTIVE)
    pub async fn list_active(&mut self, wildmat: Option<&str>) -> Result<Vec<ActiveGroup>> {
        let reply = self
            .execute(&Command::ListActive(wildmat.map(str::to_string)))
            .await?;
        Ok(parse_active_list(reply.payload.lines()))
    }

    /// Newsgroup descriptions (LIST NEWSGROUPS)
    pub async fn list_newsgroups(&mut self, wildmat: Option<&str>) -> Result<Vec<GroupDescription>> {
        let reply = self
            .execute(&Command::ListNewsgroups(wildmat.map(str::to_string)))
            .await?;
        Ok(parse_descriptions(reply.payload.lines()))
    }

    /// Field layout of overview rows (LIST OVERVIEW.FMT)
    pub async fn list_overview_fmt(&mut self) -> Result<Vec<OverviewField>> {
        let reply = self.execute(&Command::ListOverviewFmt).await?;
        Ok(parse_overview_format(reply.payload.lines()))
    }

    /// Newsgroup descriptions (XGTITLE), all groups when `wildmat` is `None`
    pub async fn xgtitle(&mut self, wildmat: Option<&str>) -> Result<Vec<GroupDescription>> {
        let reply = self
            .execute(&Command::XGTitle(wildmat.map(str::to_string)))
            .await?;
        Ok(parse_descriptions(reply.payload.lines()))
    }
}
