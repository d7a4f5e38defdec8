//! Newsgroup selection (GROUP, LISTGROUP)

use super::NntpSession;
use crate::commands::{ArticleRange, Command, GroupListing, GroupSummary, parse_group_listing};
use crate::error::Result;

impl NntpSession {
    /// Select a newsgroup
    ///
    /// Returns the summary from the 211 status line and records it as the
    /// [`current_group`](Self::current_group).
    ///
    /// # Errors
    ///
    /// - [`NntpError::CommandRejected`](crate::NntpError::CommandRejected) - 411 no such group
    /// - [`NntpError::InvalidResponse`](crate::NntpError::InvalidResponse) - malformed 211 line
    pub async fn group(&mut self, name: &str) -> Result<GroupSummary> {
        let reply = self.execute(&Command::Group(name.to_string())).await?;
        GroupSummary::parse(&reply.status.message)
    }

    /// List article numbers, optionally selecting a group first
    ///
    /// `range` is only sent together with a group name. When the status line
    /// carries a summary, it becomes the current group.
    pub async fn list_group(
        &mut self,
        group: Option<&str>,
        range: Option<ArticleRange>,
    ) -> Result<GroupListing> {
        let reply = self
            .execute(&Command::ListGroup {
                group: group.map(str::to_string),
                range,
            })
            .await?;
        parse_group_listing(&reply.status.message, reply.payload.lines())
    }
}
