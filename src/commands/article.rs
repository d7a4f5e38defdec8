//! Article retrieval and navigation results

use super::response::parse_number;
use crate::error::{NntpError, Result};

/// Article number and message-id from a 220–223 status line
///
/// Status format: "223 n message-id". The number is 0 when the server
/// was asked by message-id and does not know the number.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArticlePointer {
    /// Article number
    pub number: u64,
    /// Message identifier (e.g., "<abc@example.com>")
    pub message_id: String,
}

impl ArticlePointer {
    /// Parse from status fields (the status text split on whitespace)
    pub fn from_fields(fields: &[String]) -> Result<Self> {
        match fields {
            [number, message_id, ..] => Ok(ArticlePointer {
                number: parse_number(number, "article number")?,
                message_id: message_id.clone(),
            }),
            _ => Err(NntpError::InvalidResponse(fields.join(" "))),
        }
    }

    /// Parse from status text, `None` if it lacks a number and message-id
    pub fn parse_lenient(message: &str) -> Option<Self> {
        let fields: Vec<String> = message.split_whitespace().map(str::to_string).collect();
        Self::from_fields(&fields).ok()
    }
}

/// Article text returned by ARTICLE, HEAD or BODY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText {
    /// Number and message-id from the status line, when present
    pub pointer: Option<ArticlePointer>,
    /// Unstuffed lines of the block
    pub lines: Vec<String>,
}

impl ArticleText {
    /// Lines joined with CRLF
    pub fn to_text(&self) -> String {
        self.lines.join("\r\n")
    }
}
