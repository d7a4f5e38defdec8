#![doc = include_str!("../README.md")]

mod client;
/// NNTP commands, response tables and payload parsers
pub mod commands;
mod config;
mod error;
/// Multi-line block framing and outgoing article encoding
pub mod framing;
mod response;
/// yEnc binary encoding/decoding for Usenet
pub mod yenc;

pub use client::{NntpIo, NntpSession, ReadMode, SessionState, TransferKind};
pub use commands::{
    ActiveGroup, ArticleId, ArticlePointer, ArticleRange, ArticleText, Command, GroupDescription,
    GroupListing, GroupSummary, HeaderEntry, OverviewField,
};
pub use config::{CompressedReadConfig, Encryption, ServerConfig};
pub use error::{ErrorKind, NntpError, Result};
pub use framing::OutgoingArticle;
pub use response::{Payload, Reply, StatusResponse, codes};
pub use yenc::{YencDecoded, YencEnd, YencHeader, decode as yenc_decode, encode as yenc_encode};
