//! RFC 3977 Section 3.1.1 - Multi-line data blocks
//!
//! - Blocks end with a line holding a single "."
//! - Content lines starting with "." arrive with the dot doubled
//! - Only CRLF ends a line

use nntp_engine::{ArticleId, NntpError, SessionState};

use crate::common::{Script, connect, finish};

#[tokio::test]
async fn test_dot_stuffed_lines_are_unstuffed() {
    let script = Script::greeting()
        .read()
        .send_raw("222 1 <a@b> body\r\nA\r\n..B\r\n...\r\n.\r\n");
    let (mut session, server) = connect(script).await;

    let body = session.body(Some(ArticleId::Number(1))).await.unwrap();
    assert_eq!(body.lines, vec!["A", ".B", ".."]);

    assert_eq!(finish(session, server).await, vec!["BODY 1"]);
}

#[tokio::test]
async fn test_empty_block() {
    let script = Script::greeting().read().send_raw("100 help follows\r\n.\r\n");
    let (mut session, server) = connect(script).await;

    assert!(session.help().await.unwrap().is_empty());
    assert_eq!(session.state(), SessionState::Ready);
    finish(session, server).await;
}

#[tokio::test]
async fn test_bare_lf_is_content() {
    let script = Script::greeting()
        .read()
        .send_raw("222 1 <a@b>\r\nfirst\nstill first\r\nsecond\r\n.\r\n");
    let (mut session, server) = connect(script).await;

    let body = session.body(None).await.unwrap();
    assert_eq!(body.lines, vec!["first\nstill first", "second"]);
    finish(session, server).await;
}

#[tokio::test]
async fn test_dot_followed_by_bare_lf_is_not_terminator() {
    let script = Script::greeting()
        .read()
        .send_raw("222 1 <a@b>\r\n.\nx\r\n.\r\n");
    let (mut session, server) = connect(script).await;

    let body = session.body(None).await.unwrap();
    assert_eq!(body.lines, vec![".\nx"]);
    finish(session, server).await;
}

#[tokio::test]
async fn test_block_split_across_writes() {
    let script = Script::greeting()
        .read()
        .send_raw("220 7 <split@example>\r\nSubject: sp")
        .send_raw("lit\r\n\r\n..lead")
        .send_raw("ing dot\r")
        .send_raw("\n.")
        .send_raw("\r\n");
    let (mut session, server) = connect(script).await;

    let article = session.article(Some(ArticleId::Number(7))).await.unwrap();
    assert_eq!(article.lines, vec!["Subject: split", "", ".leading dot"]);
    assert_eq!(article.pointer.unwrap().message_id, "<split@example>");
    finish(session, server).await;
}

#[tokio::test]
async fn test_non_utf8_lines_are_kept() {
    let mut reply = b"222 3 <latin1@example>\r\ncaf".to_vec();
    reply.push(0xe9);
    reply.extend_from_slice(b"\r\n.\r\n");
    let script = Script::greeting().read().send_raw(reply);
    let (mut session, server) = connect(script).await;

    let body = session.body(None).await.unwrap();
    assert_eq!(body.lines.len(), 1);
    assert!(body.lines[0].starts_with("caf"));
    finish(session, server).await;
}

#[tokio::test]
async fn test_eof_inside_block_closes_session() {
    let script = Script::greeting()
        .read()
        .send_raw("222 1 <a@b>\r\npartial line\r\nno end")
        .close();
    let (mut session, server) = connect(script).await;

    let err = session.body(None).await.unwrap_err();
    assert!(matches!(err, NntpError::ConnectionClosed));
    assert!(err.is_fatal());
    assert!(!session.is_connected());
    assert!(matches!(
        session.date().await,
        Err(NntpError::NotConnected)
    ));
    finish(session, server).await;
}
