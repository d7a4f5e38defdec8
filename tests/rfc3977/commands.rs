//! RFC 3977 Section 3.1 / 3.2 - Command lines and generic responses

use nntp_engine::{ArticleId, Command, ErrorKind, NntpError, Payload, SessionState};

use crate::common::{Script, connect, finish};

#[tokio::test]
async fn test_command_with_newline_is_not_sent() {
    let script = Script::greeting()
        .read()
        .send("211 1 1 1 misc.test");
    let (mut session, server) = connect(script).await;

    let err = session
        .article(Some(ArticleId::from("<a@b>\r\nQUIT")))
        .await
        .unwrap_err();
    assert!(matches!(err, NntpError::IllegalCommand(_)));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(session.state(), SessionState::Ready);

    let err = session.group("misc\ntest").await.unwrap_err();
    assert!(matches!(err, NntpError::IllegalCommand(_)));

    // The session is still in sync
    session.group("misc.test").await.unwrap();

    assert_eq!(finish(session, server).await, vec!["GROUP misc.test"]);
}

#[tokio::test]
async fn test_overlong_command_is_not_sent() {
    let (mut session, server) = connect(Script::greeting()).await;

    let name = "x".repeat(510);
    let err = session.group(&name).await.unwrap_err();
    assert!(matches!(err, NntpError::IllegalCommand(_)));

    assert!(finish(session, server).await.is_empty());
}

#[tokio::test]
async fn test_command_at_length_limit_is_sent() {
    let script = Script::greeting().read().send("411 no such group");
    let (mut session, server) = connect(script).await;

    // "GROUP " + 504 bytes = 510
    let name = "y".repeat(504);
    let err = session.group(&name).await.unwrap_err();
    assert_eq!(err.code(), Some(411));

    let received = finish(session, server).await;
    assert_eq!(received[0].len(), 510);
}

#[tokio::test]
async fn test_unexpected_code() {
    let script = Script::greeting()
        .read()
        .send("299 something odd")
        .read()
        .send("111 20240101000000");
    let (mut session, server) = connect(script).await;

    let err = session.group("misc.test").await.unwrap_err();
    match &err {
        NntpError::UnexpectedResponse {
            command,
            code,
            message,
        } => {
            assert_eq!(*command, "GROUP");
            assert_eq!(*code, 299);
            assert_eq!(message, "something odd");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(session.date().await.unwrap(), "20240101000000");
    finish(session, server).await;
}

#[tokio::test]
async fn test_malformed_status_line() {
    let script = Script::greeting()
        .read()
        .send("OK fine")
        .read()
        .send("111 20240101000000");
    let (mut session, server) = connect(script).await;

    let err = session.date().await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidResponse(_)));
    assert!(session.is_connected());
    assert_eq!(session.date().await.unwrap(), "20240101000000");
    finish(session, server).await;
}

#[tokio::test]
async fn test_overlong_status_line() {
    let script = Script::greeting()
        .read()
        .send_raw(vec![b'2'; 1024 * 1024 + 16]);
    let (mut session, server) = connect(script).await;

    let err = session.date().await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidResponse(_)), "got {err:?}");
    assert!(session.is_connected());

    // The rest of the line is still unread
    let err = session.date().await.unwrap_err();
    assert!(matches!(err, NntpError::Desynchronized("DATE")));

    assert_eq!(finish(session, server).await, vec!["DATE"]);
}

#[tokio::test]
async fn test_common_failures_apply_to_every_command() {
    let script = Script::greeting()
        .read()
        .send("480 Authentication required")
        .read()
        .send("500 What?")
        .read()
        .send("502 Permission denied");
    let (mut session, server) = connect(script).await;

    let err = session.group("private.group").await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 480,
            reason: "Authentication required",
            ..
        }
    ));
    let err = session.capabilities().await.unwrap_err();
    assert_eq!(err.code(), Some(500));
    let err = session.xover(None).await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 502,
            reason: "No permission",
            ..
        }
    ));
    finish(session, server).await;
}

#[tokio::test]
async fn test_execute_returns_raw_reply() {
    let script = Script::greeting()
        .read()
        .send("211 5 100 104 misc.test")
        .read()
        .send_raw("101 Capability list:\r\nVERSION 2\r\nREADER\r\n.\r\n");
    let (mut session, server) = connect(script).await;

    let reply = session
        .execute(&Command::Group("misc.test".into()))
        .await
        .unwrap();
    assert_eq!(reply.status.code, 211);
    assert_eq!(
        reply.payload,
        Payload::Fields(vec![
            "5".into(),
            "100".into(),
            "104".into(),
            "misc.test".into()
        ])
    );
    assert_eq!(session.current_group().unwrap().count, 5);

    let reply = session.execute(&Command::Capabilities).await.unwrap();
    assert_eq!(reply.payload.lines(), ["VERSION 2", "READER"]);
    finish(session, server).await;
}
