//! RFC 3977 Sections 6.3.1 / 6.3.2 - POST and IHAVE

use nntp_engine::{NntpError, OutgoingArticle, SessionState, TransferKind};

use crate::common::{Script, connect, finish};

const HEADER: &str = "From: \"Demo User\" <nobody@example.net>\r\nNewsgroups: misc.test\r\nSubject: I am just a test article\r\nOrganization: An Example Net";

#[tokio::test]
async fn test_post_sends_stuffed_article() {
    let script = Script::greeting()
        .read()
        .send("340 Input article; end with <CR-LF>.<CR-LF>")
        .read_article()
        .send("240 Article received OK");
    let (mut session, server) = connect(script).await;

    session.post().await.unwrap();
    assert_eq!(
        session.state(),
        SessionState::AwaitingArticle(TransferKind::Post)
    );

    let article = OutgoingArticle::parts(HEADER, "This is just a test article.\n.\nbye\n");
    let status = session.send_article(&article).await.unwrap();
    assert_eq!(status.code, 240);
    assert_eq!(session.state(), SessionState::Ready);

    let received = finish(session, server).await;
    assert_eq!(received[0], "POST");
    assert_eq!(
        received[1],
        format!("{}\r\n\r\nThis is just a test article.\r\n..\r\nbye", HEADER)
    );
}

#[tokio::test]
async fn test_post_not_permitted() {
    let script = Script::greeting().read().send("440 Posting not permitted");
    let (mut session, server) = connect(script).await;

    let err = session.post().await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 440,
            command: "POST",
            ..
        }
    ));
    assert_eq!(session.state(), SessionState::Ready);
    assert!(matches!(
        session
            .send_article(&OutgoingArticle::raw("Subject: x\r\n\r\ny"))
            .await,
        Err(NntpError::InvalidState(_))
    ));
    assert_eq!(finish(session, server).await, vec!["POST"]);
}

#[tokio::test]
async fn test_post_failed_after_transfer() {
    let script = Script::greeting()
        .read()
        .send("340 send article")
        .read_article()
        .send("441 Posting failed")
        .read()
        .send("111 20240101000000");
    let (mut session, server) = connect(script).await;

    session.post().await.unwrap();
    let err = session
        .send_article(&OutgoingArticle::raw("Subject: x\r\n\r\nbody"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 441,
            reason: "Posting failed",
            ..
        }
    ));
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.date().await.unwrap(), "20240101000000");
    finish(session, server).await;
}

#[tokio::test]
async fn test_other_commands_blocked_while_article_pending() {
    let script = Script::greeting()
        .read()
        .send("340 send article")
        .read_article()
        .send("240 ok");
    let (mut session, server) = connect(script).await;

    session.post().await.unwrap();
    let err = session.group("misc.test").await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidState(_)));

    session
        .send_article(&OutgoingArticle::raw("Subject: x\n\nbody\n"))
        .await
        .unwrap();

    let received = finish(session, server).await;
    assert_eq!(received, vec!["POST", "Subject: x\r\n\r\nbody"]);
}

#[tokio::test]
async fn test_ihave_transfer() {
    let script = Script::greeting()
        .read()
        .send("335 Send it; end with <CR-LF>.<CR-LF>")
        .read_article()
        .send("235 Article transferred OK");
    let (mut session, server) = connect(script).await;

    session.ihave("<i.am.an.article.you.will.want@example.com>").await.unwrap();
    assert_eq!(
        session.state(),
        SessionState::AwaitingArticle(TransferKind::Ihave)
    );
    let status = session
        .send_article(&OutgoingArticle::raw(format!(
            "Path: pathost!demo!somewhere!not-for-mail\r\n{}\r\n\r\nbody",
            HEADER
        )))
        .await
        .unwrap();
    assert_eq!(status.code, 235);

    let received = finish(session, server).await;
    assert_eq!(received[0], "IHAVE <i.am.an.article.you.will.want@example.com>");
}

#[tokio::test]
async fn test_ihave_not_wanted() {
    let script = Script::greeting()
        .read()
        .send("435 Duplicate");
    let (mut session, server) = connect(script).await;

    let err = session.ihave("<dup@example>").await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 435,
            reason: "Article not wanted",
            ..
        }
    ));
    finish(session, server).await;
}

#[tokio::test]
async fn test_ihave_rejected_after_transfer() {
    let script = Script::greeting()
        .read()
        .send("335 Send it")
        .read_article()
        .send("437 Article rejected; don't send again");
    let (mut session, server) = connect(script).await;

    session.ihave("<bad@example>").await.unwrap();
    let err = session
        .send_article(&OutgoingArticle::raw("Subject: x\r\n\r\nbody"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 437,
            command: "IHAVE",
            ..
        }
    ));
    finish(session, server).await;
}
