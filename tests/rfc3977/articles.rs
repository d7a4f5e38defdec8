//! RFC 3977 Section 6.1.3-6.2.4 - Article retrieval and navigation

use nntp_engine::{ArticleId, ErrorKind, NntpError, SessionState};

use crate::common::{Script, connect, finish};

#[tokio::test]
async fn test_article_by_message_id() {
    let script = Script::greeting().read().send_raw(
        "220 0 <45223423@example.com>\r\n\
         Path: pathost!demo!whitehouse!not-for-mail\r\n\
         Subject: I am just a test article\r\n\
         \r\n\
         This is just a test article.\r\n\
         .\r\n",
    );
    let (mut session, server) = connect(script).await;

    let article = session
        .article(Some(ArticleId::from("<45223423@example.com>")))
        .await
        .unwrap();
    let pointer = article.pointer.clone().unwrap();
    assert_eq!(pointer.number, 0);
    assert_eq!(pointer.message_id, "<45223423@example.com>");
    assert_eq!(article.lines.len(), 4);
    assert_eq!(article.lines[2], "");
    assert!(article.to_text().ends_with("\r\n\r\nThis is just a test article."));

    assert_eq!(
        finish(session, server).await,
        vec!["ARTICLE <45223423@example.com>"]
    );
}

#[tokio::test]
async fn test_article_423_is_rejected_and_session_stays_usable() {
    let script = Script::greeting()
        .read()
        .send("423 no article with that number")
        .read()
        .send("223 3000234 <45223423@example.com> retrieved");
    let (mut session, server) = connect(script).await;

    let err = session
        .article(Some(ArticleId::Number(300256)))
        .await
        .unwrap_err();
    match &err {
        NntpError::CommandRejected {
            command,
            code,
            message,
            reason,
        } => {
            assert_eq!(*command, "ARTICLE");
            assert_eq!(*code, 423);
            assert_eq!(message, "no article with that number");
            assert_eq!(*reason, "No such article number in this group");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::CommandRejected);
    assert!(session.is_connected());
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.last_status().unwrap().code, 423);

    let pointer = session.stat(Some(ArticleId::Number(3000234))).await.unwrap();
    assert_eq!(pointer.number, 3000234);

    assert_eq!(
        finish(session, server).await,
        vec!["ARTICLE 300256", "STAT 3000234"]
    );
}

#[tokio::test]
async fn test_article_430_by_message_id() {
    let script = Script::greeting()
        .read()
        .send("430 No Such Article Found");
    let (mut session, server) = connect(script).await;

    let err = session
        .head(Some(ArticleId::from("<missing@example>")))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(430));
    assert_eq!(err.server_text(), Some("No Such Article Found"));
    finish(session, server).await;
}

#[tokio::test]
async fn test_head_and_body_of_current_article() {
    let script = Script::greeting()
        .read()
        .send_raw("221 3000234 <45223423@example.com>\r\nSubject: test\r\n.\r\n")
        .read()
        .send_raw("222 3000234 <45223423@example.com>\r\nHello\r\n.\r\n");
    let (mut session, server) = connect(script).await;

    let head = session.head(None).await.unwrap();
    assert_eq!(head.lines, vec!["Subject: test"]);
    let body = session.body(None).await.unwrap();
    assert_eq!(body.lines, vec!["Hello"]);
    assert_eq!(body.pointer.unwrap().number, 3000234);

    assert_eq!(finish(session, server).await, vec!["HEAD", "BODY"]);
}

#[tokio::test]
async fn test_next_and_last() {
    let script = Script::greeting()
        .read()
        .send("223 3000237 <668929@example.org> retrieved")
        .read()
        .send("421 No next article in this group")
        .read()
        .send("223 3000234 <45223423@example.com> retrieved");
    let (mut session, server) = connect(script).await;

    let next = session.next().await.unwrap();
    assert_eq!(next.number, 3000237);
    assert_eq!(next.message_id, "<668929@example.org>");

    let err = session.next().await.unwrap_err();
    assert_eq!(err.code(), Some(421));

    let last = session.last().await.unwrap();
    assert_eq!(last.number, 3000234);

    assert_eq!(finish(session, server).await, vec!["NEXT", "NEXT", "LAST"]);
}

#[tokio::test]
async fn test_no_group_selected() {
    let script = Script::greeting()
        .read()
        .send("412 No newsgroup selected");
    let (mut session, server) = connect(script).await;

    let err = session.last().await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 412,
            reason: "No newsgroup has been selected",
            ..
        }
    ));
    finish(session, server).await;
}

#[tokio::test]
async fn test_malformed_stat_pointer() {
    let script = Script::greeting().read().send("223 article exists");
    let (mut session, server) = connect(script).await;

    let err = session.stat(None).await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidResponse(_)));
    assert_eq!(session.state(), SessionState::Ready);
    finish(session, server).await;
}
