//! RFC 3977 Sections 5.2, 5.3, 7 and 8.4 - Server information and listings

use chrono::{TimeZone, Utc};
use nntp_engine::NntpError;

use crate::common::{Script, connect, finish};

#[tokio::test]
async fn test_capabilities() {
    let script = Script::greeting().read().send_raw(
        "101 Capability list:\r\nVERSION 2\r\nREADER\r\nLIST ACTIVE NEWSGROUPS\r\nSTARTTLS\r\n.\r\n",
    );
    let (mut session, server) = connect(script).await;

    let capabilities = session.capabilities().await.unwrap();
    assert_eq!(capabilities[0], "VERSION 2");
    assert!(capabilities.iter().any(|c| c == "STARTTLS"));
    assert_eq!(finish(session, server).await, vec!["CAPABILITIES"]);
}

#[tokio::test]
async fn test_mode_reader_updates_posting_flag() {
    let script = Script::new()
        .send("201 transit server")
        .read()
        .send("200 Reader mode, posting permitted");
    let (mut session, server) = connect(script).await;

    assert!(!session.posting_allowed());
    assert!(session.mode_reader().await.unwrap());
    assert!(session.posting_allowed());
    assert_eq!(finish(session, server).await, vec!["MODE READER"]);
}

#[tokio::test]
async fn test_mode_reader_502() {
    let script = Script::greeting()
        .read()
        .send("502 Transit service only");
    let (mut session, server) = connect(script).await;

    let err = session.mode_reader().await.unwrap_err();
    assert_eq!(err.code(), Some(502));
    finish(session, server).await;
}

#[tokio::test]
async fn test_date_returns_raw_text() {
    let script = Script::greeting().read().send("111 19990623135624");
    let (mut session, server) = connect(script).await;

    assert_eq!(session.date().await.unwrap(), "19990623135624");
    finish(session, server).await;
}

#[tokio::test]
async fn test_help() {
    let script = Script::greeting().read().send_raw(
        "100 Help text follows\r\nThis is some help text.  There is no specific\r\nformatting requirement.\r\n.\r\n",
    );
    let (mut session, server) = connect(script).await;

    let help = session.help().await.unwrap();
    assert_eq!(help.len(), 2);
    finish(session, server).await;
}

#[tokio::test]
async fn test_newgroups_line_and_parse() {
    let script = Script::greeting().read().send_raw(
        "231 list of new newsgroups follows\r\nalt.rfc-writers.recovery 4 1 y\r\ntx.natives.recovery 89 56 y\r\n.\r\n",
    );
    let (mut session, server) = connect(script).await;

    let since = Utc.with_ymd_and_hms(2019, 10, 27, 19, 0, 0).unwrap();
    let groups = session.new_groups(since, None).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "alt.rfc-writers.recovery");
    assert_eq!(groups[0].last, 4);
    assert_eq!(groups[0].first, 1);
    assert!(groups[0].posting_allowed());

    assert_eq!(
        finish(session, server).await,
        vec!["NEWGROUPS 191027 190000 GMT"]
    );
}

#[tokio::test]
async fn test_newnews_with_distributions() {
    let script = Script::greeting().read().send_raw(
        "230 list of new articles by message-id follows\r\n<i.am.a.new.article@example.com>\r\n<i.am.another.new.article@example.com>\r\n.\r\n",
    );
    let (mut session, server) = connect(script).await;

    let since = Utc.with_ymd_and_hms(2019, 1, 2, 3, 4, 5).unwrap();
    let ids = session
        .new_news("news.*,sci.*", since, Some("world"))
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[1], "<i.am.another.new.article@example.com>");

    assert_eq!(
        finish(session, server).await,
        vec!["NEWNEWS news.*,sci.* 190102 030405 GMT <world>"]
    );
}

#[tokio::test]
async fn test_list_skips_malformed_lines() {
    let script = Script::greeting().read().send_raw(
        "215 list of newsgroups follows\r\nmisc.test 3002322 3000234 y\r\nbroken line\r\ncomp.risks 442001 441099 m\r\n.\r\n",
    );
    let (mut session, server) = connect(script).await;

    let groups = session.list().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].posting, "m");
    assert!(!groups[1].posting_allowed());
    assert_eq!(finish(session, server).await, vec!["LIST"]);
}

#[tokio::test]
async fn test_list_active_wildmat() {
    let script = Script::greeting()
        .read()
        .send_raw("215 list follows\r\nalt.binaries.test 10 1 y\r\n.\r\n");
    let (mut session, server) = connect(script).await;

    let groups = session.list_active(Some("alt.binaries.*")).await.unwrap();
    assert_eq!(groups[0].name, "alt.binaries.test");
    assert_eq!(
        finish(session, server).await,
        vec!["LIST ACTIVE alt.binaries.*"]
    );
}

#[tokio::test]
async fn test_list_newsgroups() {
    let script = Script::greeting().read().send_raw(
        "215 information follows\r\nmisc.test General Usenet testing\r\nalt.rfc-writers.recovery\tRFC Writers Recovery\r\n.\r\n",
    );
    let (mut session, server) = connect(script).await;

    let descriptions = session.list_newsgroups(None).await.unwrap();
    assert_eq!(descriptions.len(), 2);
    assert_eq!(descriptions[0].description, "General Usenet testing");
    assert_eq!(descriptions[1].name, "alt.rfc-writers.recovery");
    assert_eq!(finish(session, server).await, vec!["LIST NEWSGROUPS"]);
}

#[tokio::test]
async fn test_list_newsgroups_503() {
    let script = Script::greeting()
        .read()
        .send("503 program error, function not performed");
    let (mut session, server) = connect(script).await;

    let err = session.list_newsgroups(Some("*")).await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::CommandRejected {
            code: 503,
            reason: "Internal server error, function not performed",
            ..
        }
    ));
    finish(session, server).await;
}

#[tokio::test]
async fn test_list_overview_fmt() {
    let script = Script::greeting().read().send_raw(
        "215 Order of fields in overview database.\r\nSubject:\r\nFrom:\r\nDate:\r\nMessage-ID:\r\nReferences:\r\n:bytes\r\n:lines\r\nXref:full\r\n.\r\n",
    );
    let (mut session, server) = connect(script).await;

    let fields = session.list_overview_fmt().await.unwrap();
    assert_eq!(fields.len(), 8);
    assert_eq!(fields[0].name, "Subject");
    assert_eq!(fields[5].name, ":bytes");
    assert!(fields[7].full);
    assert_eq!(finish(session, server).await, vec!["LIST OVERVIEW.FMT"]);
}
