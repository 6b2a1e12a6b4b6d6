//! Mailbox reader tests against a scripted IMAP server.

use mailwatch_core::{Error, ImapSession, fetch_messages};
use mailwatch_imap::Client;
use tokio_test::io::{Builder, Mock};

async fn session(mock: Mock) -> ImapSession<Mock> {
    let client = Client::from_stream(mock).await.unwrap();
    ImapSession::from(client.login("watcher", "secret").await.unwrap())
}

fn login(builder: &mut Builder) -> &mut Builder {
    builder
        .read(b"* OK [CAPABILITY IMAP4rev1] ready\r\n")
        .write(b"A0000 LOGIN watcher secret\r\n")
        .read(b"A0000 OK logged in\r\n")
}

#[tokio::test]
async fn test_reads_every_message_then_logs_out() {
    let mock = login(&mut Builder::new())
        .write(b"A0001 EXAMINE Junk\r\n")
        .read(b"* 2 EXISTS\r\n")
        .read(b"A0001 OK [READ-ONLY] done\r\n")
        .write(b"A0002 FETCH 1:2 (ENVELOPE INTERNALDATE)\r\n")
        .read(
            b"* 1 FETCH (ENVELOPE (NIL \"=?UTF-8?Q?Hi?=\" \
((\"Alice\" NIL \"alice\" \"example.com\")) NIL NIL NIL NIL NIL NIL \"<a@example.com>\") \
INTERNALDATE \" 7-Mar-2024 09:00:00 +0000\")\r\n",
        )
        .read(
            b"* 2 FETCH (ENVELOPE (NIL NIL \
((NIL NIL \"bob\" \"example.org\")(\"Carol\" NIL \"carol\" \"example.org\")) \
NIL NIL NIL NIL NIL NIL NIL) INTERNALDATE \"08-Mar-2024 10:30:00 -0500\")\r\n",
        )
        .read(b"A0002 OK done\r\n")
        .write(b"A0003 LOGOUT\r\n")
        .read(b"* BYE bye\r\n")
        .read(b"A0003 OK done\r\n")
        .build();

    let records = fetch_messages(session(mock).await, "Junk", 1).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message_id, "<a@example.com>");
    assert_eq!(records[0].subject, "=?UTF-8?Q?Hi?=");
    assert_eq!(records[0].senders, vec!["Alice <alice@example.com>"]);
    assert_eq!(records[0].internal_date.to_rfc3339(), "2024-03-07T09:00:00+00:00");

    assert_eq!(records[1].message_id, "");
    assert_eq!(records[1].subject, "");
    assert_eq!(
        records[1].senders,
        vec![" <bob@example.org>", "Carol <carol@example.org>"]
    );
    assert_eq!(records[1].internal_date.to_rfc3339(), "2024-03-08T10:30:00-05:00");
}

#[tokio::test]
async fn test_flag_update_during_fetch_is_skipped() {
    let mock = login(&mut Builder::new())
        .write(b"A0001 EXAMINE Junk\r\n")
        .read(b"* 1 EXISTS\r\n")
        .read(b"A0001 OK [READ-ONLY] done\r\n")
        .write(b"A0002 FETCH 1 (ENVELOPE INTERNALDATE)\r\n")
        .read(b"* 1 FETCH (FLAGS (\\Seen))\r\n")
        .read(
            b"* 1 FETCH (ENVELOPE (NIL \"Prize\" NIL NIL NIL NIL NIL NIL NIL \"<p@example.net>\") \
INTERNALDATE \"09-Mar-2024 12:00:00 +0100\")\r\n",
        )
        .read(b"A0002 OK done\r\n")
        .write(b"A0003 LOGOUT\r\n")
        .read(b"A0003 OK done\r\n")
        .build();

    let records = fetch_messages(session(mock).await, "Junk", 1).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message_id, "<p@example.net>");
    assert_eq!(records[0].subject, "Prize");
}

#[tokio::test]
async fn test_fetch_missing_internal_date_fails_read() {
    let mock = login(&mut Builder::new())
        .write(b"A0001 EXAMINE Junk\r\n")
        .read(b"* 1 EXISTS\r\n")
        .read(b"A0001 OK [READ-ONLY] done\r\n")
        .write(b"A0002 FETCH 1 (ENVELOPE INTERNALDATE)\r\n")
        .read(b"* 1 FETCH (ENVELOPE (NIL NIL NIL NIL NIL NIL NIL NIL NIL \"<q@example.net>\"))\r\n")
        .read(b"A0002 OK done\r\n")
        .write(b"A0003 LOGOUT\r\n")
        .read(b"A0003 OK done\r\n")
        .build();

    let result = fetch_messages(session(mock).await, "Junk", 1).await;
    assert!(matches!(
        result,
        Err(Error::IncompleteFetch { seq: 1, item: "INTERNALDATE" })
    ));
}

#[tokio::test]
async fn test_empty_mailbox_issues_no_fetch() {
    let mock = login(&mut Builder::new())
        .write(b"A0001 EXAMINE Junk\r\n")
        .read(b"* 0 EXISTS\r\n")
        .read(b"A0001 OK [READ-ONLY] done\r\n")
        .write(b"A0002 LOGOUT\r\n")
        .read(b"A0002 OK done\r\n")
        .build();

    let records = fetch_messages(session(mock).await, "Junk", 4).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_fetch_no_fails_whole_read() {
    let mock = login(&mut Builder::new())
        .write(b"A0001 EXAMINE Junk\r\n")
        .read(b"* 2 EXISTS\r\n")
        .read(b"A0001 OK [READ-ONLY] done\r\n")
        .write(b"A0002 FETCH 1:2 (ENVELOPE INTERNALDATE)\r\n")
        .read(
            b"* 1 FETCH (ENVELOPE (NIL NIL NIL NIL NIL NIL NIL NIL NIL \"<x@y>\") \
INTERNALDATE \"07-Mar-2024 09:00:00 +0000\")\r\n",
        )
        .read(b"A0002 NO [SERVERBUG] fetch failed\r\n")
        .write(b"A0003 LOGOUT\r\n")
        .read(b"A0003 OK done\r\n")
        .build();

    let result = fetch_messages(session(mock).await, "Junk", 4).await;
    assert!(matches!(
        result,
        Err(Error::Imap(mailwatch_imap::Error::No(text))) if text == "fetch failed"
    ));
}

#[tokio::test]
async fn test_examine_failure_returns_server_error() {
    let mock = login(&mut Builder::new())
        .write(b"A0001 EXAMINE Missing\r\n")
        .read(b"A0001 NO [NONEXISTENT] no such mailbox\r\n")
        .build();

    // The failed EXAMINE consumes the client, so there is nothing left to
    // log out of and no further traffic is expected.
    let result = fetch_messages(session(mock).await, "Missing", 4).await;
    assert!(matches!(result, Err(Error::Imap(mailwatch_imap::Error::No(_)))));
}

#[tokio::test]
async fn test_logout_failure_is_not_an_error() {
    let mock = login(&mut Builder::new())
        .write(b"A0001 EXAMINE Junk\r\n")
        .read(b"* 0 EXISTS\r\n")
        .read(b"A0001 OK [READ-ONLY] done\r\n")
        .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        .build();

    let records = fetch_messages(session(mock).await, "Junk", 4).await.unwrap();
    assert!(records.is_empty());
}
