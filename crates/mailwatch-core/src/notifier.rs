//! Announcements for newly seen messages.
//!
//! Each announcement is a short block of lines with the decoded subject and
//! one `From:` line per sender:
//!
//! ```text
//! ----------
//!
//! Subject: Hi
//! From: Alice <alice@example.com>
//!
//! ```

use std::io::{self, Write};

use crate::Result;
use crate::model::PersistedRecord;

/// Separator line that opens every announcement.
pub const SEPARATOR: &str = "----------";

/// Destination for rendered announcement lines.
pub trait NotificationSink {
    /// Emits one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be written.
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

/// Writes lines to any [`Write`], flushing after every line.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// Creates a sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> NotificationSink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

/// Sends lines to the log at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        tracing::info!(target: "mailwatch::notification", "{line}");
        Ok(())
    }
}

/// Renders and emits announcements.
#[derive(Debug)]
pub struct Notifier<S> {
    sink: S,
}

impl<S: NotificationSink> Notifier<S> {
    /// Creates a notifier writing to `sink`.
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Returns the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Announces a newly recorded message.
    ///
    /// `senders` is the sender list the record was built from.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails. Undecodable headers are not an
    /// error; they are shown raw.
    pub fn notify(&mut self, record: &PersistedRecord, senders: &[String]) -> Result<()> {
        for line in render(&record.subject, senders) {
            self.sink.emit(&line)?;
        }
        Ok(())
    }
}

/// Renders the announcement lines for a subject and senders.
#[must_use]
pub fn render(subject: &str, senders: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(senders.len() + 4);
    lines.push(SEPARATOR.to_string());
    lines.push(String::new());
    lines.push(format!("Subject: {}", decode_or_raw("subject", subject)));
    for sender in senders {
        lines.push(format!("From: {}", decode_or_raw("from", sender)));
    }
    lines.push(String::new());
    lines
}

/// Decodes RFC 2047 words in a header, falling back to the raw text.
#[must_use]
pub fn decode_or_raw(header: &str, raw: &str) -> String {
    match mailwatch_mime::decode_header(raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(header, raw, error = %e, "unable to decode header, showing it raw");
            raw.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    struct BrokenSink;

    impl NotificationSink for BrokenSink {
        fn emit(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn persisted(subject: &str) -> PersistedRecord {
        PersistedRecord {
            id: 1,
            message_id: "<m@example.com>".to_string(),
            subject: subject.to_string(),
            from_addresses: String::new(),
            internal_date: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
            create_time: Utc::now(),
        }
    }

    /// Records what has been flushed.
    #[derive(Default)]
    struct FlushLog {
        pending: Vec<u8>,
        flushed: Vec<String>,
    }

    impl Write for FlushLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            let chunk = std::mem::take(&mut self.pending);
            self.flushed.push(String::from_utf8(chunk).unwrap());
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_flushes_every_line() {
        let mut sink = WriterSink::new(FlushLog::default());
        sink.emit("Subject: Hi").unwrap();
        sink.emit("").unwrap();

        assert_eq!(sink.into_inner().flushed, vec!["Subject: Hi\n", "\n"]);
    }

    #[test]
    fn test_render_layout() {
        let lines = render(
            "=?UTF-8?Q?Hi?=",
            &["Alice <alice@example.com>".to_string(), " <bob@example.com>".to_string()],
        );
        assert_eq!(
            lines,
            vec![
                "----------",
                "",
                "Subject: Hi",
                "From: Alice <alice@example.com>",
                "From:  <bob@example.com>",
                "",
            ]
        );
    }

    #[test]
    fn test_render_without_senders() {
        assert_eq!(render("", &[]), vec!["----------", "", "Subject: ", ""]);
    }

    #[test]
    fn test_decode_failure_falls_back_per_header() {
        let lines = render(
            "=?x-unknown?Q?Hi?=",
            &["=?UTF-8?B?QWxpY2U=?= <alice@example.com>".to_string()],
        );
        assert_eq!(lines[2], "Subject: =?x-unknown?Q?Hi?=");
        assert_eq!(lines[3], "From: Alice <alice@example.com>");
    }

    #[test]
    fn test_notify_writes_to_sink() {
        let mut notifier = Notifier::new(WriterSink::new(Vec::new()));
        notifier
            .notify(&persisted("Weekly"), &["A <a@x>".to_string()])
            .unwrap();

        let out = String::from_utf8(notifier.into_sink().into_inner()).unwrap();
        assert_eq!(out, "----------\n\nSubject: Weekly\nFrom: A <a@x>\n\n");
    }

    #[test]
    fn test_notify_sink_failure_is_an_error() {
        let mut notifier = Notifier::new(BrokenSink);
        let result = notifier.notify(&persisted("x"), &[]);
        assert!(matches!(result, Err(crate::Error::Notify(_))));
    }

    #[test]
    fn test_tracing_sink_never_fails() {
        let mut sink = TracingSink;
        assert!(sink.emit("Subject: hi").is_ok());
    }
}
