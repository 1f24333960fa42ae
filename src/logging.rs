//! Logfmt-style log lines.
//!
//! Every event renders as a single line:
//!
//! ```text
//! time=2026-10-19T08:15:02Z level=info msg="loading IMAGE_NAME=travis-ci-garnet-trusty"
//! ```
//!
//! Lines go to stderr so that stdout carries nothing but the registration
//! response.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// `time=… level=… msg=…` event formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogfmtFormat;

impl<S, N> FormatEvent<S, N> for LogfmtFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        writeln!(
            writer,
            "{}",
            format_line(Utc::now(), event.metadata().level(), &visitor.finish())
        )
    }
}

/// Render one log line.
pub fn format_line(time: DateTime<Utc>, level: &Level, msg: &str) -> String {
    format!(
        "time={} level={} msg={:?}",
        time.format("%Y-%m-%dT%H:%M:%SZ"),
        level.to_string().to_lowercase(),
        msg
    )
}

/// Collects the `message` field, appending any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    extra: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.extra.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.extra.trim_start().to_string()
        } else {
            self.message + &self.extra
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.extra, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.extra, " {}={:?}", field.name(), value);
        }
    }
}
