//! Console forwarding for `tracing` events.
//!
//! The polyfill reports problems only as console warnings. This layer
//! renders each event's message and fields into one line and hands it to
//! a sink, which in the browser is `console.warn` and friends.

use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Receives rendered events
pub type ConsoleSink = Box<dyn Fn(Level, &str) + Send + Sync + 'static>;

/// `tracing-subscriber` layer writing events to a console sink.
pub struct ConsoleLayer {
    /// Most verbose level forwarded
    max_level: Level,
    sink: ConsoleSink,
}

impl ConsoleLayer {
    /// Forward events at `max_level` or more severe to `sink`.
    pub fn new(max_level: Level, sink: ConsoleSink) -> Self {
        Self { max_level, sink }
    }

    /// Whether an event at `level` is forwarded.
    pub fn forwards(&self, level: &Level) -> bool {
        *level <= self.max_level
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if !self.forwards(&level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        (self.sink)(level, &visitor.line);
    }
}

/// Collects `message` first, then `key=value` for other fields
#[derive(Default)]
struct MessageVisitor {
    line: String,
}

impl MessageVisitor {
    fn separate(&mut self) {
        if !self.line.is_empty() {
            self.line.push(' ');
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.separate();
        if field.name() == "message" {
            self.line.push_str(value);
        } else {
            let _ = write!(self.line, "{}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.separate();
        if field.name() == "message" {
            let _ = write!(self.line, "{:?}", value);
        } else {
            let _ = write!(self.line, "{}={:?}", field.name(), value);
        }
    }
}
