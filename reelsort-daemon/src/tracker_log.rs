//! Tracing layer that mirrors operator-relevant log events into the
//! status tracker's bounded log ring.

use std::fmt;
use std::sync::Arc;

use reelsort_core::tracker::StatusTracker;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Debug)]
pub struct TrackerLogLayer {
    tracker: Arc<StatusTracker>,
}

impl TrackerLogLayer {
    pub fn new(tracker: Arc<StatusTracker>) -> Self {
        Self { tracker }
    }
}

impl<S: Subscriber> Layer<S> for TrackerLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Only INFO and louder reach the surface.
        if *event.metadata().level() > Level::INFO {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.tracker
                .add_log(event.metadata().level().as_str(), &message);
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}
