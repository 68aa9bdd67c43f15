//! Counts `session released` events emitted by `Session::drop`.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Tracing layer recording the `authenticated` flag of every released session.
#[derive(Clone, Default)]
pub struct ReleaseLog {
    released: Arc<Mutex<Vec<bool>>>,
}

impl ReleaseLog {
    /// Route this thread's events through the log until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn total(&self) -> usize {
        self.released.lock().unwrap().len()
    }

    pub fn authenticated(&self) -> usize {
        self.released.lock().unwrap().iter().filter(|flag| **flag).count()
    }
}

impl<S: Subscriber> Layer<S> for ReleaseLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("ideacheck") {
            return;
        }

        let mut fields = ReleaseFields::default();
        event.record(&mut fields);
        if fields.message.as_deref() == Some("session released") {
            self.released
                .lock()
                .unwrap()
                .push(fields.authenticated.unwrap_or(false));
        }
    }
}

#[derive(Default)]
struct ReleaseFields {
    message: Option<String>,
    authenticated: Option<bool>,
}

impl Visit for ReleaseFields {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "authenticated" {
            self.authenticated = Some(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}
