//! Opt-in stage snapshots.
//!
//! Simulators report intermediate values to a [`TraceSink`]. Callers that do
//! not care pass [`NoTrace`]; [`Trace`] keeps every event in order.

use maxeb_types::TraceEvent;

/// Receiver for stage snapshots.
pub trait TraceSink {
    /// Record one snapshot.
    fn record(&mut self, event: TraceEvent);

    /// Whether snapshots are kept. Lets callers skip building expensive events.
    fn enabled(&self) -> bool {
        true
    }
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _event: TraceEvent) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Ordered log of stage snapshots from one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Events whose stage name is `stage`.
    pub fn stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.stage() == stage)
    }
}

impl TraceSink for Trace {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
