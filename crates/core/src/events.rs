//! Observer side of [`GameEvent`]s.
//!
//! Sinks are fire-and-forget: they return nothing and must not fail back into
//! the core. Audio, score display and logging all hang off this trait.

use crate::types::GameEvent;

pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Collects events, mostly for tests and replays.
impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Forwards each event to every sink in order.
pub fn dispatch<'a>(
    events: impl IntoIterator<Item = GameEvent>,
    sinks: &mut [&mut (dyn EventSink + 'a)],
) {
    for event in events {
        for sink in sinks.iter_mut() {
            sink.on_event(&event);
        }
    }
}
