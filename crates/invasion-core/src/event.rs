//! Invasion events and the sinks that receive them.
//!
//! The orchestrator reports every state change through an [`EventSink`].
//! Sinks observe; they never feed back into the simulation, and they have no
//! way to fail it. A sink that cannot deliver an event (a closed file, a
//! poisoned lock) drops it and logs a warning.
//!
//! Provided sinks:
//!
//! - [`TracingSink`] -- one structured `info` record per event.
//! - [`RecordingSink`] -- keeps events in memory behind a shared handle.
//! - [`JsonLinesSink`] -- writes one JSON object per line to any writer.
//! - [`NullSink`] -- discards everything.

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::alien::AlienId;

/// Something that happened during the invasion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvasionEvent {
    /// An alien walked down a road.
    Moved {
        /// The alien.
        alien: AlienId,
        /// City it left.
        from: String,
        /// City it arrived at.
        to: String,
    },
    /// An alien had no road out and is stuck for good.
    Trapped {
        /// The alien.
        alien: AlienId,
        /// City it is stuck in.
        city: String,
    },
    /// An alien arrived at a city that already had residents.
    Collision {
        /// The arriving alien.
        alien: AlienId,
        /// The first resident it found.
        rival: AlienId,
        /// Where it happened.
        city: String,
    },
    /// A city was removed from the world after a collision.
    CityDestroyed {
        /// The destroyed city.
        city: String,
        /// The arriving alien.
        alien: AlienId,
        /// The first resident.
        rival: AlienId,
    },
    /// A resident beyond the first died in the ruins of its city.
    TrappedInRuins {
        /// The alien.
        alien: AlienId,
        /// The destroyed city.
        city: String,
    },
}

/// Receiver for [`InvasionEvent`]s.
pub trait EventSink: Send {
    /// Called once per event, in the order events occur.
    fn on_event(&mut self, event: &InvasionEvent);
}

/// Logs each event through `tracing` at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&mut self, event: &InvasionEvent) {
        match event {
            InvasionEvent::Moved { alien, from, to } => {
                info!(alien = alien.get(), from = from.as_str(), to = to.as_str(), "Alien moved");
            }
            InvasionEvent::Trapped { alien, city } => {
                info!(alien = alien.get(), city = city.as_str(), "Alien is trapped forever");
            }
            InvasionEvent::Collision { alien, rival, city } => {
                info!(
                    alien = alien.get(),
                    rival = rival.get(),
                    city = city.as_str(),
                    "Alien found a rival"
                );
            }
            InvasionEvent::CityDestroyed { city, alien, rival } => {
                info!(
                    city = city.as_str(),
                    alien = alien.get(),
                    rival = rival.get(),
                    "City has been destroyed"
                );
            }
            InvasionEvent::TrappedInRuins { alien, city } => {
                info!(
                    alien = alien.get(),
                    city = city.as_str(),
                    "Alien is trapped forever in the ruins"
                );
            }
        }
    }
}

/// Stores events in memory.
///
/// Clones share the same buffer, so a test can keep one handle and give the
/// other to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<InvasionEvent>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out every event recorded so far.
    pub fn events(&self) -> Vec<InvasionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: &InvasionEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(_poisoned) => warn!("recording sink lock poisoned, event dropped"),
        }
    }
}

/// Writes each event as one line of JSON.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Return the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn on_event(&mut self, event: &InvasionEvent) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(e) = written {
            warn!(error = %e, "failed to write event, event dropped");
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &InvasionEvent) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn moved() -> InvasionEvent {
        InvasionEvent::Moved {
            alien: AlienId(1),
            from: "A".to_owned(),
            to: "B".to_owned(),
        }
    }

    #[test]
    fn recording_sink_shares_buffer_between_clones() {
        let handle = RecordingSink::new();
        let mut sink = handle.clone();
        assert!(handle.is_empty());

        sink.on_event(&moved());
        sink.on_event(&InvasionEvent::Trapped {
            alien: AlienId(2),
            city: "C".to_owned(),
        });

        assert_eq!(handle.len(), 2);
        assert_eq!(handle.events().first(), Some(&moved()));
    }

    #[test]
    fn json_lines_sink_writes_tagged_objects() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.on_event(&moved());
        sink.on_event(&InvasionEvent::TrappedInRuins {
            alien: AlienId(3),
            city: "B".to_owned(),
        });

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines.first().copied(),
            Some(r#"{"kind":"moved","alien":1,"from":"A","to":"B"}"#)
        );

        let decoded: InvasionEvent = serde_json::from_str(lines.get(1).unwrap()).unwrap();
        assert_eq!(
            decoded,
            InvasionEvent::TrappedInRuins {
                alien: AlienId(3),
                city: "B".to_owned(),
            }
        );
    }

    #[test]
    fn null_and_tracing_sinks_accept_events() {
        NullSink.on_event(&moved());
        TracingSink.on_event(&moved());
    }
}
