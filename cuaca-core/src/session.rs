//! Query lifecycle for interactive frontends.
//!
//! Tracks the idle/loading/ready/failed display state and guards against a
//! stale response landing after a newer query has started: every attempt
//! takes a monotonically increasing ticket and only the newest ticket may
//! publish its outcome.

use crate::error::WeatherError;
use crate::model::WeatherSnapshot;

/// Display state driven by the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready(WeatherSnapshot),
    Failed(WeatherError),
}

/// Identifies one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Session {
    phase: Phase,
    last_ticket: u64,
    current_city: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt: any prior error or result is cleared and the
    /// session enters loading.
    pub fn begin(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.phase = Phase::Loading;
        Ticket(self.last_ticket)
    }

    /// Publish the outcome of an attempt. Returns false when the ticket is
    /// stale, in which case the outcome is discarded.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        outcome: Result<WeatherSnapshot, WeatherError>,
    ) -> bool {
        if ticket.0 != self.last_ticket {
            return false;
        }

        match outcome {
            Ok(snapshot) => {
                self.current_city = Some(snapshot.current.city.clone());
                self.phase = Phase::Ready(snapshot);
            }
            Err(err) => self.phase = Phase::Failed(err),
        }

        true
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The resolved city of the last successful attempt; retries replay it
    /// by name. Failures leave it in place.
    pub fn retry_city(&self) -> Option<&str> {
        self.current_city.as_deref()
    }
}
