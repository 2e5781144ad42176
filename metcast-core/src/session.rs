//! Lookup state as a sequence of immutable snapshots.
//!
//! Every search gets a fresh [`RequestToken`]. Events produced by a search
//! carry its token and are dropped once a newer search has started, so an
//! old response can never overwrite a newer one.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::{
    error::WeatherError,
    model::{CurrentConditions, DaySummary, ResolvedPlace},
    units::TemperatureUnit,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SearchRequested { query: String },
    CoordinatesResolved { token: RequestToken, place: ResolvedPlace },
    ResolutionFailed { token: RequestToken, error: WeatherError },
    ForecastReceived { token: RequestToken, current: CurrentConditions, days: Vec<DaySummary> },
    ForecastFailed { token: RequestToken, error: WeatherError },
    UnitToggled,
}

impl Event {
    fn token(&self) -> Option<RequestToken> {
        match self {
            Event::CoordinatesResolved { token, .. }
            | Event::ResolutionFailed { token, .. }
            | Event::ForecastReceived { token, .. }
            | Event::ForecastFailed { token, .. } => Some(*token),
            Event::SearchRequested { .. } | Event::UnitToggled => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    latest: RequestToken,
    pub query: Option<String>,
    pub place: Option<ResolvedPlace>,
    pub current: CurrentConditions,
    pub days: Vec<DaySummary>,
    pub unit: TemperatureUnit,
    pub loading: bool,
    /// Inline message for the user; only geocoding failures set it.
    pub error: Option<String>,
}

impl SessionState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { unit, ..Default::default() }
    }

    /// Token of the most recent search.
    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    pub fn apply(&self, event: Event) -> SessionState {
        if let Some(token) = event.token() {
            if token != self.latest {
                tracing::debug!(?token, latest = ?self.latest, "Discarding stale event");
                return self.clone();
            }
        }

        let mut next = self.clone();
        match event {
            Event::SearchRequested { query } => {
                next.latest = self.latest.next();
                next.query = Some(query);
                next.loading = true;
                next.error = None;
            }
            Event::CoordinatesResolved { place, .. } => {
                next.place = Some(place);
                next.current = CurrentConditions::default();
                next.days = Vec::new();
            }
            Event::ResolutionFailed { error, .. } => {
                next.loading = false;
                match error {
                    // Already logged by the resolver; keep what we had.
                    WeatherError::LocationUnavailable { .. } => {}
                    other => next.error = Some(other.to_string()),
                }
            }
            Event::ForecastReceived { current, days, .. } => {
                next.current = current;
                next.days = days;
                next.loading = false;
            }
            Event::ForecastFailed { error, .. } => {
                tracing::warn!("fetch {error}");
                next.current = CurrentConditions::default();
                next.days = Vec::new();
                next.loading = false;
            }
            Event::UnitToggled => {
                next.unit = self.unit.toggled();
            }
        }
        next
    }

    /// Current temperature in the selected unit.
    pub fn display_temperature(&self) -> Option<String> {
        self.current.temperature_c.map(|c| self.unit.format(c))
    }

    /// Forecast days that have data.
    pub fn visible_days(&self) -> impl Iterator<Item = &DaySummary> {
        self.days.iter().filter(|d| !d.is_empty())
    }
}

/// Shared holder for [`SessionState`]; every update goes through
/// [`SessionState::apply`].
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { state: Mutex::new(SessionState::new(unit)) }
    }

    /// Apply `event` and return the resulting snapshot.
    pub fn dispatch(&self, event: Event) -> SessionState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = state.apply(event);
        state.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
