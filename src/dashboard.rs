//! Dashboard view state: the loading / loaded / error machine behind the
//! statistics page, including stale-response suppression when the user
//! switches time ranges faster than fetches complete.

use serde::Serialize;

use crate::error::{AnalyticsError, ViewError};
use crate::types::{AggregateStats, DrilldownRequest, FilterKey, TimeRange};

/// What the dashboard currently shows. While loading, prior numbers are
/// hidden rather than displayed as current; on error, nothing numeric
/// renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardState {
    Loading,
    Loaded { stats: AggregateStats },
    Error { error: ViewError },
}

/// Ties an in-flight stats fetch to the selection that started it. A ticket
/// from a superseded selection no longer commits state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub time_range: TimeRange,
}

pub struct DashboardController {
    state: DashboardState,
    time_range: TimeRange,
    generation: u64,
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardController {
    /// A freshly mounted dashboard is already loading its initial range.
    pub fn new() -> Self {
        Self {
            state: DashboardState::Loading,
            time_range: TimeRange::All,
            generation: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    /// The fetch the constructor implies. Call once on mount.
    pub fn initial_load(&mut self) -> LoadTicket {
        self.state = DashboardState::Loading;
        self.ticket()
    }

    /// The user picked a time range. Re-enters `Loading` and invalidates
    /// every earlier ticket, including one for the same range.
    pub fn select_range(&mut self, range: TimeRange) -> LoadTicket {
        self.time_range = range;
        self.state = DashboardState::Loading;
        self.generation += 1;
        self.ticket()
    }

    fn ticket(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
            time_range: self.time_range,
        }
    }

    /// Commit a finished fetch. Returns false (and changes nothing) when the
    /// ticket comes from a selection the user has since abandoned.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        result: Result<AggregateStats, AnalyticsError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale stats response for {} (generation {} < {})",
                ticket.time_range.as_str(),
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.state = match result {
            Ok(stats) => DashboardState::Loaded { stats },
            Err(err) => {
                log::error!("dashboard load failed: {}", err);
                DashboardState::Error {
                    error: ViewError::from(&err),
                }
            }
        };
        true
    }

    /// A click on a statistic bucket. Carries the dashboard's *current*
    /// time range, not the one in effect when the stats were fetched.
    pub fn drilldown_request(&self, filter: FilterKey) -> DrilldownRequest {
        DrilldownRequest {
            filter,
            label: filter.label().to_string(),
            time_range: self.time_range,
        }
    }
}
