//! Drill-down modal state: the record list behind a clicked dashboard
//! bucket, with single-lead transcript expansion.
//!
//! Every open triggers a fresh fetch — results are never cached across
//! opens, so the list always reflects the store at click time.

use serde::Serialize;

use crate::error::{AnalyticsError, ViewError};
use crate::transcript::{format_transcript, TranscriptLine};
use crate::types::{DrilldownRequest, LeadRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModalState {
    Closed,
    Loading,
    /// An error and a genuinely empty bucket are distinct states; "no leads
    /// found" only ever means the latter.
    Loaded { leads: Vec<LeadRecord> },
    Empty,
    Error { error: ViewError },
}

/// Ties an in-flight drill-down fetch to the open that started it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalTicket {
    generation: u64,
    pub request: DrilldownRequest,
}

pub struct DrilldownModal {
    state: ModalState,
    /// Label and filter of the current open, kept for the title bar.
    request: Option<DrilldownRequest>,
    expanded: Option<String>,
    generation: u64,
}

impl Default for DrilldownModal {
    fn default() -> Self {
        Self::new()
    }
}

impl DrilldownModal {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            request: None,
            expanded: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn request(&self) -> Option<&DrilldownRequest> {
        self.request.as_ref()
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    /// Open for a bucket click. Clears any previous filter's rows and
    /// expansion before the new fetch starts, so the old list can never
    /// render under the new title.
    pub fn open(&mut self, request: DrilldownRequest) -> ModalTicket {
        self.generation += 1;
        self.expanded = None;
        self.state = ModalState::Loading;
        self.request = Some(request.clone());
        ModalTicket {
            generation: self.generation,
            request,
        }
    }

    /// Commit a finished fetch. A ticket from a superseded open (or from
    /// before a close) is discarded.
    pub fn apply(
        &mut self,
        ticket: ModalTicket,
        result: Result<Vec<LeadRecord>, AnalyticsError>,
    ) -> bool {
        if ticket.generation != self.generation || !self.is_open() {
            log::debug!(
                "discarding stale drill-down response for '{}'",
                ticket.request.label
            );
            return false;
        }
        self.state = match result {
            Ok(leads) if leads.is_empty() => ModalState::Empty,
            Ok(leads) => ModalState::Loaded { leads },
            Err(err) => {
                log::error!("drill-down load failed: {}", err);
                ModalState::Error {
                    error: ViewError::from(&err),
                }
            }
        };
        true
    }

    /// Toggle one lead's transcript. At most one lead is expanded; clicking
    /// another lead moves the expansion, clicking the same one collapses it.
    pub fn toggle_expanded(&mut self, lead_id: &str) {
        if self.expanded.as_deref() == Some(lead_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(lead_id.to_string());
        }
    }

    pub fn expanded_lead_id(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// The formatted transcript of the currently expanded lead, if it is
    /// present in the loaded list.
    pub fn expanded_transcript(&self) -> Option<Vec<TranscriptLine>> {
        let id = self.expanded.as_deref()?;
        let ModalState::Loaded { leads } = &self.state else {
            return None;
        };
        let lead = leads.iter().find(|l| l.id == id)?;
        Some(format_transcript(
            lead.conversation_history.as_deref().unwrap_or(""),
        ))
    }

    /// Close and forget everything; the next open starts from scratch.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = ModalState::Closed;
        self.request = None;
        self.expanded = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::lead;
    use crate::transcript::LineKind;
    use crate::types::{ContactStatus, FilterKey, TimeRange};

    fn request(label: &str) -> DrilldownRequest {
        DrilldownRequest {
            filter: FilterKey::Status(ContactStatus::Hot),
            label: label.to_string(),
            time_range: TimeRange::All,
        }
    }

    fn rows() -> Vec<LeadRecord> {
        let mut leads = vec![
            lead("a", "HOT", Some("positive")),
            lead("b", "HOT", None),
        ];
        leads[0].conversation_history =
            Some("User: Hello\nAI: Hi there\nPlain note".to_string());
        leads
    }

    #[test]
    fn test_open_load_render() {
        let mut modal = DrilldownModal::new();
        assert!(!modal.is_open());

        let ticket = modal.open(request("Hot Leads"));
        assert_eq!(*modal.state(), ModalState::Loading);

        assert!(modal.apply(ticket, Ok(rows())));
        assert!(matches!(modal.state(), ModalState::Loaded { leads } if leads.len() == 2));
        assert_eq!(modal.request().unwrap().label, "Hot Leads");
    }

    #[test]
    fn test_empty_and_error_are_distinct() {
        let mut modal = DrilldownModal::new();
        let ticket = modal.open(request("Hot Leads"));
        modal.apply(ticket, Ok(vec![]));
        assert_eq!(*modal.state(), ModalState::Empty);

        let ticket = modal.open(request("Hot Leads"));
        modal.apply(
            ticket,
            Err(AnalyticsError::DataUnavailable("store unreachable".into())),
        );
        assert!(matches!(modal.state(), ModalState::Error { .. }));
    }

    #[test]
    fn test_reopen_discards_previous_fetch() {
        let mut modal = DrilldownModal::new();
        let first = modal.open(request("Hot Leads"));
        let second = modal.open(request("Converted"));

        assert!(modal.apply(second, Ok(vec![])));
        // The first open's rows arrive late and must not appear under the
        // new title.
        assert!(!modal.apply(first, Ok(rows())));
        assert_eq!(*modal.state(), ModalState::Empty);
        assert_eq!(modal.request().unwrap().label, "Converted");
    }

    #[test]
    fn test_close_invalidates_in_flight_fetch() {
        let mut modal = DrilldownModal::new();
        let ticket = modal.open(request("Hot Leads"));
        modal.close();
        assert!(!modal.apply(ticket, Ok(rows())));
        assert_eq!(*modal.state(), ModalState::Closed);
    }

    #[test]
    fn test_expansion_toggles_and_moves() {
        let mut modal = DrilldownModal::new();
        let ticket = modal.open(request("Hot Leads"));
        modal.apply(ticket, Ok(rows()));

        modal.toggle_expanded("a");
        assert_eq!(modal.expanded_lead_id(), Some("a"));
        // Clicking another lead moves the expansion in one step.
        modal.toggle_expanded("b");
        assert_eq!(modal.expanded_lead_id(), Some("b"));
        // Clicking the expanded lead collapses it.
        modal.toggle_expanded("b");
        assert_eq!(modal.expanded_lead_id(), None);
    }

    #[test]
    fn test_expanded_transcript_is_formatted() {
        let mut modal = DrilldownModal::new();
        let ticket = modal.open(request("Hot Leads"));
        modal.apply(ticket, Ok(rows()));
        modal.toggle_expanded("a");

        let lines = modal.expanded_transcript().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, LineKind::Lead);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].kind, LineKind::Assistant);
        assert_eq!(lines[2].kind, LineKind::Narrative);
    }

    #[test]
    fn test_close_resets_expansion() {
        let mut modal = DrilldownModal::new();
        let ticket = modal.open(request("Hot Leads"));
        modal.apply(ticket, Ok(rows()));
        modal.toggle_expanded("a");

        modal.close();
        assert_eq!(modal.expanded_lead_id(), None);

        let ticket = modal.open(request("Converted"));
        modal.apply(ticket, Ok(vec![]));
        assert_eq!(modal.expanded_lead_id(), None);
        assert_eq!(*modal.state(), ModalState::Empty);
    }

    #[test]
    fn test_state_serializes_tagged() {
        let mut modal = DrilldownModal::new();
        let json = serde_json::to_value(modal.state()).unwrap();
        assert_eq!(json["status"], "closed");

        let ticket = modal.open(request("Hot Leads"));
        modal.apply(ticket, Ok(rows()));
        let json = serde_json::to_value(modal.state()).unwrap();
        assert_eq!(json["status"], "loaded");
        assert_eq!(json["leads"].as_array().unwrap().len(), 2);
    }
}
