//! Lead-analytics engine for a solar-installation marketing site.
//!
//! The crate turns the raw lead records held in an external CRM into the
//! dashboard a sales team actually looks at: aggregate statistics by contact
//! status and sentiment, drill-down queries behind each statistic, formatted
//! conversation transcripts, and the view state machines (dashboard, modal,
//! contact form) that keep stale responses from ever rendering as current.

pub mod crm_api;
pub mod dashboard;
pub mod error;
pub mod modal;
pub mod services;
pub mod state;
pub mod transcript;
pub mod types;

pub use crm_api::CrmClient;
pub use dashboard::{DashboardController, DashboardState, LoadTicket};
pub use error::{AnalyticsError, ErrorKind, ViewError};
pub use modal::{DrilldownModal, ModalState, ModalTicket};
pub use services::aggregation::{aggregate, AggregationService};
pub use services::contact::{ContactFormController, ContactFormState, SubmitOutcome};
pub use services::drilldown::DrilldownService;
pub use services::LeadStore;
pub use transcript::{format_transcript, LineKind, TranscriptLine};
pub use types::{
    AggregateStats, ContactStatus, ContactSubmission, DrilldownRequest, FilterKey, LeadRecord,
    SentimentBucket, TimeRange,
};
