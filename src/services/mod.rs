//! Query services over the external Lead Record Store.
//!
//! The store itself is not implemented here — `crm_api::CrmClient` reaches
//! it over HTTP, and tests substitute an in-memory store. Both sit behind
//! [`LeadStore`] so the aggregation and drill-down logic stays I/O-free.

pub mod aggregation;
pub mod contact;
pub mod drilldown;

use async_trait::async_trait;

use crate::error::AnalyticsError;
use crate::types::{LeadRecord, TimeRange};

/// Read-only access to the lead record store, constrained by a time range.
/// The range boundary interpretation belongs to the store (opaque here).
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn fetch_leads(&self, range: TimeRange) -> Result<Vec<LeadRecord>, AnalyticsError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::{DateTime, Local};

    /// In-memory stand-in for the CRM store. Applies the documented
    /// `TimeRange::cutoff` convention against `createdAt`.
    pub struct MemoryLeadStore {
        pub leads: Vec<LeadRecord>,
        pub fail: bool,
    }

    impl MemoryLeadStore {
        pub fn new(leads: Vec<LeadRecord>) -> Self {
            Self { leads, fail: false }
        }

        pub fn offline() -> Self {
            Self {
                leads: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl LeadStore for MemoryLeadStore {
        async fn fetch_leads(
            &self,
            range: TimeRange,
        ) -> Result<Vec<LeadRecord>, AnalyticsError> {
            if self.fail {
                return Err(AnalyticsError::DataUnavailable("store offline".into()));
            }
            let cutoff = range.cutoff(Local::now());
            Ok(self
                .leads
                .iter()
                .filter(|lead| match cutoff {
                    None => true,
                    Some(cutoff) => lead
                        .created_at
                        .as_deref()
                        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                        .map(|dt| dt.with_timezone(&Local) >= cutoff)
                        .unwrap_or(false),
                })
                .cloned()
                .collect())
        }
    }

    /// Fixture builder used across service and view tests.
    pub fn lead(id: &str, status: &str, sentiment: Option<&str>) -> LeadRecord {
        LeadRecord {
            id: id.to_string(),
            first_name: String::new(),
            second_name: String::new(),
            phone_number: String::new(),
            contact_status: status.to_string(),
            lead_sentiment: sentiment.map(String::from),
            message1_sent: None,
            message2_sent: None,
            message3_sent: None,
            reply_received: None,
            conversation_history: None,
            install_date: None,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            deleted: false,
        }
    }
}
