//! Drill-down queries: the individual records behind a dashboard bucket.

use std::cmp::Reverse;

use crate::error::AnalyticsError;
use crate::types::{FilterKey, LeadRecord, TimeRange};

use super::LeadStore;

pub struct DrilldownService<S> {
    store: S,
}

impl<S: LeadStore> DrilldownService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch the live records matching a filter key within a time range,
    /// newest first. The result is a consistent snapshot of the store at
    /// query time; two calls may disagree if the store changed in between.
    pub async fn get_leads(
        &self,
        key: FilterKey,
        range: TimeRange,
    ) -> Result<Vec<LeadRecord>, AnalyticsError> {
        let mut leads: Vec<LeadRecord> = self
            .store
            .fetch_leads(range)
            .await?
            .into_iter()
            .filter(|l| !l.deleted && key.matches(l))
            .collect();
        sort_newest_first(&mut leads);
        log::debug!(
            "drill-down {} over {} returned {} leads",
            key.as_str(),
            range.as_str(),
            leads.len()
        );
        Ok(leads)
    }

    /// Same query driven by a raw wire key, for callers that take the key
    /// as an untyped string. An unknown key is the caller's error, not a
    /// store outage.
    pub async fn get_leads_by_key(
        &self,
        raw_key: &str,
        range: TimeRange,
    ) -> Result<Vec<LeadRecord>, AnalyticsError> {
        match FilterKey::parse(raw_key) {
            Some(key) => self.get_leads(key, range).await,
            None => {
                log::warn!("drill-down requested with unknown filter key '{}'", raw_key);
                Err(AnalyticsError::InvalidQuery(format!(
                    "unknown filter key '{}'",
                    raw_key
                )))
            }
        }
    }
}

/// Order by creation timestamp descending, then by id ascending so records
/// sharing a timestamp (or missing one) keep a stable position across
/// refreshes. Missing timestamps sort last.
fn sort_newest_first(leads: &mut [LeadRecord]) {
    leads.sort_by(|a, b| {
        let ka = a.created_at.as_deref().unwrap_or("");
        let kb = b.created_at.as_deref().unwrap_or("");
        Reverse(ka).cmp(&Reverse(kb)).then_with(|| a.id.cmp(&b.id))
    });
}
