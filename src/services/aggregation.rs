//! Aggregate-statistics computation over the lead store.
//!
//! `AggregateStats` is a pure projection of the store at query time: no
//! identity, no persistence, recomputed on every dashboard load or
//! time-range change.

use crate::error::AnalyticsError;
use crate::types::{
    timestamp_present, AggregateStats, ContactStatus, LeadRecord, SentimentBucket, TimeRange,
};

use super::LeadStore;

pub struct AggregationService<S> {
    store: S,
}

impl<S: LeadStore> AggregationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Compute summary statistics for a time range. Store failure or a
    /// malformed payload surfaces as an error — never as zero-valued
    /// statistics presented as current.
    pub async fn get_stats(&self, range: TimeRange) -> Result<AggregateStats, AnalyticsError> {
        let leads = self.store.fetch_leads(range).await?;
        Ok(aggregate(&leads))
    }
}

/// Pure aggregation over a fetched record set.
///
/// Soft-deleted records are excluded here and in the drill-down service, so
/// a bucket count of N on the dashboard always matches N drill-down rows.
/// Each live record lands in exactly one status bucket (or `other`) and
/// exactly one sentiment bucket.
pub fn aggregate(leads: &[LeadRecord]) -> AggregateStats {
    let mut stats = AggregateStats::default();
    let mut replies: u64 = 0;

    for lead in leads.iter().filter(|l| !l.deleted) {
        stats.total_leads += 1;

        if timestamp_present(&lead.message1_sent) {
            stats.messages_sent.message1 += 1;
        }
        if timestamp_present(&lead.message2_sent) {
            stats.messages_sent.message2 += 1;
        }
        if timestamp_present(&lead.message3_sent) {
            stats.messages_sent.message3 += 1;
        }

        stats
            .sentiment
            .bump(SentimentBucket::from_raw(lead.lead_sentiment.as_deref()));

        match ContactStatus::from_raw(&lead.contact_status) {
            Some(status) => stats.status_breakdown.bump(status),
            None => {
                stats.status_breakdown.other += 1;
                log::debug!(
                    "lead {} has unrecognized contact status '{}'",
                    lead.id,
                    lead.contact_status
                );
            }
        }

        if timestamp_present(&lead.reply_received) {
            replies += 1;
        }
    }

    stats.messages_sent.total =
        stats.messages_sent.message1 + stats.messages_sent.message2 + stats.messages_sent.message3;
    stats.reply_rate = reply_rate(replies, stats.total_leads);
    stats
}

/// Reply percentage with one-decimal precision; 0.0 for an empty set (never
/// NaN).
fn reply_rate(replies: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = replies as f64 * 100.0 / total as f64;
    (pct * 10.0).round() / 10.0
}
