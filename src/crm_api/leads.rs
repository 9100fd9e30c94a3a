//! Leads query + contact submission endpoints.

use serde::Deserialize;

use super::CrmClient;
use crate::error::AnalyticsError;
use crate::services::LeadStore;
use crate::types::{ContactSubmission, FilterKey, LeadRecord, TimeRange};

/// Envelope of `GET /api/leads`.
#[derive(Debug, Deserialize)]
struct LeadsEnvelope {
    #[serde(default)]
    leads: Vec<LeadRecord>,
}

impl CrmClient {
    /// Fetch lead records for a time range, optionally asking the store to
    /// pre-filter. The drill-down predicate is always re-applied locally, so
    /// a server that ignores `filter` only costs payload size, never
    /// correctness.
    pub async fn fetch_leads(
        &self,
        range: TimeRange,
        filter: Option<FilterKey>,
    ) -> Result<Vec<LeadRecord>, AnalyticsError> {
        let url = self.endpoint("api/leads")?;
        let mut req = self.get(url).query(&[("timeRange", range.as_str())]);
        if let Some(key) = filter {
            req = req.query(&[("filter", key.as_str())]);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalyticsError::InvalidQuery(body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalyticsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        // Malformed JSON is an availability problem, not a caller bug.
        let envelope: LeadsEnvelope = resp.json().await?;
        log::debug!(
            "fetched {} leads (timeRange={})",
            envelope.leads.len(),
            range.as_str()
        );
        Ok(envelope.leads)
    }

    /// Fire-and-forget contact submission. No retry; a non-200 becomes a
    /// user-visible error. `submission_id` lets the server dedupe should the
    /// same form ever be posted twice.
    pub async fn submit_contact(
        &self,
        submission: &ContactSubmission,
        submission_id: &str,
    ) -> Result<(), AnalyticsError> {
        let url = self.endpoint("api/submit-contact")?;
        let resp = self
            .post(url)
            .header("X-Submission-Id", submission_id)
            .json(submission)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalyticsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        log::info!("contact submission {} accepted", submission_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl LeadStore for CrmClient {
    async fn fetch_leads(&self, range: TimeRange) -> Result<Vec<LeadRecord>, AnalyticsError> {
        CrmClient::fetch_leads(self, range, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leads_envelope_deserialization() {
        let json = r#"{
            "leads": [
                {
                    "id": "lead-1",
                    "firstName": "Priya",
                    "secondName": "Kaur",
                    "phoneNumber": "07700 900001",
                    "contactStatus": "SENT_2",
                    "leadSentiment": "neutral",
                    "message1Sent": "2026-03-02T09:00:00Z",
                    "message2Sent": "2026-03-04T09:00:00Z"
                },
                {
                    "id": "lead-2",
                    "contactStatus": "HOT"
                }
            ]
        }"#;

        let envelope: LeadsEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.leads.len(), 2);
        assert_eq!(envelope.leads[0].first_name, "Priya");
        assert!(envelope.leads[0].message3_sent.is_none());
        assert_eq!(envelope.leads[1].contact_status, "HOT");
    }

    #[test]
    fn test_leads_envelope_missing_key() {
        // A store mid-deploy may omit the array; that's an empty set, not an
        // availability failure.
        let envelope: LeadsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.leads.is_empty());
    }

    #[test]
    fn test_contact_submission_wire_shape() {
        let submission = ContactSubmission {
            name: "Sam Ellery".to_string(),
            email: "sam@example.com".to_string(),
            phone: "07700 900999".to_string(),
            message: "Interested in a 12-panel install.".to_string(),
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["name"], "Sam Ellery");
        assert_eq!(json["email"], "sam@example.com");
        assert_eq!(json["phone"], "07700 900999");
        assert_eq!(json["message"], "Interested in a 12-panel install.");
    }
}
