use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

// =============================================================================
// Lead records (wire format of the CRM lead store)
// =============================================================================

/// One record per contact attempt, as returned by the CRM leads endpoint.
///
/// Deserialization is tolerant: every field except `id` defaults, and
/// `contactStatus` / `leadSentiment` stay raw strings so an unexpected
/// upstream value can never fail a fetch. Bucketing happens later via
/// [`ContactStatus::from_raw`] and [`SentimentBucket::from_raw`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    /// Free-form; never validated or normalized by this system.
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub contact_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message1_sent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message2_sent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message3_sent: Option<String>,
    /// Timestamp of the lead's first reply, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_received: Option<String>,
    /// Entire exchange as newline-delimited free text with ad hoc speaker
    /// markers. Formatted for display by `transcript::format_transcript`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_date: Option<String>,
    /// Upstream date field the store uses for time-range constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Soft-delete marker; deleted rows never reach the dashboard or modal.
    #[serde(default)]
    pub deleted: bool,
}

impl LeadRecord {
    /// Display name for drill-down rows ("first second", or the phone number
    /// when both name fields are blank).
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.second_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.phone_number.clone()
        } else {
            name.to_string()
        }
    }
}

/// A timestamp-ish field counts as present only when non-blank.
pub(crate) fn timestamp_present(field: &Option<String>) -> bool {
    field.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

// =============================================================================
// Contact status
// =============================================================================

/// Lifecycle state of a lead. The single source of truth for which status
/// bucket a lead falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactStatus {
    Hot,
    Positive,
    Negative,
    Removed,
    Sent1,
    Sent2,
    Sent3,
    Converted,
    Scheduled,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 9] = [
        ContactStatus::Hot,
        ContactStatus::Positive,
        ContactStatus::Negative,
        ContactStatus::Removed,
        ContactStatus::Sent1,
        ContactStatus::Sent2,
        ContactStatus::Sent3,
        ContactStatus::Converted,
        ContactStatus::Scheduled,
    ];

    /// Parse the raw CRM value. `None` means an unrecognized status — the
    /// lead still counts toward `totalLeads` but lands in the `other` bucket.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HOT" => Some(ContactStatus::Hot),
            "POSITIVE" => Some(ContactStatus::Positive),
            "NEGATIVE" => Some(ContactStatus::Negative),
            "REMOVED" => Some(ContactStatus::Removed),
            "SENT_1" => Some(ContactStatus::Sent1),
            "SENT_2" => Some(ContactStatus::Sent2),
            "SENT_3" => Some(ContactStatus::Sent3),
            "CONVERTED" => Some(ContactStatus::Converted),
            "SCHEDULED" => Some(ContactStatus::Scheduled),
            _ => None,
        }
    }

    /// Drill-down filter key for this status.
    pub fn filter_key(self) -> &'static str {
        match self {
            ContactStatus::Hot => "hot",
            ContactStatus::Positive => "positive",
            ContactStatus::Negative => "negative",
            ContactStatus::Removed => "removed",
            ContactStatus::Sent1 => "sent1",
            ContactStatus::Sent2 => "sent2",
            ContactStatus::Sent3 => "sent3",
            ContactStatus::Converted => "converted",
            ContactStatus::Scheduled => "scheduled",
        }
    }

    /// Human-readable tile label.
    pub fn label(self) -> &'static str {
        match self {
            ContactStatus::Hot => "Hot Leads",
            ContactStatus::Positive => "Positive",
            ContactStatus::Negative => "Negative",
            ContactStatus::Removed => "Removed",
            ContactStatus::Sent1 => "Message 1 Sent",
            ContactStatus::Sent2 => "Message 2 Sent",
            ContactStatus::Sent3 => "Message 3 Sent",
            ContactStatus::Converted => "Converted",
            ContactStatus::Scheduled => "Install Scheduled",
        }
    }

    /// Accent token the frontend maps to its palette. Exhaustive by
    /// construction — an unrecognized status can't reach this mapping.
    pub fn accent(self) -> &'static str {
        match self {
            ContactStatus::Hot => "amber",
            ContactStatus::Positive => "green",
            ContactStatus::Negative => "red",
            ContactStatus::Removed => "slate",
            ContactStatus::Sent1 | ContactStatus::Sent2 | ContactStatus::Sent3 => "sky",
            ContactStatus::Converted => "emerald",
            ContactStatus::Scheduled => "violet",
        }
    }
}

// =============================================================================
// Sentiment buckets
// =============================================================================

/// Sentiment partition over the same record set as the status partition.
/// Total: every lead maps to exactly one bucket; absence is `Unclear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentBucket {
    Positive,
    Negative,
    Neutral,
    NegativeRemoved,
    Unclear,
}

impl SentimentBucket {
    pub const ALL: [SentimentBucket; 5] = [
        SentimentBucket::Positive,
        SentimentBucket::Negative,
        SentimentBucket::Neutral,
        SentimentBucket::NegativeRemoved,
        SentimentBucket::Unclear,
    ];

    /// Bucket a raw sentiment value. Absent, blank, and unrecognized values
    /// all land in `Unclear` — never silently dropped from totals.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("positive") => SentimentBucket::Positive,
            Some("negative") => SentimentBucket::Negative,
            Some("neutral") => SentimentBucket::Neutral,
            Some("removed") => SentimentBucket::NegativeRemoved,
            _ => SentimentBucket::Unclear,
        }
    }

    pub fn filter_key(self) -> &'static str {
        match self {
            SentimentBucket::Positive => "sentiment-positive",
            SentimentBucket::Negative => "sentiment-negative",
            SentimentBucket::Neutral => "sentiment-neutral",
            SentimentBucket::NegativeRemoved => "sentiment-removed",
            SentimentBucket::Unclear => "sentiment-unclear",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentBucket::Positive => "Positive Sentiment",
            SentimentBucket::Negative => "Negative Sentiment",
            SentimentBucket::Neutral => "Neutral Sentiment",
            SentimentBucket::NegativeRemoved => "Removed (Negative)",
            SentimentBucket::Unclear => "Unclear Sentiment",
        }
    }
}

// =============================================================================
// Time ranges
// =============================================================================

/// Dashboard time-range selector. The CRM store receives the wire token and
/// applies its own boundary interpretation; [`TimeRange::cutoff`] documents
/// the convention this crate uses for fixtures and local filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Today,
    Week,
    Month,
    All,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::All => "all",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "today" => Some(TimeRange::Today),
            "week" => Some(TimeRange::Week),
            "month" => Some(TimeRange::Month),
            "all" => Some(TimeRange::All),
            _ => None,
        }
    }

    /// Inclusive lower bound for this range: local midnight for `today`,
    /// rolling 7 / 30 days for `week` / `month`, unbounded for `all`.
    pub fn cutoff(self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        match self {
            TimeRange::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .and_then(|midnight| midnight.and_local_timezone(Local).earliest()),
            TimeRange::Week => Some(now - Duration::days(7)),
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::All => None,
        }
    }
}

// =============================================================================
// Filter keys
// =============================================================================

/// A drill-down filter: one status bucket or one sentiment bucket.
///
/// Serializes as its wire key (`hot`, `sentiment-neutral`, …) so view state
/// and query strings share one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Status(ContactStatus),
    Sentiment(SentimentBucket),
}

impl FilterKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::Status(s) => s.filter_key(),
            FilterKey::Sentiment(s) => s.filter_key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Status(s) => s.label(),
            FilterKey::Sentiment(s) => s.label(),
        }
    }

    /// Deterministic key → filter mapping. Unknown keys are `None`; the query
    /// service reports them as `InvalidQuery` rather than matching nothing.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        for status in ContactStatus::ALL {
            if key == status.filter_key() {
                return Some(FilterKey::Status(status));
            }
        }
        for bucket in SentimentBucket::ALL {
            if key == bucket.filter_key() {
                return Some(FilterKey::Sentiment(bucket));
            }
        }
        None
    }

    /// Predicate this key selects over a lead record.
    pub fn matches(self, lead: &LeadRecord) -> bool {
        match self {
            FilterKey::Status(status) => {
                ContactStatus::from_raw(&lead.contact_status) == Some(status)
            }
            FilterKey::Sentiment(bucket) => {
                SentimentBucket::from_raw(lead.lead_sentiment.as_deref()) == bucket
            }
        }
    }
}

impl Serialize for FilterKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FilterKey::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown filter key '{}'", raw)))
    }
}

// =============================================================================
// Aggregate statistics (body of the analytics endpoint)
// =============================================================================

/// Per-message send counts plus their sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCounts {
    pub message1: u64,
    pub message2: u64,
    pub message3: u64,
    pub total: u64,
}

/// Lead counts per sentiment bucket. Sums to `totalLeads`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub negative_removed: u64,
    pub unclear: u64,
}

impl SentimentCounts {
    pub fn bump(&mut self, bucket: SentimentBucket) {
        *self.slot(bucket) += 1;
    }

    pub fn get(&self, bucket: SentimentBucket) -> u64 {
        match bucket {
            SentimentBucket::Positive => self.positive,
            SentimentBucket::Negative => self.negative,
            SentimentBucket::Neutral => self.neutral,
            SentimentBucket::NegativeRemoved => self.negative_removed,
            SentimentBucket::Unclear => self.unclear,
        }
    }

    pub fn total(&self) -> u64 {
        SentimentBucket::ALL.iter().map(|b| self.get(*b)).sum()
    }

    fn slot(&mut self, bucket: SentimentBucket) -> &mut u64 {
        match bucket {
            SentimentBucket::Positive => &mut self.positive,
            SentimentBucket::Negative => &mut self.negative,
            SentimentBucket::Neutral => &mut self.neutral,
            SentimentBucket::NegativeRemoved => &mut self.negative_removed,
            SentimentBucket::Unclear => &mut self.unclear,
        }
    }
}

/// Lead counts per contact status, plus `other` for unrecognized statuses
/// (counted toward `totalLeads`, excluded from the recognized breakdown).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub hot: u64,
    pub positive: u64,
    pub negative: u64,
    pub removed: u64,
    pub sent1: u64,
    pub sent2: u64,
    pub sent3: u64,
    pub converted: u64,
    pub scheduled: u64,
    #[serde(default)]
    pub other: u64,
}

impl StatusCounts {
    pub fn bump(&mut self, status: ContactStatus) {
        *self.slot(status) += 1;
    }

    pub fn get(&self, status: ContactStatus) -> u64 {
        match status {
            ContactStatus::Hot => self.hot,
            ContactStatus::Positive => self.positive,
            ContactStatus::Negative => self.negative,
            ContactStatus::Removed => self.removed,
            ContactStatus::Sent1 => self.sent1,
            ContactStatus::Sent2 => self.sent2,
            ContactStatus::Sent3 => self.sent3,
            ContactStatus::Converted => self.converted,
            ContactStatus::Scheduled => self.scheduled,
        }
    }

    /// Sum of the recognized buckets (excludes `other`).
    pub fn recognized_total(&self) -> u64 {
        ContactStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }

    fn slot(&mut self, status: ContactStatus) -> &mut u64 {
        match status {
            ContactStatus::Hot => &mut self.hot,
            ContactStatus::Positive => &mut self.positive,
            ContactStatus::Negative => &mut self.negative,
            ContactStatus::Removed => &mut self.removed,
            ContactStatus::Sent1 => &mut self.sent1,
            ContactStatus::Sent2 => &mut self.sent2,
            ContactStatus::Sent3 => &mut self.sent3,
            ContactStatus::Converted => &mut self.converted,
            ContactStatus::Scheduled => &mut self.scheduled,
        }
    }
}

/// Derived, read-only snapshot computed fresh per query — no identity, no
/// persistence. Also the JSON body of the analytics endpoint, so it is both
/// Serialize (this engine produces it) and Deserialize (consumers parse it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_leads: u64,
    pub messages_sent: MessageCounts,
    pub sentiment: SentimentCounts,
    pub status_breakdown: StatusCounts,
    /// Percentage with one-decimal precision; 0.0 when there are no leads.
    pub reply_rate: f64,
}

// =============================================================================
// Drill-down request (dashboard → modal handoff)
// =============================================================================

/// What the dashboard hands the modal when a statistic tile is clicked.
/// Always carries the dashboard's *current* time range, never a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrilldownRequest {
    pub filter: FilterKey,
    pub label: String,
    pub time_range: TimeRange,
}

// =============================================================================
// Contact form submission (wire format of the contact endpoint)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================
