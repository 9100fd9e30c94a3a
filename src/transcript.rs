//! Conversation-transcript formatting.
//!
//! `conversationHistory` arrives as one free-text block with ad hoc speaker
//! markers. This module turns it into an ordered sequence of typed display
//! lines — a pure presentation transform that never writes back to the lead
//! record. The heuristic lives behind [`LineClassifier`] so a stricter
//! structured format can replace it without touching rendering code.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// How a single transcript line should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Timestamp/metadata marker (leading `[` or a DD/MM/YYYY-shaped prefix).
    Timestamp,
    /// Assistant-originated message bubble, speaker prefix stripped.
    Assistant,
    /// Lead-originated message bubble, speaker prefix stripped.
    Lead,
    /// Plain narrative text.
    Narrative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub text: String,
}

/// Classification seam: raw line in, typed line out. Implementations must be
/// pure — same input, same output, no side effects.
pub trait LineClassifier {
    fn classify(&self, line: &str) -> TranscriptLine;
}

/// Default heuristic: date-prefix detection plus case-insensitive speaker
/// markers (`ai:`/`bot:`/`assistant:` and `user:`/`customer:`/`lead:`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SpeakerMarkerClassifier;

const ASSISTANT_MARKERS: &[&str] = &["ai:", "bot:", "assistant:"];
const LEAD_MARKERS: &[&str] = &["user:", "customer:", "lead:"];

fn date_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}").expect("static date-prefix regex"))
}

/// Find the first speaker marker contained in `lower` and return the text
/// after it, trimmed.
fn strip_marker(line: &str, lower: &str, markers: &[&str]) -> Option<String> {
    let mut best: Option<(usize, usize)> = None;
    for marker in markers {
        if let Some(pos) = lower.find(marker) {
            let candidate = (pos, pos + marker.len());
            if best.map(|(p, _)| pos < p).unwrap_or(true) {
                best = Some(candidate);
            }
        }
    }
    best.map(|(_, end)| line[end..].trim().to_string())
}

impl LineClassifier for SpeakerMarkerClassifier {
    fn classify(&self, line: &str) -> TranscriptLine {
        let trimmed = line.trim();

        if trimmed.starts_with('[') || date_prefix_re().is_match(trimmed) {
            return TranscriptLine {
                kind: LineKind::Timestamp,
                text: trimmed.to_string(),
            };
        }

        // ASCII lowering keeps byte offsets aligned with the original line.
        let lower = trimmed.to_ascii_lowercase();
        if let Some(text) = strip_marker(trimmed, &lower, ASSISTANT_MARKERS) {
            return TranscriptLine {
                kind: LineKind::Assistant,
                text,
            };
        }
        if let Some(text) = strip_marker(trimmed, &lower, LEAD_MARKERS) {
            return TranscriptLine {
                kind: LineKind::Lead,
                text,
            };
        }

        TranscriptLine {
            kind: LineKind::Narrative,
            text: trimmed.to_string(),
        }
    }
}

/// Format a raw transcript with a specific classifier. Empty lines are
/// dropped before classification.
pub fn format_transcript_with(classifier: &dyn LineClassifier, raw: &str) -> Vec<TranscriptLine> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| classifier.classify(line))
        .collect()
}

/// Format a raw transcript with the default heuristic.
pub fn format_transcript(raw: &str) -> Vec<TranscriptLine> {
    format_transcript_with(&SpeakerMarkerClassifier, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: LineKind, text: &str) -> TranscriptLine {
        TranscriptLine {
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_reference_transcript() {
        let out = format_transcript("User: Hello\nAI: Hi there\nPlain note");
        assert_eq!(
            out,
            vec![
                line(LineKind::Lead, "Hello"),
                line(LineKind::Assistant, "Hi there"),
                line(LineKind::Narrative, "Plain note"),
            ]
        );
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let out = format_transcript("CUSTOMER: quote please\nassistant: on it\nBot: done");
        assert_eq!(out[0], line(LineKind::Lead, "quote please"));
        assert_eq!(out[1], line(LineKind::Assistant, "on it"));
        assert_eq!(out[2], line(LineKind::Assistant, "done"));
    }

    #[test]
    fn test_empty_lines_dropped() {
        let out = format_transcript("\n\nUser: Hi\n\n   \nAI: Hello\n");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_timestamp_lines() {
        let out = format_transcript("[2026-03-01 10:02] session start\n14/02/2026 follow-up call");
        assert_eq!(out[0].kind, LineKind::Timestamp);
        assert_eq!(out[0].text, "[2026-03-01 10:02] session start");
        assert_eq!(out[1].kind, LineKind::Timestamp);
    }

    #[test]
    fn test_date_prefix_must_lead_the_line() {
        let out = format_transcript("Installed on 14/02/2026 as agreed");
        assert_eq!(out[0].kind, LineKind::Narrative);
    }

    #[test]
    fn test_marker_mid_line_strips_preamble() {
        // Some exports prefix the speaker with a channel tag.
        let out = format_transcript("(sms) Lead: can you call after 6?");
        assert_eq!(out[0], line(LineKind::Lead, "can you call after 6?"));
    }

    #[test]
    fn test_assistant_marker_wins_over_later_lead_marker() {
        let out = format_transcript("AI: tell the customer: panels arrive Tuesday");
        assert_eq!(out[0].kind, LineKind::Assistant);
        assert_eq!(out[0].text, "tell the customer: panels arrive Tuesday");
    }

    #[test]
    fn test_narrative_passthrough() {
        let out = format_transcript("No answer, left voicemail");
        assert_eq!(out[0], line(LineKind::Narrative, "No answer, left voicemail"));
    }

    #[test]
    fn test_formatting_is_pure() {
        let raw = "User: Hi\nAI: Hello";
        assert_eq!(format_transcript(raw), format_transcript(raw));
        // Input is untouched — this is a read-only projection.
        assert_eq!(raw, "User: Hi\nAI: Hello");
    }
}
