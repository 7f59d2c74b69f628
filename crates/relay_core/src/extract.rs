//! Payload extractor
//!
//! Upstream services interleave content frames with heartbeat and metadata
//! frames, and the content field moves around between dialects. Extraction is
//! an explicit ordered list of rules; the first rule producing non-blank text
//! wins, and a payload matching none of them is silently skipped.

use serde_json::Value;

/// One place a dialect is known to put the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// First choice's incremental delta: `choices[0].delta.content`
    ChoiceDelta,
    /// Top-level incremental delta: `delta`
    DeltaField,
    /// First choice's full message: `choices[0].message.content`
    ChoiceMessage,
    /// Top-level `text`
    TextField,
    /// Top-level `content`
    ContentField,
    /// Top-level `message.content`
    MessageContent,
    /// Top-level `output_text`, then `output`
    OutputText,
}

/// Rules in priority order; first match wins
pub const EXTRACTION_RULES: [ExtractionRule; 7] = [
    ExtractionRule::ChoiceDelta,
    ExtractionRule::DeltaField,
    ExtractionRule::ChoiceMessage,
    ExtractionRule::TextField,
    ExtractionRule::ContentField,
    ExtractionRule::MessageContent,
    ExtractionRule::OutputText,
];

impl ExtractionRule {
    /// Apply this rule to a parsed payload
    fn apply<'a>(self, payload: &'a Value) -> Option<&'a str> {
        match self {
            Self::ChoiceDelta => payload
                .get("choices")?
                .get(0)?
                .get("delta")?
                .get("content")?
                .as_str(),
            Self::DeltaField => payload.get("delta")?.as_str(),
            Self::ChoiceMessage => payload
                .get("choices")?
                .get(0)?
                .get("message")?
                .get("content")?
                .as_str(),
            Self::TextField => payload.get("text")?.as_str(),
            Self::ContentField => payload.get("content")?.as_str(),
            Self::MessageContent => payload.get("message")?.get("content")?.as_str(),
            Self::OutputText => payload
                .get("output_text")
                .or_else(|| payload.get("output"))?
                .as_str(),
        }
    }
}

/// Extract the delta text from a parsed payload, if any
pub fn extract_from_value(payload: &Value) -> Option<String> {
    EXTRACTION_RULES
        .iter()
        .find_map(|rule| rule.apply(payload).filter(|text| !text.trim().is_empty()))
        .map(ToString::to_string)
}

/// Extract the delta text from a raw frame payload, if any
///
/// An unparseable payload is not an error; heartbeat and metadata frames are
/// expected and yield `None`.
pub fn extract_delta(payload: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload).ok()?;
    extract_from_value(&value)
}
