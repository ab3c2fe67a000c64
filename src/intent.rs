//! Keyword intent router
//!
//! Classifies a transcript into a tool category or general chat. Matching is
//! deterministic, case-insensitive substring search over fixed keyword lists,
//! tested in priority order: weather > news > search > system > time > chat.
//! The first matching category wins; overlapping keywords resolve to the
//! earlier category. That priority is a policy choice, not scoring.

use serde::Serialize;

const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "forecast",
    "raining",
    "sunny",
    "humidity",
    "how hot",
    "how cold",
];

const NEWS_KEYWORDS: &[&str] = &["news", "headline", "headlines", "current events"];

const SEARCH_KEYWORDS: &[&str] = &["search", "look up", "google", "find information"];

const SYSTEM_KEYWORDS: &[&str] = &[
    "system",
    "cpu",
    "memory usage",
    "ram",
    "server stats",
    "performance",
];

const TIME_KEYWORDS: &[&str] = &["time", "date", "clock", "what day"];

/// Response strategy for one transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Weather,
    News,
    Search,
    System,
    Time,
    /// No tool keyword matched; forward to the chat adapter
    Chat,
}

impl Intent {
    /// Classify a transcript into a tool category or [`Intent::Chat`]
    #[must_use]
    pub fn classify(transcript: &str) -> Self {
        let text = transcript.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if matches(WEATHER_KEYWORDS) {
            Self::Weather
        } else if matches(NEWS_KEYWORDS) {
            Self::News
        } else if matches(SEARCH_KEYWORDS) {
            Self::Search
        } else if matches(SYSTEM_KEYWORDS) {
            Self::System
        } else if matches(TIME_KEYWORDS) {
            Self::Time
        } else {
            Self::Chat
        }
    }

    /// Wire name of the tool category, if any
    #[must_use]
    pub const fn function_name(self) -> Option<&'static str> {
        match self {
            Self::Weather => Some("weather"),
            Self::News => Some("news"),
            Self::Search => Some("search"),
            Self::System => Some("system"),
            Self::Time => Some("time"),
            Self::Chat => None,
        }
    }
}

/// Pull a location out of a transcript: the text after the last `in`, `for`,
/// or `at`, with trailing punctuation stripped
///
/// "What's the weather in Paris?" yields `Some("Paris")`.
#[must_use]
pub fn extract_location(transcript: &str) -> Option<String> {
    let lowered = transcript.to_lowercase();
    let position = ["in ", "for ", "at "].iter().find_map(|prep| {
        lowered
            .rfind(&format!(" {prep}"))
            .map(|idx| idx + 1 + prep.len())
    })?;

    // Index back into the original text; bail out if lowercasing shifted
    // byte offsets (non-ASCII transcripts).
    let location = transcript
        .get(position..)?
        .trim()
        .trim_end_matches(['?', '.', '!', ','])
        .trim();
    if location.is_empty() {
        None
    } else {
        Some(location.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_keyword_selects_weather() {
        assert_eq!(Intent::classify("What's the weather in Paris?"), Intent::Weather);
        assert_eq!(Intent::classify("TEMPERATURE outside"), Intent::Weather);
        assert_eq!(Intent::classify("is it raining"), Intent::Weather);
    }

    #[test]
    fn each_category_matches_its_keywords() {
        assert_eq!(Intent::classify("any news today?"), Intent::News);
        assert_eq!(Intent::classify("search for rust tutorials"), Intent::Search);
        assert_eq!(Intent::classify("how is the cpu doing"), Intent::System);
        assert_eq!(Intent::classify("what time is it"), Intent::Time);
    }

    #[test]
    fn overlap_resolves_to_higher_priority_category() {
        // Both weather and news keywords present: weather wins
        assert_eq!(
            Intent::classify("weather news for tomorrow"),
            Intent::Weather
        );
        // news beats search
        assert_eq!(Intent::classify("search the news"), Intent::News);
        // search beats time
        assert_eq!(Intent::classify("search for the best time to visit"), Intent::Search);
    }

    #[test]
    fn unmatched_transcript_falls_through_to_chat() {
        assert_eq!(Intent::classify("tell me a joke"), Intent::Chat);
        assert_eq!(Intent::classify(""), Intent::Chat);
    }

    #[test]
    fn function_name_is_none_only_for_chat() {
        assert_eq!(Intent::Weather.function_name(), Some("weather"));
        assert_eq!(Intent::Chat.function_name(), None);
    }

    #[test]
    fn extracts_location_after_preposition() {
        assert_eq!(
            extract_location("What's the weather in Paris?").as_deref(),
            Some("Paris")
        );
        assert_eq!(
            extract_location("forecast for New York City").as_deref(),
            Some("New York City")
        );
        assert_eq!(extract_location("weather please"), None);
    }

    #[test]
    fn location_uses_last_preposition() {
        assert_eq!(
            extract_location("in the morning, what's the weather in Tokyo?").as_deref(),
            Some("Tokyo")
        );
    }
}
