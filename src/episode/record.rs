// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Deserializer, Serialize};

use super::date::{DateStyle, format_display_date};

/// A single podcast episode, as delivered by the API or derived from a feed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Server-side identifier; absent in feeds and in older API responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub audio_url: String,
    /// Raw publication date exactly as the source delivered it
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub duration: String,
    #[serde(
        default,
        deserialize_with = "positive_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub episode_number: Option<u32>,
    #[serde(
        default,
        deserialize_with = "positive_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub season: Option<u32>,
    #[serde(default)]
    pub tracklist: Vec<String>,
}

impl EpisodeRecord {
    pub fn new(title: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            audio_url: audio_url.into(),
            pub_date: String::new(),
            duration: String::new(),
            episode_number: None,
            season: None,
            tracklist: Vec::new(),
        }
    }

    /// Whether the episode carries an audio URL that can be handed to a player
    pub fn is_playable(&self) -> bool {
        !self.audio_url.trim().is_empty()
    }

    pub fn has_tracklist(&self) -> bool {
        !self.tracklist.is_empty()
    }

    /// Publication date in display form, falling back to the raw value
    pub fn display_date(&self) -> String {
        format_display_date(&self.pub_date, DateStyle::Day)
    }
}

/// Parse a season or episode number, treating zero and failures as absent
pub fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Accepts `null`, numbers and numeric strings; anything that is not a
/// positive integer becomes `None` rather than an error.
fn positive_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0),
        Some(serde_json::Value::String(s)) => parse_positive(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "title": "Episode 1",
            "description": "Line one\nLine two",
            "audio_url": "https://example.com/ep1.mp3",
            "duration": "45:12",
            "pub_date": "2024-01-15T12:00:00",
            "episode_number": 1,
            "season": 2,
            "tracklist": ["A - One", "B - Two"]
        }"#;

        let record: EpisodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "Episode 1");
        assert_eq!(record.episode_number, Some(1));
        assert_eq!(record.season, Some(2));
        assert_eq!(record.tracklist, vec!["A - One", "B - Two"]);
        assert!(record.id.is_none());
        assert!(record.is_playable());
    }

    #[test]
    fn null_zero_and_garbage_numbers_are_absent() {
        let json = r#"[
            {"title": "a", "episode_number": null, "season": 0},
            {"title": "b", "episode_number": "x", "season": -3},
            {"title": "c", "episode_number": "4", "season": 1.5}
        ]"#;

        let records: Vec<EpisodeRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].episode_number, None);
        assert_eq!(records[0].season, None);
        assert_eq!(records[1].episode_number, None);
        assert_eq!(records[1].season, None);
        assert_eq!(records[2].episode_number, Some(4));
        assert_eq!(records[2].season, None);
    }

    #[test]
    fn missing_optional_fields_default() {
        let record: EpisodeRecord = serde_json::from_str(r#"{"title": "Bare"}"#).unwrap();
        assert_eq!(record.description, "");
        assert!(record.tracklist.is_empty());
        assert!(!record.is_playable());
        assert!(!record.has_tracklist());
    }

    #[test]
    fn serializes_without_absent_numbers() {
        let record = EpisodeRecord::new("Pilot", "https://example.com/pilot.mp3");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("episode_number"));
        assert!(!json.contains("season"));
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn parse_positive_rejects_zero() {
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive(" 12 "), Some(12));
        assert_eq!(parse_positive(""), None);
        assert_eq!(parse_positive("NaN"), None);
    }
}
