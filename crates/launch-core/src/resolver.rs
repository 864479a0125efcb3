//! Launch-parameter resolution.
//!
//! Turns the host launch record into a [`ResolvedIntent`]. A `PAYLOAD` entry
//! carrying valid JSON wins over everything else in the record. Otherwise the
//! first value of every key is collected and searched for a video or playlist
//! reference.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::record::LaunchRecord;

/// Reserved key whose first value is JSON text from the cast/discover caller.
pub const PAYLOAD_KEY: &str = "PAYLOAD";

/// Accepted spellings, preferred first.
const VIDEO_KEYS: [&str; 2] = ["videoId", "v"];
const LIST_KEYS: [&str; 2] = ["listId", "list"];

/// Deep-link target: a video, a playlist, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    video_id: Option<String>,
    list_id: Option<String>,
}

impl MediaRef {
    /// Returns `None` unless at least one reference is present.
    pub fn new(video_id: Option<String>, list_id: Option<String>) -> Option<Self> {
        if video_id.is_none() && list_id.is_none() {
            return None;
        }
        Some(Self { video_id, list_id })
    }

    pub fn video(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            list_id: None,
        }
    }

    pub fn playlist(list_id: impl Into<String>) -> Self {
        Self {
            video_id: None,
            list_id: Some(list_id.into()),
        }
    }

    pub fn with_list(mut self, list_id: impl Into<String>) -> Self {
        self.list_id = Some(list_id.into());
        self
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref()
    }
}

/// Intent derived from one launch record.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIntent {
    None,
    /// Parsed `PAYLOAD`, or the collected mapping when it holds no known reference.
    RawPayload(Value),
    Media(MediaRef),
}

impl ResolvedIntent {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Resolve a launch record. Never fails: malformed payloads are logged and skipped.
pub fn resolve(record: Option<&LaunchRecord>) -> ResolvedIntent {
    let Some(record) = record else {
        debug!("no launch record supplied");
        return ResolvedIntent::None;
    };

    let mut params = Map::new();
    for entry in record.entries() {
        let Some(first) = entry.first_value() else {
            continue;
        };

        if entry.key == PAYLOAD_KEY {
            match serde_json::from_str::<Value>(first) {
                Ok(payload) => {
                    debug!("launch record carries a structured payload");
                    return ResolvedIntent::RawPayload(payload);
                }
                Err(error) => {
                    warn!(%error, "failed to parse PAYLOAD, continuing with remaining entries");
                }
            }
            continue;
        }

        params.insert(entry.key.clone(), Value::String(first.to_string()));
    }

    let video_id = first_present(&params, &VIDEO_KEYS);
    let list_id = first_present(&params, &LIST_KEYS);
    if let Some(media) = MediaRef::new(video_id, list_id) {
        return ResolvedIntent::Media(media);
    }

    if params.is_empty() {
        ResolvedIntent::None
    } else {
        ResolvedIntent::RawPayload(Value::Object(params))
    }
}

// Empty strings count as absent so `v` can back up an empty `videoId`.
fn first_present(params: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| params.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(entries: &[(&str, &[&str])]) -> LaunchRecord {
        entries
            .iter()
            .fold(LaunchRecord::default(), |record, (key, values)| {
                record.with_entry(*key, values.iter().copied())
            })
    }

    #[test]
    fn absent_record_resolves_to_none() {
        assert_eq!(resolve(None), ResolvedIntent::None);
    }

    #[test]
    fn empty_record_resolves_to_none() {
        assert_eq!(resolve(Some(&LaunchRecord::default())), ResolvedIntent::None);
    }

    #[test]
    fn valid_payload_short_circuits_after_other_entries() {
        let record = record(&[
            ("videoId", &["ignored"]),
            (PAYLOAD_KEY, &[r#"{"videoId":"abc123"}"#]),
            ("list", &["also-ignored"]),
        ]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::RawPayload(json!({"videoId": "abc123"}))
        );
    }

    #[test]
    fn malformed_payload_falls_back_to_key_scan() {
        let record = record(&[(PAYLOAD_KEY, &["{not json"]), ("v", &["xyz"])]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::Media(MediaRef::video("xyz"))
        );
    }

    #[test]
    fn malformed_payload_alone_resolves_to_none() {
        let record = record(&[(PAYLOAD_KEY, &["{not json"])]);
        assert_eq!(resolve(Some(&record)), ResolvedIntent::None);
    }

    #[test]
    fn later_valid_payload_wins_over_earlier_malformed_one() {
        let record = record(&[(PAYLOAD_KEY, &["oops"]), (PAYLOAD_KEY, &["[1,2]"])]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::RawPayload(json!([1, 2]))
        );
    }

    #[test]
    fn payload_without_values_is_skipped() {
        let record = record(&[(PAYLOAD_KEY, &[]), ("listId", &["PL9"])]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::Media(MediaRef::playlist("PL9"))
        );
    }

    #[test]
    fn preferred_spellings_win_over_fallbacks() {
        let record = record(&[
            ("v", &["fallback-video"]),
            ("videoId", &["preferred-video"]),
            ("list", &["fallback-list"]),
            ("listId", &["preferred-list"]),
        ]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::Media(MediaRef::video("preferred-video").with_list("preferred-list"))
        );
    }

    #[test]
    fn empty_preferred_value_uses_fallback_spelling() {
        let record = record(&[("videoId", &[""]), ("v", &["abc"])]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::Media(MediaRef::video("abc"))
        );
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let record = record(&[("v", &["first"]), ("v", &["second"])]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::Media(MediaRef::video("second"))
        );
    }

    #[test]
    fn unknown_keys_pass_through_as_raw_mapping() {
        let record = record(&[("launch_source", &["dial"]), ("t", &["42", "ignored"])]);
        assert_eq!(
            resolve(Some(&record)),
            ResolvedIntent::RawPayload(json!({"launch_source": "dial", "t": "42"}))
        );
    }

    #[test]
    fn entries_without_values_are_not_collected() {
        let record = record(&[("v", &[]), ("other", &[])]);
        assert_eq!(resolve(Some(&record)), ResolvedIntent::None);
    }

    #[test]
    fn media_ref_requires_one_reference() {
        assert!(MediaRef::new(None, None).is_none());
        let media = MediaRef::new(None, Some("PL".to_string())).expect("playlist only");
        assert_eq!(media.video_id(), None);
        assert_eq!(media.list_id(), Some("PL"));
    }
}
