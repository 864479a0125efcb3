//! Destination address for the video surface.

use std::fmt;

use crate::resolver::ResolvedIntent;

/// Fully qualified address handed to the app-control facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination(String);

impl Destination {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct DestinationBuilder {
    base_address: String,
}

impl DestinationBuilder {
    pub fn new(base_address: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
        }
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Appends `v` then `list`. Raw payloads are passed through untouched and
    /// never inspected for references.
    pub fn build(&self, intent: &ResolvedIntent) -> Destination {
        let mut address = self.base_address.clone();
        if let ResolvedIntent::Media(media) = intent {
            if let Some(video_id) = media.video_id() {
                push_query_param(&mut address, "v", video_id);
            }
            if let Some(list_id) = media.list_id() {
                push_query_param(&mut address, "list", list_id);
            }
        }
        Destination(address)
    }
}

fn push_query_param(address: &mut String, name: &str, value: &str) {
    address.push(if address.contains('?') { '&' } else { '?' });
    address.push_str(name);
    address.push('=');
    address.push_str(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MediaRef;
    use serde_json::json;

    const BASE: &str = "https://www.youtube.com/tv";

    fn build(intent: &ResolvedIntent) -> String {
        DestinationBuilder::new(BASE).build(intent).into_string()
    }

    #[test]
    fn none_keeps_base_address() {
        assert_eq!(build(&ResolvedIntent::None), BASE);
    }

    #[test]
    fn raw_payload_is_never_flattened() {
        let intent = ResolvedIntent::RawPayload(json!({"videoId": "abc123", "listId": "PL"}));
        assert_eq!(build(&intent), BASE);
    }

    #[test]
    fn video_only_appends_v() {
        let intent = ResolvedIntent::Media(MediaRef::video("abc"));
        assert_eq!(build(&intent), format!("{BASE}?v=abc"));
    }

    #[test]
    fn video_and_playlist_keep_field_order() {
        let intent = ResolvedIntent::Media(MediaRef::video("abc").with_list("PL1"));
        assert_eq!(build(&intent), format!("{BASE}?v=abc&list=PL1"));
    }

    #[test]
    fn playlist_only_starts_query_section() {
        let intent = ResolvedIntent::Media(MediaRef::playlist("PL1"));
        assert_eq!(build(&intent), format!("{BASE}?list=PL1"));
    }

    #[test]
    fn base_with_existing_query_uses_ampersand() {
        let builder = DestinationBuilder::new("https://tv.example.com/app?lang=en");
        let intent = ResolvedIntent::Media(MediaRef::video("abc").with_list("PL1"));
        assert_eq!(
            builder.build(&intent).as_str(),
            "https://tv.example.com/app?lang=en&v=abc&list=PL1"
        );
    }

    #[test]
    fn reference_strings_are_not_escaped() {
        let intent = ResolvedIntent::Media(MediaRef::video("a b&c"));
        assert_eq!(build(&intent), format!("{BASE}?v=a b&c"));
    }
}
