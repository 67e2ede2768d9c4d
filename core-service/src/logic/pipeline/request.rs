//! Flow Request - one submission as seen by the core

use crate::constants::ANONYMOUS_CLIENT;
use crate::logic::features::RawFeatures;

/// Raw features plus the caller identity and free-text note
#[derive(Debug, Clone, Default)]
pub struct FlowRequest {
    pub features: RawFeatures,
    pub client: Option<String>,
    pub note: String,
}

impl FlowRequest {
    /// The note is taken from the `note` field of the mapping, if any
    pub fn new(features: RawFeatures, client: Option<String>) -> Self {
        let note = features.text("note").unwrap_or_default();
        Self {
            features,
            client,
            note,
        }
    }

    pub fn client_or_default(&self) -> &str {
        match self.client.as_deref() {
            Some(client) if !client.trim().is_empty() => client,
            _ => ANONYMOUS_CLIENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_and_client() {
        let raw = RawFeatures::new().with("duration", 1.0).with("note", "lab run");
        let request = FlowRequest::new(raw, None);
        assert_eq!(request.note, "lab run");
        assert_eq!(request.client_or_default(), "-");

        let request = FlowRequest::new(RawFeatures::new(), Some("10.0.0.7".to_string()));
        assert_eq!(request.note, "");
        assert_eq!(request.client_or_default(), "10.0.0.7");
    }
}
