// Twitch Helix response types.
// Only the fields needed to resolve a login and check for an active stream.

use serde::{Deserialize, Serialize};

/// Helix wraps every listing in a `data` array.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelixUser {
    pub id: String,
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelixStream {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Whether the configured channel is streaming right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveStatus {
    pub is_live: bool,
    pub label: String,
}

impl LiveStatus {
    pub fn from_stream_count(count: usize) -> Self {
        let is_live = count > 0;
        let label = if is_live {
            "Currently streaming!"
        } else {
            "Not currently streaming"
        };
        Self {
            is_live,
            label: label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_when_any_stream() {
        let status = LiveStatus::from_stream_count(1);
        assert!(status.is_live);
        assert_eq!(status.label, "Currently streaming!");
    }

    #[test]
    fn test_offline_when_no_streams() {
        let status = LiveStatus::from_stream_count(0);
        assert!(!status.is_live);
        assert_eq!(status.label, "Not currently streaming");
    }

    #[test]
    fn test_parse_streams_response() {
        let json = r#"{"data": [{"id": "1", "title": "coding", "viewer_count": 3}], "pagination": {}}"#;
        let list: HelixList<HelixStream> = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].title, "coding");
    }

    #[test]
    fn test_parse_empty_users_response() {
        let list: HelixList<HelixUser> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(list.data.is_empty());
    }
}
