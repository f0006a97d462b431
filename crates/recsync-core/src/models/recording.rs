use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one uploaded recording, as published in the index document.
///
/// Field order is the serialized order. Every field defaults to empty on read so
/// documents written without `level` still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// The file name; re-uploads under the same name share an id.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub topic: String,
    /// Last-modified time of the source file, RFC 3339 in UTC.
    #[serde(default)]
    pub start: String,
    /// Never computed; kept so consumers see a stable shape.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub link: String,
    /// Base file name, used to recognise already uploaded files.
    #[serde(default)]
    pub file: String,
}

impl Recording {
    /// Build the record for a freshly uploaded file.
    pub fn new(
        file_name: &str,
        topic_prefix: &str,
        modified: DateTime<Utc>,
        link: impl Into<String>,
    ) -> Self {
        let date_label = modified.with_timezone(&Local).format("%Y-%m-%d");
        Self {
            id: file_name.to_string(),
            level: topic_prefix.to_string(),
            topic: format!("{} {}", topic_prefix, date_label),
            start: modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            duration: String::new(),
            link: link.into(),
            file: file_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_recording_fields() {
        let modified = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let rec = Recording::new("a.mp4", "Level 1", modified, "https://cdn/x/a.mp4");

        let local_date = modified.with_timezone(&Local).format("%Y-%m-%d").to_string();
        assert_eq!(rec.id, "a.mp4");
        assert_eq!(rec.file, "a.mp4");
        assert_eq!(rec.level, "Level 1");
        assert_eq!(rec.topic, format!("Level 1 {}", local_date));
        assert_eq!(rec.start, "2024-05-01T09:30:00Z");
        assert!(rec.duration.is_empty());
        assert_eq!(rec.link, "https://cdn/x/a.mp4");
    }

    #[test]
    fn serializes_in_field_order() {
        let modified = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let rec = Recording::new("a.mp4", "Class", modified, "l");
        let json = serde_json::to_string(&rec).unwrap();
        let keys = ["\"id\"", "\"level\"", "\"topic\"", "\"start\"", "\"duration\"", "\"link\"", "\"file\""];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }

    #[test]
    fn deserializes_without_level() {
        let json = r#"{"id":"b.mp4","topic":"Class 2024-01-01","start":"2024-01-01T00:00:00Z","duration":"","link":"l","file":"b.mp4"}"#;
        let rec: Recording = serde_json::from_str(json).unwrap();
        assert_eq!(rec.file, "b.mp4");
        assert!(rec.level.is_empty());
    }
}
