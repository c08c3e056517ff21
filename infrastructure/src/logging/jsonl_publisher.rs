//! JSONL file writer for room publications.
//!
//! Each [`RoomPublication`] is serialized as a single JSON line carrying its
//! `event` tag plus the `room` code and a `timestamp`, appended to the file via
//! a buffered writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tablepick_application::{RoomPublication, RoomPublisher};
use tablepick_domain::RoomCode;
use tracing::warn;

/// Room publisher that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Appends to an existing file and
/// flushes on `Drop`.
pub struct JsonlRoomPublisher {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRoomPublisher {
    /// Open (or create) the log at the given path.
    ///
    /// Creates parent directories as needed. Returns `None` if the file cannot
    /// be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create publication log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open publication log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RoomPublisher for JsonlRoomPublisher {
    fn publish(&self, room: &RoomCode, publication: RoomPublication) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match serde_json::to_value(&publication) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(other) => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
            Err(e) => {
                warn!(
                    "Could not serialize {} for room {}: {}",
                    publication.event_type(),
                    room,
                    e
                );
                return;
            }
        };
        record.insert("room".to_string(), serde_json::Value::String(room.to_string()));
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line) {
                warn!("Could not write to {}: {}", self.path.display(), e);
                return;
            }
            // Flushed per line; readers tail this file
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlRoomPublisher {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablepick_domain::room::DecisionSource;
    use tablepick_domain::{Decision, RestaurantId, Tally};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_publisher_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooms.jsonl");
        let publisher = JsonlRoomPublisher::new(&path).unwrap();
        let room = RoomCode::new("ABCDEF").unwrap();

        publisher.publish(
            &room,
            RoomPublication::TallyChanged {
                tally: Tally::default(),
                voted: 1,
                total: 3,
            },
        );
        publisher.publish(
            &room,
            RoomPublication::Finalized {
                decision: Decision::Winner {
                    restaurant: RestaurantId::new("r-1"),
                    support: 2,
                    tie_broken: false,
                    source: DecisionSource::Votes,
                },
            },
        );
        drop(publisher);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line["room"], "ABCDEF");
            assert!(line.get("timestamp").is_some());
        }
        assert_eq!(lines[0]["event"], "tally_changed");
        assert_eq!(lines[0]["voted"], 1);
        assert_eq!(lines[1]["event"], "finalized");
        assert_eq!(lines[1]["decision"]["restaurant"], "r-1");
    }

    #[test]
    fn test_publisher_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rooms.jsonl");
        let room = RoomCode::new("ROOM1").unwrap();

        for _ in 0..2 {
            let publisher = JsonlRoomPublisher::new(&path).unwrap();
            publisher.publish(&room, RoomPublication::Abandoned);
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["event"], "abandoned");
    }
}
