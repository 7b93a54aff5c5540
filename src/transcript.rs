use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL log of one session: every fetch outcome, store
/// mutation, and search lands here with a timestamp.
pub struct Transcript {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl Transcript {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn session_start(&mut self, endpoint: &str) -> Result<()> {
        self.log("session_start", serde_json::json!({ "endpoint": endpoint }))
    }

    pub fn fetch_started(&mut self) -> Result<()> {
        self.log("fetch_started", serde_json::json!({}))
    }

    pub fn fetch_completed(&mut self, count: usize) -> Result<()> {
        self.log("fetch_completed", serde_json::json!({ "count": count }))
    }

    pub fn fetch_failed(&mut self, error: &str) -> Result<()> {
        self.log("fetch_failed", serde_json::json!({ "error": error }))
    }

    pub fn user_added(&mut self, id: u64) -> Result<()> {
        self.log("user_added", serde_json::json!({ "id": id }))
    }

    pub fn user_updated(&mut self, id: u64) -> Result<()> {
        self.log("user_updated", serde_json::json!({ "id": id }))
    }

    pub fn user_deleted(&mut self, id: u64) -> Result<()> {
        self.log("user_deleted", serde_json::json!({ "id": id }))
    }

    /// Log a search along with how much of the list it matched.
    pub fn search(&mut self, query: &str, hits: usize, total: usize) -> Result<()> {
        self.log(
            "search",
            serde_json::json!({ "query": query, "hits": hits, "total": total }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_written_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");

        let mut transcript = Transcript::new(&path, "test-session").unwrap();
        transcript
            .session_start("https://example.com/users")
            .unwrap();
        transcript.fetch_started().unwrap();
        transcript.fetch_completed(10).unwrap();
        transcript.user_added(11).unwrap();
        transcript.search("ann", 2, 11).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "session_start");
        assert_eq!(first["session_id"], "test-session");

        let last: serde_json::Value = serde_json::from_str(lines[4]).unwrap();
        assert_eq!(last["type"], "search");
        assert_eq!(last["hits"], 2);
        assert_eq!(last["total"], 11);
    }
}
