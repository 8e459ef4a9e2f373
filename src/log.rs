use chrono::Local;
use serde::Serialize;
use std::collections::VecDeque;

const LOG_BUFFER_MAX: usize = 200;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// Bounded in-memory event log; the oldest entries fall off the front.
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new() -> Self {
        LogBuffer {
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, level: &str, message: String) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        self.entries.push_back(LogEntry {
            timestamp,
            level: level.to_string(),
            message,
        });
        while self.entries.len() > LOG_BUFFER_MAX {
            self.entries.pop_front();
        }
    }

    pub fn info(&mut self, message: String) {
        self.push("info", message);
    }

    pub fn error(&mut self, message: String) {
        self.push("error", message);
    }

    /// Entries from `since_index` on, for incremental polling.
    pub fn get(&self, since_index: usize) -> Vec<LogEntry> {
        self.entries.iter().skip(since_index).cloned().collect()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_records_level_and_timestamp() {
        let mut log = LogBuffer::new();
        log.info("Groove started".to_string());
        let entry = log.last().unwrap();
        assert_eq!(entry.level, "info");
        assert_eq!(entry.message, "Groove started");
        assert_eq!(entry.timestamp.len(), 8); // HH:MM:SS
    }

    #[test]
    fn buffer_is_bounded() {
        let mut log = LogBuffer::new();
        for i in 0..(LOG_BUFFER_MAX + 25) {
            log.info(format!("event {}", i));
        }
        assert_eq!(log.len(), LOG_BUFFER_MAX);
        assert_eq!(log.get(0)[0].message, "event 25");
    }

    #[test]
    fn get_skips_already_seen_entries() {
        let mut log = LogBuffer::new();
        log.info("a".to_string());
        log.error("b".to_string());
        let newer = log.get(1);
        assert_eq!(newer.len(), 1);
        assert_eq!(newer[0].level, "error");
    }
}
