use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

pub type SharedLogStore = Arc<Mutex<LogStore>>;

/// Bounded ring of formatted log lines shown in the dashboard footer.
pub struct LogStore {
    lines: VecDeque<String>,
    capacity: usize,
    written: u64,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.clamp(1, 1024)),
            capacity: capacity.max(1),
            written: 0,
        }
    }

    pub fn shared(capacity: usize) -> SharedLogStore {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.trim().is_empty() {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        self.written = self.written.wrapping_add(1);
    }

    /// Total lines accepted so far, including evicted ones. The UI compares it between
    /// frames to know when the footer needs a redraw.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// The newest `limit` lines, oldest first.
    pub fn tail(&self, limit: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(limit);
        self.lines.iter().skip(skip).cloned().collect()
    }
}

#[derive(Clone)]
pub struct LogMakeWriter {
    store: SharedLogStore,
}

impl LogMakeWriter {
    pub fn new(store: SharedLogStore) -> Self {
        Self { store }
    }
}

impl<'a> MakeWriter<'a> for LogMakeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            store: self.store.clone(),
            buffer: Vec::new(),
        }
    }
}

/// Buffers raw bytes and hands complete lines to the store; the remainder is flushed on drop.
pub struct LineWriter {
    store: SharedLogStore,
    buffer: Vec<u8>,
}

impl LineWriter {
    fn drain_complete_lines(&mut self) {
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line);
            self.store.lock().push_line(text.trim_end_matches(['\r', '\n']));
        }
    }
}

impl Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.drain_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_complete_lines();
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            let rest = String::from_utf8_lossy(&self.buffer).trim().to_string();
            self.store.lock().push_line(rest);
            self.buffer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_keeps_newest_lines() {
        let mut store = LogStore::new(2);
        store.push_line("a");
        store.push_line("b");
        store.push_line("c");
        assert_eq!(store.tail(10), vec!["b", "c"]);
        assert_eq!(store.tail(1), vec!["c"]);
        assert_eq!(store.written(), 3);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let mut store = LogStore::new(4);
        store.push_line("   ");
        assert_eq!(store.written(), 0);
    }

    #[test]
    fn writer_splits_lines_and_flushes_remainder_on_drop() {
        let store = LogStore::shared(8);
        let make = LogMakeWriter::new(store.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"first\r\nsec").unwrap();
            writer.write_all(b"ond\npartial").unwrap();
            assert_eq!(store.lock().tail(8), vec!["first", "second"]);
        }
        assert_eq!(store.lock().tail(8), vec!["first", "second", "partial"]);
    }
}
