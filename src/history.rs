use std::collections::VecDeque;

/// Ordered store of accepted search patterns, oldest first.
pub trait HistoryStore {
    fn append(&mut self, entry: &str);

    fn as_list(&self) -> Vec<String>;

    fn last(&self) -> Option<&str>;
}

pub const DEFAULT_HISTORY_SIZE: usize = 50;

/// Bounded in-memory history. Re-appending an entry moves it to the most
/// recent position instead of storing it twice.
#[derive(Debug, Clone)]
pub struct StringHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl StringHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    fn trim(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

impl Default for StringHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl HistoryStore for StringHistory {
    fn append(&mut self, entry: &str) {
        if entry.is_empty() {
            return;
        }
        self.entries.retain(|existing| existing != entry);
        self.entries.push_back(entry.to_string());
        self.trim();
    }

    fn as_list(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}
