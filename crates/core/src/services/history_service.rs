use crate::models::history::HistoryEntry;

/// In-memory operations on a most-recent-first history log.
pub struct HistoryService;

impl HistoryService {
    pub fn new() -> Self {
        Self
    }

    /// Insert at the head. Duplicate ids are not rejected.
    pub fn prepend(&self, log: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
        log.insert(0, entry);
    }

    /// Remove the first entry with `id`. Returns whether anything was removed.
    pub fn remove_by_id(&self, log: &mut Vec<HistoryEntry>, id: i64) -> bool {
        match log.iter().position(|e| e.id == id) {
            Some(idx) => {
                log.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Id for a new entry: the current time in ms, bumped past every stored id
    /// so ids stay unique and increasing even with a coarse or rewound clock.
    /// Saturates at `i64::MAX`.
    pub fn next_id(&self, log: &[HistoryEntry], now_millis: i64) -> i64 {
        match log.iter().map(|e| e.id).max() {
            Some(max) if max >= now_millis => max.saturating_add(1),
            _ => now_millis,
        }
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new()
    }
}
