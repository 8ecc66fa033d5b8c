use contracts::usecases::u601_import_from_sheets::ImportJournalEntry;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Сколько последних операций импорта хранится в журнале
pub const JOURNAL_CAPACITY: usize = 50;

/// Журнал завершённых операций импорта (in-memory, новые в начале)
#[derive(Clone)]
pub struct ImportJournal {
    entries: Arc<RwLock<VecDeque<ImportJournalEntry>>>,
    capacity: usize,
}

impl ImportJournal {
    pub fn new() -> Self {
        Self::with_capacity(JOURNAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub async fn record(&self, entry: ImportJournalEntry) {
        let mut entries = self.entries.write().await;
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Записи от новых к старым
    pub async fn recent(&self) -> Vec<ImportJournalEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn get(&self, session_id: &str) -> Vec<ImportJournalEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect()
    }
}

impl Default for ImportJournal {
    fn default() -> Self {
        Self::new()
    }
}
