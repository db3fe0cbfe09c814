use std::cell::Cell;

use tokio::sync::{broadcast, watch};

use crate::record::WalletRecord;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// A new batch replaced every record.
    Reset { len: usize },
    Updated { index: usize, record: WalletRecord },
}

/// Ordered wallet records of the current batch.
///
/// Records are only ever swapped whole, so a reader never sees a record
/// that is half way between two states.
pub struct WalletBoard {
    records: watch::Sender<Vec<WalletRecord>>,
    events: broadcast::Sender<BoardEvent>,
    generation: Cell<u64>,
}

impl Default for WalletBoard {
    fn default() -> Self {
        let (records, _) = watch::channel(Vec::new());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            records,
            events,
            generation: Cell::new(0),
        }
    }
}

impl WalletBoard {
    /// Bumped by every `reset`. Lets a caller notice that the records it
    /// started working on belong to a batch that has since been replaced.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn snapshot(&self) -> Vec<WalletRecord> {
        self.records.borrow().clone()
    }

    pub fn get(&self, index: usize) -> Option<WalletRecord> {
        self.records.borrow().get(index).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<WalletRecord>> {
        self.records.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    pub fn reset(&self, records: Vec<WalletRecord>) {
        let len = records.len();
        self.generation.set(self.generation.get() + 1);
        self.records.send_replace(records);
        // no subscribers is fine
        let _ = self.events.send(BoardEvent::Reset { len });
    }

    /// Returns false when `index` is out of range.
    pub fn replace(&self, index: usize, record: WalletRecord) -> bool {
        let replaced = self.records.send_if_modified(|records| match records.get_mut(index) {
            Some(slot) => {
                *slot = record.clone();
                true
            }
            None => false,
        });

        if replaced {
            let _ = self.events.send(BoardEvent::Updated { index, record });
        }

        replaced
    }
}
