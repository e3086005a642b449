use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::TableNumber;

/// One async lock per table, created on first use
#[derive(Default)]
pub struct TableLocks {
    locks: DashMap<TableNumber, Arc<Mutex<()>>>,
}

impl TableLocks {
    /// Waits until no one else holds the lock for this table.
    /// The table stays locked until the guard is dropped.
    pub async fn acquire(&self, table: TableNumber) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(table).or_default().clone();

        lock.lock_owned().await
    }

    /// How many tables have a lock
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }
}
