use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::domain::UserId;

/// Keyed lock table serializing period and counter mutations per user.
///
/// Different users never contend beyond the short table lookup. Entries
/// are dropped once no caller holds or waits on them.
#[derive(Debug, Default)]
pub struct UserLocks {
    table: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` while holding the user's lock. Not reentrant.
    pub fn with_user<T>(&self, user_id: &UserId, work: impl FnOnce() -> T) -> T {
        let lease = Lease {
            locks: self,
            user_id,
            lock: self.lock_for(user_id),
        };
        let _guard = lease.lock.lock().unwrap_or_else(PoisonError::into_inner);
        work()
    }

    fn lock_for(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn release(&self, user_id: &UserId, lock: &Arc<Mutex<()>>) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // New clones are only handed out under the table lock, so the count is stable here.
        if Arc::strong_count(lock) == 2 {
            table.remove(user_id);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A checked-out table entry. Releases after the user's guard drops, panics included.
struct Lease<'a> {
    locks: &'a UserLocks,
    user_id: &'a UserId,
    lock: Arc<Mutex<()>>,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.locks.release(self.user_id, &self.lock);
    }
}
