use super::{LedgerStore, StoreError};
use crate::ledger::LedgerState;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory store for tests. Clones share state, so a test can keep a
/// handle while the ledger owns another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<LedgerState>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn with_state(state: LedgerState) -> Self {
        let store = Self::default();
        *store.inner.state.lock().unwrap() = state;
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> LedgerState {
        self.inner.state.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> impl Future<Output = Result<LedgerState, StoreError>> + Send {
        let state = self.snapshot();
        async move { Ok(state) }
    }

    fn persist(&self, state: &LedgerState) -> impl Future<Output = Result<(), StoreError>> + Send {
        let result = if self.inner.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Simulated)
        } else {
            *self.inner.state.lock().unwrap() = state.clone();
            self.inner.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        async move { result }
    }
}
