//! Conversation identity → process map with a defined concurrency contract.
//!
//! The map itself supports concurrent insert/lookup/delete (outer mutex);
//! each process carries its own mutex so that at most one turn per identity
//! is ever in flight, while distinct identities proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::state_machine::Process;

/// Shared handle to one conversation's process. Lock it for the whole turn.
pub type ProcessHandle = Arc<Mutex<Process>>;

/// Injectable process store keyed by opaque conversation identity.
pub struct ProcessStore {
    processes: Mutex<HashMap<String, ProcessHandle>>,
    max_iterations: u32,
}

impl ProcessStore {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            processes: Mutex::new(HashMap::new()),
            max_iterations,
        }
    }

    /// Fetch the process for `identity`, creating a fresh one on first use.
    pub async fn get_or_create(&self, identity: &str) -> ProcessHandle {
        let mut map = self.processes.lock().await;
        map.entry(identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Process::new(self.max_iterations))))
            .clone()
    }

    /// Delete the process for `identity`. Atomic with respect to concurrent
    /// lookups: the map lock is held for the whole removal, so a lookup sees
    /// either the old process or none, never a half-deleted one.
    pub async fn remove(&self, identity: &str) -> bool {
        let mut map = self.processes.lock().await;
        map.remove(identity).is_some()
    }

    pub async fn len(&self) -> usize {
        self.processes.lock().await.len()
    }
}
