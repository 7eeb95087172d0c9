use std::collections::HashMap;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct State {
    /// Component id to the thread working on it
    owners: HashMap<String, ThreadId>,
    /// Thread to the component id it is blocked on
    waiting: HashMap<ThreadId, String>,
}

impl State {
    /// Whether `me` blocking on `id` would close a loop of threads waiting on each other
    fn closes_cycle(&self, id: &str, me: ThreadId) -> bool {
        let mut owner = self.owners.get(id).copied();
        for _ in 0..=self.waiting.len() {
            match owner {
                Some(thread) if thread == me => return true,
                Some(thread) => {
                    owner = self
                        .waiting
                        .get(&thread)
                        .and_then(|wanted| self.owners.get(wanted).copied());
                }
                None => return false,
            }
        }
        false
    }
}

/// Ids of the components being worked on, each owned by the thread working on it.
///
/// Entering an id the current thread already owns is refused: the call chain came
/// back to it through a cycle or a re-entrant resolver. Entering an id owned by
/// another thread blocks until that thread drops its guard. If blocking would leave
/// two threads waiting on each other, the id is refused instead.
#[derive(Debug, Default)]
pub struct InProgressSet {
    state: Mutex<State>,
    released: Condvar,
}

impl InProgressSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as in progress for the current thread.
    ///
    /// Returns `None` if this thread's call chain already holds it.
    pub fn enter(&self, id: &str) -> Option<InProgressGuard<'_>> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        let mut waited = false;
        loop {
            match state.owners.get(id).copied() {
                None => break,
                Some(owner) if owner == me => return None,
                Some(_) if state.closes_cycle(id, me) => {
                    log::trace!("Waiting for {} would deadlock, skipping it", id);
                    return None;
                }
                Some(_) => {
                    state.waiting.insert(me, id.to_string());
                    self.released.wait(&mut state);
                    state.waiting.remove(&me);
                    waited = true;
                }
            }
        }
        state.owners.insert(id.to_string(), me);
        Some(InProgressGuard {
            set: self,
            id: id.to_string(),
            waited,
        })
    }

    /// Check if `id` is in progress on any thread
    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().owners.contains_key(id)
    }

    /// Whether nothing is in progress
    pub fn is_empty(&self) -> bool {
        self.state.lock().owners.is_empty()
    }

    /// Number of threads blocked in `enter`
    pub fn waiting(&self) -> usize {
        self.state.lock().waiting.len()
    }
}

/// Clears its id from the set when dropped, including on early error returns
#[derive(Debug)]
pub struct InProgressGuard<'a> {
    set: &'a InProgressSet,
    id: String,
    waited: bool,
}

impl InProgressGuard<'_> {
    /// Whether another thread held the id before this guard was handed out
    pub fn waited(&self) -> bool {
        self.waited
    }
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.set.state.lock().owners.remove(&self.id);
        self.set.released.notify_all();
    }
}
