use crate::FormController;
use lru::LruCache;
use parking_lot::Mutex;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SESSION_CAPACITY: usize = 1024;
const SESSION_ID_LEN: usize = 24;

/// Per-browser form controllers, least recently used evicted first.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<LruCache<String, FormController>>>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.inner.lock().contains(session_id)
    }

    /// Runs `f` against the session's controller, creating a fresh one if the
    /// session is unknown or was evicted.
    pub fn with_form<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut FormController) -> R,
    ) -> R {
        let mut guard = self.inner.lock();
        if !guard.contains(session_id) {
            if guard.len() >= guard.cap().get() {
                if let Some((evicted, _)) = guard.peek_lru() {
                    debug!(session = %evicted, "evicting least recently used form session");
                }
            }
            debug!(session = %session_id, "starting form session");
        }
        let form = guard.get_or_insert_mut(session_id.to_string(), FormController::new);
        f(form)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CAPACITY)
    }
}

pub fn generate_session_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
