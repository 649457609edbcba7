//! Recording event sink.

use std::sync::Arc;

use parking_lot::Mutex;
use sluice_vault::{EventSink, VaultEvent};

/// Keeps every event it receives. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingEvents {
    events: Arc<Mutex<Vec<VaultEvent>>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<VaultEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingEvents {
    fn emit(&self, event: &VaultEvent) {
        self.events.lock().push(event.clone());
    }
}

type Callback = Box<dyn FnOnce(&VaultEvent) + Send>;

/// Recording sink that runs a one-shot callback on the next event.
///
/// The callback is installed after the vault is built, so it can hold a
/// handle to that vault and call back into it.
#[derive(Clone, Default)]
pub struct ReentrantEvents {
    inner: RecordingEvents,
    on_event: Arc<Mutex<Option<Callback>>>,
}

impl ReentrantEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> &RecordingEvents {
        &self.inner
    }

    /// Run `callback` when the next event arrives.
    pub fn on_next_event(&self, callback: impl FnOnce(&VaultEvent) + Send + 'static) {
        *self.on_event.lock() = Some(Box::new(callback));
    }

    /// Whether the installed callback has run.
    pub fn fired(&self) -> bool {
        self.on_event.lock().is_none()
    }
}

impl EventSink for ReentrantEvents {
    fn emit(&self, event: &VaultEvent) {
        self.inner.emit(event);
        // Released before running so the callback may emit again.
        let callback = self.on_event.lock().take();
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

impl std::fmt::Debug for ReentrantEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReentrantEvents")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
