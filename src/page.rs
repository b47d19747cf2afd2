use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback fired after every fake-date write. Its presence in the context is
/// also the marker that the clock override has been installed.
pub type ActivationHook = Arc<dyn Fn() + Send + Sync>;

/// The execution context the override engine runs inside: a session-scoped
/// string store, the context's host name, and the activation-hook slot.
///
/// Models the host-environment primitives (session storage, location host)
/// that the real page supplies. Everything here is synchronous and infallible;
/// racing writers get last-write-wins.
pub struct PageContext {
    host: String,
    storage: Mutex<HashMap<String, String>>,
    activation_hook: Mutex<Option<ActivationHook>>,
}

impl PageContext {
    pub fn new(host: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            host: host.into(),
            storage: Mutex::new(HashMap::new()),
            activation_hook: Mutex::new(None),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    // Storage writes never fail; a poisoned lock still holds valid data.
    fn storage(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hook_slot(&self) -> MutexGuard<'_, Option<ActivationHook>> {
        self.activation_hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn storage_get(&self, key: &str) -> Option<String> {
        self.storage().get(key).cloned()
    }

    pub fn storage_set(&self, key: &str, value: &str) {
        self.storage().insert(key.to_string(), value.to_string());
    }

    pub fn storage_remove(&self, key: &str) {
        self.storage().remove(key);
    }

    /// Drops all session state, as the real store does when the session ends.
    pub fn end_session(&self) {
        self.storage().clear();
    }

    /// Registers the activation hook. Installed once per context; later
    /// registrations replace the callback but the marker stays set.
    pub fn set_activation_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.hook_slot() = Some(Arc::new(hook));
    }

    pub fn has_activation_hook(&self) -> bool {
        self.hook_slot().is_some()
    }

    /// Invokes the activation hook if one is registered. The slot lock is
    /// released before the call so the hook may read this context freely.
    pub fn fire_activation_hook(&self) {
        let hook = self.hook_slot().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}
