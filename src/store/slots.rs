use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

/// Key under which the task collection is persisted.
pub const TASKS_KEY: &str = "tasks";
/// Key under which the theme preference is persisted.
pub const THEME_KEY: &str = "tema";

/// A persistent key-value slot store holding serialized text.
pub trait Slots {
    /// Read a slot; `Ok(None)` when nothing has been stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Overwrite a slot unconditionally.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: Slots + ?Sized> Slots for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-process slot store. Clones share the same backing map, which lets a
/// test reopen a repository over the same slots to simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    inner: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Total `set` calls across all clones.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Slots for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_slots_share_state_across_clones() {
        let slots = MemorySlots::new();
        let reopened = slots.clone();
        slots.set(TASKS_KEY, "[]").unwrap();
        assert_eq!(reopened.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
        reopened.set(TASKS_KEY, "[1]").unwrap();
        assert_eq!(slots.raw(TASKS_KEY).as_deref(), Some("[1]"));
        assert_eq!(slots.write_count(), 2);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let slots = MemorySlots::new();
        slots.set(THEME_KEY, "dark").unwrap();
        slots.set(THEME_KEY, "light").unwrap();
        assert_eq!(slots.raw(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(slots.write_count(), 2);
    }
}
