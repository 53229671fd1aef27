use std::collections::HashSet;

use serde_json::Value;

use crate::error::Result;
use crate::model::{Task, Theme};
use crate::store::slots::{Slots, TASKS_KEY, THEME_KEY};

/// Maps the task collection to and from the `tasks` slot.
#[derive(Debug, Clone)]
pub struct TaskStore<S> {
    slots: S,
}

impl<S: Slots> TaskStore<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    /// Load the persisted collection.
    ///
    /// Missing, unparseable, or non-array data degrades to an empty collection.
    /// Individual entries that are not valid tasks are skipped, and only the
    /// first occurrence of a repeated id is kept. Only a failure to read the
    /// slot itself is returned as an error.
    pub fn load(&self) -> Result<Vec<Task>> {
        let Some(raw) = self.slots.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => {
                tracing::warn!(kind = json_kind(&other), "stored tasks are not a list; starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored tasks are not valid json; starting empty");
                return Ok(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(entries.len());
        for (position, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Task>(entry) {
                Ok(task) if task.text.trim().is_empty() => {
                    tracing::warn!(id = %task.id, position, "skipping task with blank text");
                }
                Ok(mut task) => {
                    task.subtasks.retain(|s| !s.text.trim().is_empty());
                    if seen.insert(task.id.clone()) {
                        tasks.push(task);
                    } else {
                        tracing::warn!(id = %task.id, position, "dropping duplicate task id");
                    }
                }
                Err(err) => tracing::warn!(position, error = %err, "skipping malformed task entry"),
            }
        }
        Ok(tasks)
    }

    /// Serialize and persist the full collection, replacing whatever was stored.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.slots.set(TASKS_KEY, &json)?;
        tracing::debug!(count = tasks.len(), "tasks saved");
        Ok(())
    }
}

/// Persisted light/dark preference under the `tema` slot.
#[derive(Debug, Clone)]
pub struct ThemeStore<S> {
    slots: S,
}

impl<S: Slots> ThemeStore<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn load(&self) -> Result<Theme> {
        Ok(self
            .slots
            .get(THEME_KEY)?
            .map(|raw| Theme::from_stored(&raw))
            .unwrap_or_default())
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        self.slots.set(THEME_KEY, theme.as_str())
    }

    /// Flip the stored theme and return the new value.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load()?.toggle();
        self.save(next)?;
        Ok(next)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subtask;
    use crate::store::slots::MemorySlots;

    fn store_with(raw: &str) -> TaskStore<MemorySlots> {
        let slots = MemorySlots::new();
        slots.set(TASKS_KEY, raw).unwrap();
        TaskStore::new(slots)
    }

    #[test]
    fn absent_slot_loads_empty() {
        let store = TaskStore::new(MemorySlots::new());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn invalid_json_loads_empty() {
        assert!(store_with("{not json").load().unwrap().is_empty());
    }

    #[test]
    fn non_array_loads_empty() {
        assert!(store_with(r#"{"id":"a"}"#).load().unwrap().is_empty());
        assert!(store_with("null").load().unwrap().is_empty());
        assert!(store_with("42").load().unwrap().is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let store = store_with(
            r#"[
                {"id":"a","text":"ok","done":false,"createdAt":1},
                {"texto":"legacy","completada":true},
                {"id":"b","text":"   ","done":false,"createdAt":2},
                {"id":"c","text":"","done":true,"createdAt":3},
                7
            ]"#,
        );
        let tasks = store.load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "ok");
    }

    #[test]
    fn blank_subtasks_are_dropped_on_load() {
        let store = store_with(
            r#"[{"id":"a","text":"Trip","done":false,"createdAt":1,
                 "subtasks":[{"id":"s1","text":"Passport","done":false},
                             {"id":"s2","text":"  ","done":false}]}]"#,
        );
        let tasks = store.load().unwrap();
        assert_eq!(tasks[0].subtasks.len(), 1);
        assert_eq!(tasks[0].subtasks[0].text, "Passport");
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let store = store_with(
            r#"[
                {"id":"a","text":"first","done":false,"createdAt":1},
                {"id":"a","text":"second","done":true,"createdAt":2}
            ]"#,
        );
        let tasks = store.load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "first");
    }

    #[test]
    fn save_then_load_preserves_fields_and_order() {
        let store = TaskStore::new(MemorySlots::new());
        let mut first = Task::new("Walk dog");
        first.subtasks.push(Subtask::new("Leash"));
        let mut second = Task::new("Buy milk");
        second.done = true;
        let tasks = vec![first, second];

        store.save(&tasks).unwrap();
        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn save_overwrites_previous_collection() {
        let store = TaskStore::new(MemorySlots::new());
        store.save(&[Task::new("A"), Task::new("B")]).unwrap();
        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn theme_defaults_to_light_and_toggles() {
        let slots = MemorySlots::new();
        let themes = ThemeStore::new(slots.clone());
        assert_eq!(themes.load().unwrap(), Theme::Light);
        assert_eq!(themes.toggle().unwrap(), Theme::Dark);
        assert_eq!(slots.raw(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(themes.toggle().unwrap(), Theme::Light);
    }
}
