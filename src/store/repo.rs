use crate::command::{Command, Outcome};
use crate::error::{Result, TareasError};
use crate::model::{Filter, Subtask, Task};
use crate::status::StatusCounts;
use crate::store::slots::Slots;
use crate::store::tasks::TaskStore;
use crate::task_id::{SubtaskId, TaskId, resolve_id_input};
use crate::view;

/// Sole owner of the in-memory task collection and the active filter.
///
/// Every mutator that changes the collection writes the whole collection
/// through to the store before returning. Mutators that end up changing
/// nothing do not write.
#[derive(Debug)]
pub struct TaskRepository<S> {
    store: TaskStore<S>,
    tasks: Vec<Task>,
    filter: Filter,
}

impl<S: Slots> TaskRepository<S> {
    /// Load the persisted collection. The filter always starts at `All`.
    pub fn open(slots: S) -> Result<Self> {
        let store = TaskStore::new(slots);
        let tasks = store.load()?;
        tracing::debug!(count = tasks.len(), "repository opened");
        Ok(Self {
            store,
            tasks,
            filter: Filter::All,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&Task> {
        view::visible(&self.tasks, self.filter)
    }

    pub fn status(&self) -> StatusCounts {
        StatusCounts::from_tasks(&self.tasks)
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.tasks)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// Create a pending task at the front of the collection.
    /// Returns `None` without touching storage when `text` is blank.
    pub fn add(&mut self, text: &str) -> Result<Option<Task>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let mut task = Task::new(text);
        while self.position(&task.id).is_some() {
            task.id = TaskId::generate();
        }
        self.tasks.insert(0, task.clone());
        self.persist()?;
        tracing::debug!(id = %task.id, "task added");
        Ok(Some(task))
    }

    /// Flip `done` on the matching task. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &TaskId) -> Result<bool> {
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        self.tasks[idx].done = !self.tasks[idx].done;
        self.persist()?;
        Ok(true)
    }

    /// Replace the text when the trimmed replacement is non-empty and differs.
    pub fn rename(&mut self, id: &TaskId, new_text: &str) -> Result<bool> {
        let new_text = new_text.trim();
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        if new_text.is_empty() || self.tasks[idx].text == new_text {
            return Ok(false);
        }
        self.tasks[idx].text = new_text.to_string();
        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: &TaskId) -> Result<bool> {
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        let removed = self.tasks.remove(idx);
        self.persist()?;
        tracing::debug!(id = %removed.id, "task removed");
        Ok(true)
    }

    /// Empty the collection. Always persists, even when already empty.
    pub fn clear(&mut self) -> Result<()> {
        let count = self.tasks.len();
        self.tasks.clear();
        self.persist()?;
        tracing::debug!(count, "all tasks cleared");
        Ok(())
    }

    /// Append a subtask to the matching task's checklist.
    pub fn add_subtask(&mut self, id: &TaskId, text: &str) -> Result<Option<Subtask>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let Some(idx) = self.position(id) else {
            return Ok(None);
        };
        let task = &mut self.tasks[idx];
        let mut subtask = Subtask::new(text);
        while task.subtask(&subtask.id).is_some() {
            subtask.id = SubtaskId::generate();
        }
        task.subtasks.push(subtask.clone());
        self.persist()?;
        Ok(Some(subtask))
    }

    pub fn toggle_subtask(&mut self, id: &TaskId, subtask_id: &SubtaskId) -> Result<bool> {
        let Some(subtask) = self.subtask_mut(id, subtask_id) else {
            return Ok(false);
        };
        subtask.done = !subtask.done;
        self.persist()?;
        Ok(true)
    }

    pub fn rename_subtask(
        &mut self,
        id: &TaskId,
        subtask_id: &SubtaskId,
        new_text: &str,
    ) -> Result<bool> {
        let new_text = new_text.trim();
        let Some(subtask) = self.subtask_mut(id, subtask_id) else {
            return Ok(false);
        };
        if new_text.is_empty() || subtask.text == new_text {
            return Ok(false);
        }
        subtask.text = new_text.to_string();
        self.persist()?;
        Ok(true)
    }

    pub fn remove_subtask(&mut self, id: &TaskId, subtask_id: &SubtaskId) -> Result<bool> {
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        let subtasks = &mut self.tasks[idx].subtasks;
        let before = subtasks.len();
        subtasks.retain(|s| &s.id != subtask_id);
        if subtasks.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn subtask_mut(&mut self, id: &TaskId, subtask_id: &SubtaskId) -> Option<&mut Subtask> {
        self.tasks
            .iter_mut()
            .find(|t| &t.id == id)?
            .subtasks
            .iter_mut()
            .find(|s| &s.id == subtask_id)
    }

    /// Single entry point for user intents.
    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        tracing::trace!(?command, "applying command");
        let outcome = match command {
            Command::Add(text) => match self.add(&text)? {
                Some(task) => Outcome::Added(task),
                None => Outcome::Unchanged,
            },
            Command::Toggle(id) => self.toggle(&id)?.into(),
            Command::Rename(id, text) => self.rename(&id, &text)?.into(),
            Command::Remove(id) => self.remove(&id)?.into(),
            Command::Clear => {
                self.clear()?;
                Outcome::Changed
            }
            Command::SetFilter(filter) => {
                let changed = self.filter != filter;
                self.set_filter(filter);
                changed.into()
            }
            Command::AddSubtask(id, text) => self.add_subtask(&id, &text)?.is_some().into(),
            Command::ToggleSubtask(id, sub) => self.toggle_subtask(&id, &sub)?.into(),
            Command::RenameSubtask(id, sub, text) => self.rename_subtask(&id, &sub, &text)?.into(),
            Command::RemoveSubtask(id, sub) => self.remove_subtask(&id, &sub)?.into(),
        };
        Ok(outcome)
    }

    /// Resolve a typed task id (exact or unique prefix) to an existing id.
    pub fn resolve_task_id(&self, input: &str) -> Result<TaskId> {
        let resolved = resolve_id_input(input, self.tasks.iter().map(|t| t.id.as_str()))?;
        resolved
            .parse()
            .map_err(|e: crate::task_id::IdParseError| {
                TareasError::InvalidTaskId(input.to_string(), e.to_string())
            })
    }

    /// Resolve a typed subtask id within one task.
    pub fn resolve_subtask_id(&self, task: &TaskId, input: &str) -> Result<SubtaskId> {
        let parent = self
            .get(task)
            .ok_or_else(|| TareasError::TaskNotFound(task.to_string()))?;
        let resolved = resolve_id_input(input, parent.subtasks.iter().map(|s| s.id.as_str()))
            .map_err(|err| match err {
                TareasError::TaskNotFound(raw) => TareasError::SubtaskNotFound(raw),
                other => other,
            })?;
        resolved
            .parse()
            .map_err(|e: crate::task_id::IdParseError| {
                TareasError::InvalidTaskId(input.to_string(), e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::slots::MemorySlots;

    fn repo() -> (TaskRepository<MemorySlots>, MemorySlots) {
        let slots = MemorySlots::new();
        (TaskRepository::open(slots.clone()).unwrap(), slots)
    }

    fn reload(slots: &MemorySlots) -> TaskRepository<MemorySlots> {
        TaskRepository::open(slots.clone()).unwrap()
    }

    #[test]
    fn add_prepends_trimmed_pending_task_and_persists() {
        let (mut repo, slots) = repo();
        repo.add("first").unwrap();
        let second = repo.add("  second  ").unwrap().unwrap();

        assert_eq!(second.text, "second");
        assert!(!second.done);
        assert_eq!(repo.tasks().len(), 2);
        assert_eq!(repo.tasks()[0].id, second.id);
        assert_eq!(reload(&slots).tasks(), repo.tasks());
    }

    #[test]
    fn add_whitespace_is_rejected_without_write() {
        let (mut repo, slots) = repo();
        assert!(repo.add("   ").unwrap().is_none());
        assert!(repo.add("").unwrap().is_none());
        assert!(repo.tasks().is_empty());
        assert_eq!(slots.write_count(), 0);
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let (mut repo, _) = repo();
        let a = repo.add("a").unwrap().unwrap();
        let b = repo.add("b").unwrap().unwrap();

        assert!(repo.toggle(&a.id).unwrap());
        let toggled = repo.get(&a.id).unwrap();
        assert!(toggled.done);
        assert_eq!(toggled.text, a.text);
        assert_eq!(toggled.created_at, a.created_at);
        assert_eq!(repo.get(&b.id).unwrap(), &b);

        assert!(repo.toggle(&a.id).unwrap());
        assert!(!repo.get(&a.id).unwrap().done);
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let (mut repo, slots) = repo();
        repo.add("a").unwrap();
        let writes = slots.write_count();
        let ghost: TaskId = "ghost".parse().unwrap();

        assert!(!repo.toggle(&ghost).unwrap());
        assert!(!repo.rename(&ghost, "x").unwrap());
        assert!(!repo.remove(&ghost).unwrap());
        assert!(repo.add_subtask(&ghost, "x").unwrap().is_none());
        assert_eq!(slots.write_count(), writes);
    }

    #[test]
    fn rename_ignores_empty_and_unchanged_text() {
        let (mut repo, slots) = repo();
        let task = repo.add("same").unwrap().unwrap();
        let writes = slots.write_count();

        assert!(!repo.rename(&task.id, "").unwrap());
        assert!(!repo.rename(&task.id, "   ").unwrap());
        assert!(!repo.rename(&task.id, " same ").unwrap());
        assert_eq!(slots.write_count(), writes);

        assert!(repo.rename(&task.id, "  other ").unwrap());
        assert_eq!(repo.get(&task.id).unwrap().text, "other");
    }

    #[test]
    fn remove_twice_is_idempotent() {
        let (mut repo, _) = repo();
        let task = repo.add("x").unwrap().unwrap();
        assert!(repo.remove(&task.id).unwrap());
        assert!(!repo.remove(&task.id).unwrap());
        assert!(repo.tasks().is_empty());
    }

    #[test]
    fn clear_survives_reload() {
        let (mut repo, slots) = repo();
        repo.add("a").unwrap();
        repo.add("b").unwrap();
        repo.clear().unwrap();
        assert!(repo.tasks().is_empty());
        assert!(reload(&slots).tasks().is_empty());
    }

    #[test]
    fn filter_resets_on_reload() {
        let (mut repo, slots) = repo();
        repo.set_filter(Filter::Completed);
        assert_eq!(repo.filter(), Filter::Completed);
        assert_eq!(reload(&slots).filter(), Filter::All);
    }

    #[test]
    fn subtasks_follow_the_same_rules() {
        let (mut repo, slots) = repo();
        let task = repo.add("Trip").unwrap().unwrap();
        assert!(repo.add_subtask(&task.id, "  ").unwrap().is_none());

        let passport = repo.add_subtask(&task.id, " Passport ").unwrap().unwrap();
        let tickets = repo.add_subtask(&task.id, "Tickets").unwrap().unwrap();
        assert_eq!(passport.text, "Passport");

        assert!(repo.toggle_subtask(&task.id, &tickets.id).unwrap());
        assert!(!repo.rename_subtask(&task.id, &passport.id, "Passport").unwrap());
        assert!(repo.rename_subtask(&task.id, &passport.id, "ID card").unwrap());
        assert!(repo.remove_subtask(&task.id, &passport.id).unwrap());
        assert!(!repo.remove_subtask(&task.id, &passport.id).unwrap());

        let reloaded = reload(&slots);
        let subtasks = &reloaded.get(&task.id).unwrap().subtasks;
        assert_eq!(subtasks.len(), 1);
        assert_eq!(subtasks[0].id, tickets.id);
        assert!(subtasks[0].done);
    }

    #[test]
    fn apply_dispatches_commands() {
        let (mut repo, _) = repo();
        let Outcome::Added(task) = repo.apply(Command::Add("Buy milk".into())).unwrap() else {
            panic!("expected task to be added");
        };
        assert_eq!(
            repo.apply(Command::Add("  ".into())).unwrap(),
            Outcome::Unchanged
        );
        assert_eq!(
            repo.apply(Command::Toggle(task.id.clone())).unwrap(),
            Outcome::Changed
        );
        assert_eq!(
            repo.apply(Command::SetFilter(Filter::Pending)).unwrap(),
            Outcome::Changed
        );
        assert!(repo.visible().is_empty());
        assert_eq!(
            repo.apply(Command::SetFilter(Filter::Pending)).unwrap(),
            Outcome::Unchanged
        );
        assert_eq!(
            repo.apply(Command::Remove(task.id)).unwrap(),
            Outcome::Changed
        );
        assert_eq!(repo.apply(Command::Clear).unwrap(), Outcome::Changed);
    }

    #[test]
    fn resolves_task_ids_by_prefix() {
        let (mut repo, _) = repo();
        let task = repo.add("a").unwrap().unwrap();
        let prefix = task.id.short().to_string();
        assert_eq!(repo.resolve_task_id(&prefix).unwrap(), task.id);
        assert!(matches!(
            repo.resolve_task_id("not-a-real-id"),
            Err(TareasError::TaskNotFound(_))
        ));
    }

    #[test]
    fn resolves_subtask_ids_within_their_task() {
        let (mut repo, _) = repo();
        let task = repo.add("a").unwrap().unwrap();
        let sub = repo.add_subtask(&task.id, "s").unwrap().unwrap();
        assert_eq!(
            repo.resolve_subtask_id(&task.id, sub.id.short()).unwrap(),
            sub.id
        );
        assert!(matches!(
            repo.resolve_subtask_id(&task.id, "nope"),
            Err(TareasError::SubtaskNotFound(_))
        ));
    }
}
