use tempfile::tempdir;

use tareas::command::{Command, Outcome};
use tareas::model::Filter;
use tareas::store::files::FileSlots;
use tareas::store::repo::TaskRepository;
use tareas::store::slots::{Slots, TASKS_KEY};
use tareas::store::tasks::ThemeStore;

fn texts(repo: &TaskRepository<FileSlots>) -> Vec<String> {
    repo.visible().iter().map(|t| t.text.clone()).collect()
}

#[test]
fn test_full_workflow() {
    let dir = tempdir().unwrap();
    let slots = FileSlots::open(dir.path());

    let mut repo = TaskRepository::open(slots.clone()).unwrap();
    assert!(repo.tasks().is_empty());
    assert_eq!(repo.status().to_string(), "0 tareas pendientes / 0 en total");

    // Newest first
    let milk = repo.add("Buy milk").unwrap().unwrap();
    let dog = repo.add("Walk dog").unwrap().unwrap();
    assert_eq!(texts(&repo), ["Walk dog", "Buy milk"]);

    repo.toggle(&milk.id).unwrap();
    assert_eq!(repo.status().to_string(), "1 tarea pendiente / 2 en total");

    repo.set_filter(Filter::Pending);
    assert_eq!(texts(&repo), ["Walk dog"]);
    repo.set_filter(Filter::Completed);
    assert_eq!(texts(&repo), ["Buy milk"]);

    // A fresh repository over the same directory sees identical state,
    // with the filter back at All.
    let reopened = TaskRepository::open(slots.clone()).unwrap();
    assert_eq!(reopened.filter(), Filter::All);
    assert_eq!(reopened.tasks(), repo.tasks());

    repo.remove(&dog.id).unwrap();
    repo.clear().unwrap();
    let reopened = TaskRepository::open(slots).unwrap();
    assert!(reopened.tasks().is_empty());
}

#[test]
fn freshly_added_tasks_equal_their_reloaded_form() {
    let dir = tempdir().unwrap();
    let slots = FileSlots::open(dir.path());
    let mut repo = TaskRepository::open(slots.clone()).unwrap();
    repo.add("X").unwrap();
    repo.add("Y").unwrap();

    let reopened = TaskRepository::open(slots).unwrap();
    assert_eq!(reopened.tasks(), repo.tasks());
}

#[test]
fn whitespace_only_add_leaves_storage_untouched() {
    let dir = tempdir().unwrap();
    let slots = FileSlots::open(dir.path());
    let mut repo = TaskRepository::open(slots.clone()).unwrap();

    assert!(repo.add("   ").unwrap().is_none());
    assert_eq!(slots.get(TASKS_KEY).unwrap(), None);
    assert!(!dir.path().join("tasks.json").exists());
}

#[test]
fn rename_survives_reload() {
    let dir = tempdir().unwrap();
    let slots = FileSlots::open(dir.path());
    let mut repo = TaskRepository::open(slots.clone()).unwrap();
    let task = repo.add("Buy milk").unwrap().unwrap();

    assert!(repo.rename(&task.id, "  Buy oat milk  ").unwrap());
    assert!(!repo.rename(&task.id, "Buy oat milk").unwrap());
    assert!(!repo.rename(&task.id, "   ").unwrap());

    let reopened = TaskRepository::open(slots).unwrap();
    assert_eq!(reopened.tasks()[0].text, "Buy oat milk");
    assert_eq!(reopened.tasks()[0].created_at, task.created_at);
}

#[test]
fn commands_drive_the_repository() {
    let dir = tempdir().unwrap();
    let mut repo = TaskRepository::open(FileSlots::open(dir.path())).unwrap();

    let Outcome::Added(task) = repo.apply(Command::Add("Trip".into())).unwrap() else {
        panic!("expected an added task");
    };
    assert!(repo
        .apply(Command::AddSubtask(task.id.clone(), "Passport".into()))
        .unwrap()
        .changed());
    let subtask = repo.get(&task.id).unwrap().subtasks[0].id.clone();

    assert!(repo
        .apply(Command::ToggleSubtask(task.id.clone(), subtask.clone()))
        .unwrap()
        .changed());
    assert!(repo.get(&task.id).unwrap().subtasks[0].done);

    // Subtasks never change the parent's own completion.
    assert!(!repo.get(&task.id).unwrap().done);

    assert!(repo
        .apply(Command::RemoveSubtask(task.id.clone(), subtask))
        .unwrap()
        .changed());
    assert!(repo.get(&task.id).unwrap().subtasks.is_empty());
}

#[test]
fn corrupt_slot_file_loads_as_empty_and_recovers() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "{definitely not json").unwrap();

    let mut repo = TaskRepository::open(FileSlots::open(dir.path())).unwrap();
    assert!(repo.tasks().is_empty());

    repo.add("Fresh start").unwrap();
    let reopened = TaskRepository::open(FileSlots::open(dir.path())).unwrap();
    assert_eq!(reopened.tasks().len(), 1);
}

#[test]
fn stored_format_uses_camel_case_millis() {
    let dir = tempdir().unwrap();
    let slots = FileSlots::open(dir.path());
    let mut repo = TaskRepository::open(slots.clone()).unwrap();
    let task = repo.add("Buy milk").unwrap().unwrap();

    let raw = slots.get(TASKS_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value[0];
    assert_eq!(entry["id"], task.id.as_str());
    assert_eq!(entry["text"], "Buy milk");
    assert_eq!(entry["done"], false);
    assert_eq!(entry["createdAt"], task.created_at.timestamp_millis());
    assert!(entry.get("subtasks").is_none());
}

#[test]
fn theme_is_independent_of_tasks() {
    let dir = tempdir().unwrap();
    let slots = FileSlots::open(dir.path());
    let themes = ThemeStore::new(slots.clone());

    themes.toggle().unwrap();
    let mut repo = TaskRepository::open(slots.clone()).unwrap();
    repo.add("Buy milk").unwrap();
    repo.clear().unwrap();

    assert_eq!(std::fs::read_to_string(dir.path().join("tema.json")).unwrap(), "dark");
    assert_eq!(ThemeStore::new(slots).load().unwrap().as_str(), "dark");
}
