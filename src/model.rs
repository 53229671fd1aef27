use chrono::{DateTime, SubsecRound, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::task_id::{SubtaskId, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Build a fresh pending task. Callers are responsible for trimming `text`.
    ///
    /// `created_at` is truncated to the millisecond precision it is stored with.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            done: false,
            created_at: Utc::now().trunc_subsecs(3),
            subtasks: Vec::new(),
        }
    }

    pub fn subtask(&self, id: &SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| &s.id == id)
    }
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: SubtaskId::generate(),
            text: text.into(),
            done: false,
        }
    }
}

/// Visibility criterion for the task list. Never persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    #[value(alias = "todas")]
    All,
    #[value(alias = "completadas")]
    Completed,
    #[value(alias = "pendientes")]
    Pending,
}

impl Filter {
    pub const ALL: [Self; 3] = [Self::All, Self::Pending, Self::Completed];

    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.done,
            Self::Pending => !task.done,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Completed => write!(f, "completed"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Anything other than the exact string "dark" falls back to light.
    pub fn from_stored(value: &str) -> Self {
        if value.trim() == "dark" {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
