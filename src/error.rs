use thiserror::Error;

#[derive(Debug, Error)]
pub enum TareasError {
    #[error("could not determine a data directory (set TAREAS_DIR or pass --data-dir)")]
    NoDataDir,

    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("subtask {0} not found")]
    SubtaskNotFound(String),

    #[error("task id prefix '{0}' is ambiguous; matches: {1}")]
    TaskIdAmbiguous(String, String),

    #[error("invalid task id '{0}': {1}")]
    InvalidTaskId(String, String),

    #[error("locked by another process: {0}")]
    Locked(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TareasError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDataDir => "no_data_dir",
            Self::TaskNotFound(_) => "task_not_found",
            Self::SubtaskNotFound(_) => "subtask_not_found",
            Self::TaskIdAmbiguous(_, _) => "task_id_ambiguous",
            Self::InvalidTaskId(_, _) => "invalid_task_id",
            Self::Locked(_) => "locked",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, TareasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_snake_case_and_stable() {
        assert_eq!(TareasError::NoDataDir.code(), "no_data_dir");
        assert_eq!(
            TareasError::TaskNotFound("abc".into()).code(),
            "task_not_found"
        );
        assert_eq!(
            TareasError::TaskIdAmbiguous("a".into(), "ab, ac".into()).code(),
            "task_id_ambiguous"
        );
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<()> {
            Err(std::io::Error::other("disk gone"))?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert_eq!(err.code(), "io_error");
        assert!(err.to_string().contains("disk gone"));
    }
}
