use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TareasError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdParseError {
    Empty,
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "id cannot be empty"),
        }
    }
}

impl std::error::Error for IdParseError {}

/// Opaque string identifier. Fresh values are hyphenated UUID v4 strings, but any
/// non-empty string is accepted when reading persisted data.
macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First eight characters, enough to address an id from the CLI.
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(IdParseError::Empty);
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

opaque_id!(TaskId);
opaque_id!(SubtaskId);

/// Resolve a user-typed id against the ids that currently exist.
///
/// Exact match wins; otherwise the input must be a prefix of exactly one id.
/// Matching is case-insensitive because generated ids are lowercase.
pub fn resolve_id_input<'a, I>(input: &str, existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let raw = input.trim();
    if raw.is_empty() {
        return Err(TareasError::InvalidTaskId(
            input.to_string(),
            "id cannot be empty".into(),
        ));
    }

    let needle = raw.to_ascii_lowercase();
    let mut matches = Vec::new();
    for id in existing {
        if id == raw {
            return Ok(id.to_string());
        }
        if id.to_ascii_lowercase().starts_with(&needle) {
            matches.push(id);
        }
    }
    matches.sort_unstable();
    matches.dedup();

    match matches.as_slice() {
        [] => Err(TareasError::TaskNotFound(raw.to_string())),
        [only] => Ok((*only).to_string()),
        many => Err(TareasError::TaskIdAmbiguous(
            raw.to_string(),
            many.join(", "),
        )),
    }
}
