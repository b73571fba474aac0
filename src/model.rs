use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaskListError;

pub type TaskId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: i64,
    /// Name of an entry in [`COLOR_OPTIONS`]; not checked by the store.
    #[serde(default)]
    pub color: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            due_date: None,
            priority: 0,
            color: None,
        }
    }
}

// Date inputs left empty are stored as "" rather than null.
fn blank_date_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorOption {
    pub background: &'static str,
    pub foreground: &'static str,
    pub name: &'static str,
}

pub const COLOR_OPTIONS: [ColorOption; 9] = [
    ColorOption { background: "#ffffff", foreground: "#1f2328", name: "Default" },
    ColorOption { background: "#f28b82", foreground: "#3c0d0a", name: "Red" },
    ColorOption { background: "#fbbc04", foreground: "#3d2a00", name: "Orange" },
    ColorOption { background: "#fff475", foreground: "#3a3600", name: "Yellow" },
    ColorOption { background: "#ccff90", foreground: "#1e3a00", name: "Green" },
    ColorOption { background: "#a7ffeb", foreground: "#00382c", name: "Teal" },
    ColorOption { background: "#aecbfa", foreground: "#0b2a5b", name: "Blue" },
    ColorOption { background: "#d7aefb", foreground: "#2e0b4d", name: "Purple" },
    ColorOption { background: "#fdcfe8", foreground: "#4a0d2e", name: "Pink" },
];

/// Case-insensitive lookup into [`COLOR_OPTIONS`].
pub fn find_color(name: &str) -> Option<&'static ColorOption> {
    COLOR_OPTIONS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        })
    }
}

impl FromStr for Filter {
    type Err = TaskListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(TaskListError::InvalidPreference {
                kind: "filter",
                value: s.to_string(),
                expected: "all, active, completed",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Priority,
    Title,
    /// Keeps the stored (insertion/reorder) order.
    Manual,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Priority => "priority",
            Self::Title => "title",
            Self::Manual => "manual",
        })
    }
}

impl FromStr for SortBy {
    type Err = TaskListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            "manual" => Ok(Self::Manual),
            _ => Err(TaskListError::InvalidPreference {
                kind: "sort key",
                value: s.to_string(),
                expected: "date, priority, title, manual",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Light => "light",
        })
    }
}

impl FromStr for Theme {
    type Err = TaskListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(TaskListError::InvalidPreference {
                kind: "theme",
                value: s.to_string(),
                expected: "dark, light",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub theme: Theme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serializes_with_camel_case_fields() {
        let mut task = Task::new("1", "Buy milk");
        task.due_date = NaiveDate::from_ymd_opt(2025, 2, 25);

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"dueDate\":\"2025-02-25\""));
        assert!(json.contains("\"completed\":false"));
    }

    #[test]
    fn test_task_defaults_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"id":"7","title":"Call dentist"}"#).unwrap();
        assert_eq!(task, Task::new("7", "Call dentist"));
    }

    #[test]
    fn test_blank_due_date_is_none() {
        let task: Task =
            serde_json::from_str(r#"{"id":"1","title":"x","dueDate":"","priority":2}"#).unwrap();
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, 2);
    }

    #[test]
    fn test_bad_due_date_is_rejected() {
        let result: serde_json::Result<Task> =
            serde_json::from_str(r#"{"id":"1","title":"x","dueDate":"next week"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_color_catalog() {
        assert_eq!(COLOR_OPTIONS.len(), 9);
        assert_eq!(find_color("blue").map(|c| c.name), Some("Blue"));
        assert!(find_color("chartreuse").is_none());
    }

    #[test]
    fn test_parse_preferences() {
        assert_eq!("Active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!("title".parse::<SortBy>().unwrap(), SortBy::Title);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);

        let err = "done".parse::<Filter>().unwrap_err();
        assert!(err.to_string().contains("all, active, completed"));
        assert!("size".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_theme_toggled() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_preferences_serialization() {
        let prefs = Preferences {
            filter: Filter::Completed,
            sort_by: SortBy::Priority,
            theme: Theme::Light,
        };
        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(json, r#"{"filter":"completed","sortBy":"priority","theme":"light"}"#);
    }
}
