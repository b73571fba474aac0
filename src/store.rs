use std::cmp::Ordering;
use tracing::{debug, error, info, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, TaskListError};
use crate::model::{ColorOption, Filter, Preferences, SortBy, Task, Theme, COLOR_OPTIONS};
use crate::storage::KeyValueStore;

const TASKS_KEY: &str = "tasks";
const PREFERENCES_KEY: &str = "preferences";

/// Receives the new theme whenever the store toggles it.
pub trait ThemeObserver {
    fn theme_changed(&self, theme: Theme);
}

/// The task collection, view preferences and palette catalog.
///
/// Task order is insertion order, changed only by [`TaskStore::reorder_tasks`].
/// Every mutation of the collection is written through to storage.
pub struct TaskStore {
    storage: Box<dyn KeyValueStore>,
    tasks: Vec<Task>,
    preferences: Preferences,
    color_options: &'static [ColorOption],
    theme_observer: Option<Box<dyn ThemeObserver>>,
}

impl TaskStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
            preferences: Preferences::default(),
            color_options: &COLOR_OPTIONS,
            theme_observer: None,
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn set_theme_observer(&mut self, observer: Box<dyn ThemeObserver>) {
        self.theme_observer = Some(observer);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn filter(&self) -> Filter {
        self.preferences.filter
    }

    pub fn sort_by(&self) -> SortBy {
        self.preferences.sort_by
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    pub fn color_options(&self) -> &'static [ColorOption] {
        self.color_options
    }

    /// Filtered and sorted copy of the collection, recomputed on every call.
    pub fn filtered_tasks(&self) -> Vec<Task> {
        let filter = self.preferences.filter;
        let mut result: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        // All sorts are stable; ties keep stored order.
        match self.preferences.sort_by {
            // Missing dates sort as the Unix epoch.
            SortBy::Date => result.sort_by_key(|t| t.due_date.unwrap_or_default()),
            SortBy::Priority => result.sort_by(|a, b| b.priority.cmp(&a.priority)),
            SortBy::Title => result.sort_by(|a, b| compare_titles(&a.title, &b.title)),
            SortBy::Manual => {}
        }

        result
    }

    pub fn get_task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add_task(&mut self, task: Task) -> Result<()> {
        debug!(id = %task.id, "Adding task");
        self.tasks.push(task);
        self.save_tasks()
    }

    pub fn update_task(&mut self, task: Task) -> Result<()> {
        match self.tasks.iter().position(|t| t.id == task.id) {
            Some(index) => {
                debug!(id = %task.id, index, "Updating task");
                self.tasks[index] = task;
                self.save_tasks()
            }
            None => {
                debug!(id = %task.id, "Update for unknown task ignored");
                Ok(())
            }
        }
    }

    /// Removes every task with this id.
    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        debug!(id, removed = before - self.tasks.len(), "Deleted task");
        self.save_tasks()
    }

    pub fn toggle_complete(&mut self, id: &str) -> Result<()> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                debug!(id, completed = task.completed, "Toggled task");
                self.save_tasks()
            }
            None => {
                debug!(id, "Toggle for unknown task ignored");
                Ok(())
            }
        }
    }

    /// Moves the task at `from` so that it ends up at `to`.
    pub fn reorder_tasks(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.tasks.len();
        if let Some(&index) = [from, to].iter().find(|&&i| i >= len) {
            return Err(TaskListError::InvalidIndex { index, len });
        }

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        debug!(from, to, "Reordered tasks");
        self.save_tasks()
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.preferences.filter = filter;
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.preferences.sort_by = sort_by;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.preferences.theme.toggled();
        self.preferences.theme = theme;
        debug!(%theme, "Toggled theme");

        if let Some(observer) = &self.theme_observer {
            observer.theme_changed(theme);
        }
        theme
    }

    /// Writes the whole collection. On failure the in-memory tasks are kept
    /// as they are and the error is returned.
    pub fn save_tasks(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        if let Err(e) = self.storage.set(TASKS_KEY, &json) {
            error!(
                storage = self.storage.name(),
                error = %e,
                "Failed to persist tasks"
            );
            return Err(e);
        }
        debug!(count = self.tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Replaces the collection with the stored one. Absent data leaves the
    /// store untouched; corrupt data is reported and also leaves it untouched.
    pub fn load_tasks(&mut self) -> Result<()> {
        let raw = match self.storage.get(TASKS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                debug!(storage = self.storage.name(), "No stored tasks");
                return Ok(());
            }
        };

        let tasks: Vec<Task> =
            serde_json::from_str(&raw).map_err(|e| TaskListError::CorruptData {
                key: TASKS_KEY.to_string(),
                message: e.to_string(),
            })?;

        info!(storage = self.storage.name(), count = tasks.len(), "Loaded tasks");
        self.tasks = tasks;
        Ok(())
    }

    pub fn save_preferences(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.preferences)?;
        self.storage.set(PREFERENCES_KEY, &json)?;
        debug!(
            filter = %self.preferences.filter,
            sort_by = %self.preferences.sort_by,
            theme = %self.preferences.theme,
            "Saved preferences"
        );
        Ok(())
    }

    /// Unreadable stored preferences are logged and skipped.
    pub fn load_preferences(&mut self) -> Result<()> {
        let Some(raw) = self.storage.get(PREFERENCES_KEY)? else {
            return Ok(());
        };

        match serde_json::from_str::<Preferences>(&raw) {
            Ok(preferences) => {
                self.preferences = preferences;
                if let Some(observer) = &self.theme_observer {
                    observer.theme_changed(preferences.theme);
                }
            }
            Err(e) => warn!(error = %e, "Ignoring unreadable stored preferences"),
        }
        Ok(())
    }
}

// Collation in three levels: base letters with accents and case folded
// away, then accents, then case with lowercase first. Exact text last so
// the order is total.
fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn swap_case(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_lowercase() {
                c.to_uppercase().collect::<Vec<_>>()
            } else {
                c.to_lowercase().collect::<Vec<_>>()
            }
        })
        .collect()
}
