use chrono::{Local, NaiveDate};
use crossterm::style::{ContentStyle, Stylize};
use std::fmt::Display;

use crate::model::{find_color, ColorOption, Task, Theme};
use crate::theme::{hex_to_color, DynamicTheme};

/// Formats tasks for the terminal. Styling is applied only when `styled`
/// is set, so piped output stays plain text.
pub struct Renderer {
    theme: DynamicTheme,
    styled: bool,
}

impl Renderer {
    pub fn new(theme: DynamicTheme, styled: bool) -> Self {
        Self { theme, styled }
    }

    fn paint(&self, style: ContentStyle, text: impl Display) -> String {
        if self.styled {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// One line per task. `numbered` prefixes the 1-based position used by
    /// `move`.
    pub fn task_list(&self, tasks: &[Task], numbered: bool) -> String {
        if tasks.is_empty() {
            return self.paint(self.theme.get().style_muted(), "No tasks found.");
        }

        let today = Local::now().date_naive();
        tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let line = self.task_line(task, today);
                if numbered {
                    format!("{:>3}. {}", i + 1, line)
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn task_line(&self, task: &Task, today: NaiveDate) -> String {
        let palette = self.theme.get();

        let icon = if task.completed {
            self.paint(palette.style_success(), "✓")
        } else {
            self.paint(palette.style_default(), "☐")
        };

        let title = if task.completed {
            self.paint(palette.style_muted().crossed_out(), &task.title)
        } else {
            self.paint(palette.style_default(), &task.title)
        };

        let due = task
            .due_date
            .map(|d| {
                let style = if !task.completed && d < today {
                    palette.style_error()
                } else {
                    palette.style_accent()
                };
                format!(" {}", self.paint(style, format!("(due {})", d)))
            })
            .unwrap_or_default();

        let priority = if task.priority != 0 {
            let style = if task.priority >= 3 {
                palette.style_warning()
            } else {
                palette.style_muted()
            };
            format!(" {}", self.paint(style, format!("[p{}]", task.priority)))
        } else {
            String::new()
        };

        let color = task
            .color
            .as_deref()
            .map(|name| match find_color(name) {
                Some(option) => format!(" {}", self.swatch(option)),
                None => format!(" {{{}}}", name),
            })
            .unwrap_or_default();

        let id = self.paint(palette.style_muted(), format!("[{}]", task.id));

        format!("{} {}{}{}{} {}", icon, title, due, priority, color, id)
    }

    pub fn task_detail(&self, task: &Task) -> String {
        let palette = self.theme.get();
        let label = |name: &str| self.paint(palette.style_accent(), format!("{:<10}", name));

        let mut lines = vec![
            format!("{}{}", label("id"), task.id),
            format!("{}{}", label("title"), task.title),
            format!(
                "{}{}",
                label("status"),
                if task.completed { "completed" } else { "active" }
            ),
            format!("{}{}", label("priority"), task.priority),
        ];
        if let Some(due) = task.due_date {
            lines.push(format!("{}{}", label("due"), due));
        }
        if let Some(color) = &task.color {
            lines.push(format!("{}{}", label("color"), color));
        }
        lines.join("\n")
    }

    pub fn color_line(&self, option: &ColorOption) -> String {
        let pad = " ".repeat(8usize.saturating_sub(option.name.len()));
        format!(
            "{}{} {} on {}",
            self.swatch(option),
            pad,
            option.foreground,
            option.background
        )
    }

    pub fn theme_banner(&self, theme: Theme) -> String {
        let palette = self.theme.get();
        let style = ContentStyle::new()
            .with(palette.foreground)
            .on(palette.background);
        format!("Theme: {}", self.paint(style, format!(" {} ", theme)))
    }

    fn swatch(&self, option: &ColorOption) -> String {
        let mut style = ContentStyle::new();
        if let Some(fg) = hex_to_color(option.foreground) {
            style = style.with(fg);
        }
        if let Some(bg) = hex_to_color(option.background) {
            style = style.on(bg);
        }
        self.paint(style, format!("●{}", option.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::COLOR_OPTIONS;
    use crate::theme::Palette;

    fn plain() -> Renderer {
        Renderer::new(DynamicTheme::new(Palette::dark()), false)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    #[test]
    fn test_plain_task_line() {
        let mut task = Task::new("42", "Buy milk");
        task.due_date = NaiveDate::from_ymd_opt(2026, 1, 12);
        task.priority = 3;
        task.color = Some("teal".into());

        let line = plain().task_line(&task, today());

        assert_eq!(line, "☐ Buy milk (due 2026-01-12) [p3] ●Teal [42]");
    }

    #[test]
    fn test_completed_task_line() {
        let mut task = Task::new("1", "Done thing");
        task.completed = true;
        assert_eq!(plain().task_line(&task, today()), "✓ Done thing [1]");
    }

    #[test]
    fn test_unknown_color_is_shown_verbatim() {
        let mut task = Task::new("1", "x");
        task.color = Some("Mauve".into());
        assert_eq!(plain().task_line(&task, today()), "☐ x {Mauve} [1]");
    }

    #[test]
    fn test_numbered_list() {
        let tasks = vec![Task::new("a", "first"), Task::new("b", "second")];
        let out = plain().task_list(&tasks, true);
        assert!(out.starts_with("  1. "));
        assert!(out.contains("  2. ☐ second"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(plain().task_list(&[], false), "No tasks found.");
    }

    #[test]
    fn test_color_line() {
        let line = plain().color_line(&COLOR_OPTIONS[6]);
        assert_eq!(line, "●Blue     #0b2a5b on #aecbfa");
    }
}
