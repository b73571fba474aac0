use crossterm::style::{Color, ContentStyle, Stylize};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::model::Theme;
use crate::store::ThemeObserver;

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    /// Built-in palette for `theme`, replaced by
    /// `<config_dir>/tasklist/themes/<theme>.toml` when that file parses.
    pub fn load(theme: Theme) -> Self {
        Self::try_custom(theme).unwrap_or_else(|| Self::builtin(theme))
    }

    pub fn builtin(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    fn try_custom(theme: Theme) -> Option<Self> {
        let path = Self::custom_path(theme)?;
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        let theme_file: ThemeFile = toml::from_str(&content).ok()?;
        debug!(path = %path.display(), "Loaded custom palette");
        Some(theme_file.colors.into())
    }

    fn custom_path(theme: Theme) -> Option<PathBuf> {
        Some(
            dirs::config_dir()?
                .join("tasklist")
                .join("themes")
                .join(format!("{}.toml", theme)),
        )
    }

    pub fn dark() -> Self {
        Self {
            background: rgb(30, 30, 30),
            foreground: rgb(220, 220, 220),
            accent: rgb(100, 149, 237),
            success: rgb(95, 135, 95),
            warning: rgb(218, 165, 32),
            error: rgb(205, 92, 92),
            muted: rgb(128, 128, 128),
        }
    }

    pub fn light() -> Self {
        Self {
            background: rgb(250, 250, 250),
            foreground: rgb(50, 50, 50),
            accent: rgb(65, 105, 225),
            success: rgb(34, 139, 34),
            warning: rgb(184, 134, 11),
            error: rgb(220, 20, 60),
            muted: rgb(128, 128, 128),
        }
    }

    pub fn style_default(&self) -> ContentStyle {
        ContentStyle::new().with(self.foreground)
    }

    pub fn style_accent(&self) -> ContentStyle {
        ContentStyle::new().with(self.accent)
    }

    pub fn style_success(&self) -> ContentStyle {
        ContentStyle::new().with(self.success)
    }

    pub fn style_warning(&self) -> ContentStyle {
        ContentStyle::new().with(self.warning)
    }

    pub fn style_error(&self) -> ContentStyle {
        ContentStyle::new().with(self.error)
    }

    pub fn style_muted(&self) -> ContentStyle {
        ContentStyle::new().with(self.muted)
    }
}

/// Shared handle to the active palette. The store holds one clone as its
/// theme observer, the renderer reads through another.
pub struct DynamicTheme {
    palette: Arc<RwLock<Palette>>,
}

impl DynamicTheme {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette: Arc::new(RwLock::new(palette)),
        }
    }

    pub fn get(&self) -> Palette {
        self.palette
            .read()
            .map(|p| p.clone())
            .unwrap_or_else(|_| Palette::default())
    }

    pub fn update(&self, palette: Palette) {
        if let Ok(mut current) = self.palette.write() {
            *current = palette;
        }
    }
}

impl Clone for DynamicTheme {
    fn clone(&self) -> Self {
        Self {
            palette: Arc::clone(&self.palette),
        }
    }
}

impl ThemeObserver for DynamicTheme {
    fn theme_changed(&self, theme: Theme) {
        debug!(%theme, "Applying theme");
        self.update(Palette::load(theme));
    }
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct ThemeFile {
    name: Option<String>,
    colors: ColorScheme,
}

#[derive(Debug, Deserialize)]
struct ColorScheme {
    background: String,
    foreground: String,
    accent: String,
    success: String,
    warning: String,
    error: String,
    muted: String,
}

impl From<ColorScheme> for Palette {
    fn from(scheme: ColorScheme) -> Self {
        Self {
            background: hex_to_color(&scheme.background).unwrap_or(Color::Black),
            foreground: hex_to_color(&scheme.foreground).unwrap_or(Color::White),
            accent: hex_to_color(&scheme.accent).unwrap_or(Color::Cyan),
            success: hex_to_color(&scheme.success).unwrap_or(Color::Green),
            warning: hex_to_color(&scheme.warning).unwrap_or(Color::Yellow),
            error: hex_to_color(&scheme.error).unwrap_or(Color::Red),
            muted: hex_to_color(&scheme.muted).unwrap_or(Color::Grey),
        }
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_palettes_differ() {
        assert_ne!(Palette::builtin(Theme::Dark), Palette::builtin(Theme::Light));
        assert_eq!(Palette::default(), Palette::dark());
    }

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#ff8000"), Some(rgb(255, 128, 0)));
        assert_eq!(hex_to_color("a7ffeb"), Some(rgb(167, 255, 235)));
        assert_eq!(hex_to_color("#fff"), None);
        assert_eq!(hex_to_color("#zzzzzz"), None);
        assert_eq!(hex_to_color("#aébcd"), None);
        assert_eq!(hex_to_color("ffé00"), None);
    }

    #[test]
    fn test_color_scheme_falls_back_on_bad_hex() {
        let scheme: ThemeFile = toml::from_str(
            r##"
            [colors]
            background = "#000000"
            foreground = "nope"
            accent = "#112233"
            success = "#00ff00"
            warning = "#ffff00"
            error = "#ff0000"
            muted = "#808080"
            "##,
        )
        .unwrap();
        let palette: Palette = scheme.colors.into();
        assert_eq!(palette.foreground, Color::White);
        assert_eq!(palette.accent, rgb(0x11, 0x22, 0x33));
    }

    #[test]
    fn test_dynamic_theme_clones_share_palette() {
        let theme = DynamicTheme::new(Palette::dark());
        let observer = theme.clone();

        observer.update(Palette::light());

        assert_eq!(theme.get(), Palette::light());
    }
}
