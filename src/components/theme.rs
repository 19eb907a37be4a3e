// ABOUTME: Immutable style options handed to the renderer
// Built once at startup from ThemeConfig; there is no process-wide style state

use ratatui::style::{Color, Modifier, Style};

/// Recognized style options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeConfig {
    pub title: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
    pub highlight: Color,
    pub muted: Color,
    pub bold: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            title: Color::Reset,
            info: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            highlight: Color::Green,
            muted: Color::DarkGray,
            bold: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub title: Style,
    pub info: Style,
    pub success: Style,
    pub error: Style,
    pub highlight: Style,
    pub muted: Style,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        let emphasis = |color: Color| {
            let style = Style::default().fg(color);
            if config.bold {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        };

        Self {
            title: emphasis(config.title),
            info: emphasis(config.info),
            success: emphasis(config.success),
            error: emphasis(config.error),
            highlight: emphasis(config.highlight),
            muted: Style::default().fg(config.muted),
        }
    }

    /// No colors, bold only, for `--no-color` and `NO_COLOR`
    pub fn monochrome() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            title: bold,
            info: bold,
            success: bold,
            error: bold,
            highlight: bold.add_modifier(Modifier::REVERSED),
            muted: Style::default(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
