// ABOUTME: Renders the installer wizard: title, per-step body and key hints

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::file_browser::{BrowserState, FilterKind};
use super::theme::Theme;
use crate::app::state::{bundle_file_name, Step, WizardState};

const TITLE: &str = "Teabag - AppImage Installer";

const COMMON_CATEGORIES: &str =
    "Common categories: Utility, Development, Graphics, Network, Office, AudioVideo, Game";

pub struct WizardComponent;

impl WizardComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &WizardState, theme: &Theme) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Min(3),    // Step body
                Constraint::Length(2), // Key hints
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(TITLE, theme.title))),
            layout[0],
        );

        match &state.step {
            Step::FileBrowse(browser) => {
                self.render_browser(frame, layout[1], state, browser, "Current directory", theme);
            }
            Step::IconBrowse(browser) => self.render_browser(
                frame,
                layout[1],
                state,
                browser,
                "Browsing for icon - Current directory",
                theme,
            ),
            _ => {
                let body = Paragraph::new(self.step_lines(state, theme)).wrap(Wrap { trim: false });
                frame.render_widget(body, layout[1]);
            }
        }

        let hints = Paragraph::new(Line::from(Span::styled(
            Self::key_hints(&state.step),
            theme.muted,
        )));
        frame.render_widget(hints, layout[2]);
    }

    fn step_lines<'a>(&self, state: &'a WizardState, theme: &Theme) -> Vec<Line<'a>> {
        let installing = || {
            Line::from(format!(
                "Installing: {}",
                bundle_file_name(&state.bundle_path)
            ))
        };
        let prompt = |label: &str| Line::from(format!("{label}: {}", state.pending_input));

        let mut lines = match &state.step {
            Step::DirectoryConfig => vec![
                Line::from(Span::styled(
                    "First-time setup: Configure AppImage storage location",
                    theme.info,
                )),
                Line::from(""),
                prompt("Enter AppImage directory path"),
            ],
            Step::AppName => vec![installing(), Line::from(""), prompt("Application name")],
            Step::Description => vec![
                installing(),
                Line::from(""),
                prompt("Description (optional)"),
            ],
            Step::Icon => vec![
                installing(),
                Line::from(""),
                prompt("Icon path (optional, type 'b' to browse)"),
            ],
            Step::Categories => vec![
                installing(),
                Line::from(""),
                Line::from(Span::styled(COMMON_CATEGORIES, theme.info)),
                Line::from(""),
                prompt("Categories (semicolon-separated)"),
            ],
            Step::Processing => vec![Line::from(Span::styled("➜ Processing...", theme.info))],
            Step::Complete(report) => {
                let mut lines = vec![
                    Line::from(Span::styled("✓ Installation complete!", theme.success)),
                    Line::from(""),
                    Line::from(format!("AppImage: {}", report.bundle_path.display())),
                    Line::from(format!(
                        "Desktop entry: {}",
                        report.desktop_entry_path.display()
                    )),
                ];
                if report.used_escalation {
                    lines.push(Line::from(Span::styled(
                        "Registered with administrator privileges",
                        theme.muted,
                    )));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(format!(
                    "{} should now appear in your application launcher",
                    state.app_name
                )));
                lines
            }
            Step::Error { message } => message
                .lines()
                .enumerate()
                .map(|(i, line)| {
                    let text = if i == 0 {
                        format!("✗ Error: {line}")
                    } else {
                        line.to_string()
                    };
                    Line::from(Span::styled(text, theme.error))
                })
                .collect(),
            Step::FileBrowse(_) | Step::IconBrowse(_) => Vec::new(),
        };

        if let Some(error) = &state.error_message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("✗ {error}"), theme.error)));
        }
        lines
    }

    fn render_browser(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &WizardState,
        browser: &BrowserState,
        heading: &str,
        theme: &Theme,
    ) {
        let has_error = state.error_message.is_some();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Directory and search line
                Constraint::Min(1),    // Entries
                Constraint::Length(if has_error { 2 } else { 0 }),
            ])
            .split(area);

        let mut header = vec![Line::from(format!(
            "{heading}: {}",
            browser.current_directory.display()
        ))];
        if browser.search_active {
            header.push(Line::from(format!("Search: {}▌", browser.search_query)));
        }
        frame.render_widget(Paragraph::new(header), layout[0]);

        if browser.visible_entries.is_empty() {
            let message = if browser.has_no_matches() {
                "No matches found"
            } else {
                browser.filter.empty_message()
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(message, theme.info))),
                layout[1],
            );
        } else {
            let file_marker = match browser.filter {
                FilterKind::Bundle => "📄",
                FilterKind::Image => "🖼️",
            };
            let items: Vec<ListItem> = browser
                .visible_entries
                .iter()
                .map(|entry| {
                    let marker = if entry.is_directory { "📁" } else { file_marker };
                    ListItem::new(format!("{marker} {}", entry.name))
                })
                .collect();

            let list = List::new(items)
                .highlight_style(theme.highlight)
                .highlight_symbol("> ");
            let mut list_state = ListState::default().with_selected(Some(browser.cursor_index));
            frame.render_stateful_widget(list, layout[1], &mut list_state);
        }

        if let Some(error) = &state.error_message {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(format!("✗ {error}"), theme.error))),
                layout[2],
            );
        }
    }

    fn key_hints(step: &Step) -> &'static str {
        match step {
            Step::FileBrowse(browser) | Step::IconBrowse(browser) if browser.search_active => {
                "(Type to search, ↑/↓: navigate, Enter: select, Esc: cancel, Ctrl+C: quit)"
            }
            Step::FileBrowse(_) | Step::IconBrowse(_) => {
                "(↑/↓ or j/k: navigate, /: search, Enter: select, Backspace: parent dir, Ctrl+C: quit)"
            }
            Step::DirectoryConfig => "(Press Enter to use default, Ctrl+C to quit)",
            Step::Icon => "(Enter path, 'b' to browse, or Enter to skip)",
            Step::Categories => "(Press Enter to install, Ctrl+C to quit)",
            Step::Processing => "",
            Step::Complete(_) | Step::Error { .. } => "(Press any key to exit)",
            Step::AppName | Step::Description => "(Press Enter to continue, Ctrl+C to quit)",
        }
    }
}

impl Default for WizardComponent {
    fn default() -> Self {
        Self::new()
    }
}
