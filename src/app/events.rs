// ABOUTME: Event handling for keyboard input and the install completion message

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::app::state::{InstallOutcome, StepKind, WizardState};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Quit,
    Confirm,
    InputChar(char),
    Backspace,
    // Browser events
    CursorUp,
    CursorDown,
    ParentDirectory,
    StartSearch,
    CancelSearch,
    SearchChar(char),
    SearchBackspace,
    // Any key on Complete or Error
    Dismiss,
    // Posted by the background pipeline, never by a key
    InstallFinished(InstallOutcome),
}

pub struct EventHandler;

impl EventHandler {
    /// Map a key press to an event for the current step
    pub fn handle_key_event(key_event: KeyEvent, state: &WizardState) -> Option<AppEvent> {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key_event.code == KeyCode::Char('c') {
            return Some(AppEvent::Quit);
        }

        if state.step.is_terminal() {
            return Some(AppEvent::Dismiss);
        }

        if let Some(browser) = state.step.browser() {
            return if browser.search_active {
                Self::search_key(key_event)
            } else {
                Self::browser_key(key_event)
            };
        }

        match key_event.code {
            KeyCode::Esc => Some(AppEvent::Quit),
            _ if state.step.kind() == StepKind::Processing => None,
            KeyCode::Enter => Some(AppEvent::Confirm),
            KeyCode::Backspace => Some(AppEvent::Backspace),
            KeyCode::Char(c) if is_printable(key_event) => Some(AppEvent::InputChar(c)),
            _ => None,
        }
    }

    fn browser_key(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('/') => Some(AppEvent::StartSearch),
            KeyCode::Up | KeyCode::Char('k') => Some(AppEvent::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(AppEvent::CursorDown),
            KeyCode::Enter => Some(AppEvent::Confirm),
            KeyCode::Backspace => Some(AppEvent::ParentDirectory),
            _ => None,
        }
    }

    fn search_key(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::CancelSearch),
            KeyCode::Up => Some(AppEvent::CursorUp),
            KeyCode::Down => Some(AppEvent::CursorDown),
            KeyCode::Enter => Some(AppEvent::Confirm),
            KeyCode::Backspace => Some(AppEvent::SearchBackspace),
            KeyCode::Char(c) if is_printable(key_event) => Some(AppEvent::SearchChar(c)),
            _ => None,
        }
    }

    /// Apply an event to the wizard
    pub fn process_event(event: AppEvent, state: &mut WizardState) {
        debug!("Processing {:?} at {:?}", event, state.step.kind());

        match event {
            AppEvent::Quit | AppEvent::Dismiss => state.quit(),
            AppEvent::Confirm => state.confirm(),
            AppEvent::InputChar(c) => state.input_char(c),
            AppEvent::Backspace => state.backspace(),
            AppEvent::CursorUp => state.browser_move(-1),
            AppEvent::CursorDown => state.browser_move(1),
            AppEvent::ParentDirectory => state.browser_parent(),
            AppEvent::StartSearch => state.browser_start_search(),
            AppEvent::CancelSearch => state.browser_cancel_search(),
            AppEvent::SearchChar(c) => state.browser_search_char(c),
            AppEvent::SearchBackspace => state.browser_search_backspace(),
            AppEvent::InstallFinished(outcome) => state.install_finished(outcome),
        }
    }
}

fn is_printable(key_event: KeyEvent) -> bool {
    !key_event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Step;
    use crate::config::Settings;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state(temp: &TempDir) -> WizardState {
        let settings = Settings {
            config_path: temp.path().join("teabag.conf"),
            registration_dir: temp.path().join("applications"),
            scratch_dir: temp.path().to_path_buf(),
            home_dir: temp.path().to_path_buf(),
            start_dir: temp.path().to_path_buf(),
            no_color: true,
        };
        WizardState::new(None, &settings)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let temp = TempDir::new().unwrap();
        let mut state = state(&temp);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        for step in [Step::AppName, Step::Processing, Step::Error { message: "x".into() }] {
            state.step = step;
            assert!(matches!(
                EventHandler::handle_key_event(ctrl_c, &state),
                Some(AppEvent::Quit)
            ));
        }
    }

    #[test]
    fn test_browser_keys() {
        let temp = TempDir::new().unwrap();
        let state = state(&temp);

        assert!(matches!(
            EventHandler::handle_key_event(key(KeyCode::Char('j')), &state),
            Some(AppEvent::CursorDown)
        ));
        assert!(matches!(
            EventHandler::handle_key_event(key(KeyCode::Char('/')), &state),
            Some(AppEvent::StartSearch)
        ));
        assert!(matches!(
            EventHandler::handle_key_event(key(KeyCode::Backspace), &state),
            Some(AppEvent::ParentDirectory)
        ));
        assert!(EventHandler::handle_key_event(key(KeyCode::Char('x')), &state).is_none());
    }

    #[test]
    fn test_search_mode_keys() {
        let temp = TempDir::new().unwrap();
        let mut state = state(&temp);
        EventHandler::process_event(AppEvent::StartSearch, &mut state);

        assert!(matches!(
            EventHandler::handle_key_event(key(KeyCode::Char('j')), &state),
            Some(AppEvent::SearchChar('j'))
        ));
        assert!(matches!(
            EventHandler::handle_key_event(key(KeyCode::Esc), &state),
            Some(AppEvent::CancelSearch)
        ));
        assert!(matches!(
            EventHandler::handle_key_event(key(KeyCode::Backspace), &state),
            Some(AppEvent::SearchBackspace)
        ));
    }

    #[test]
    fn test_processing_ignores_typing() {
        let temp = TempDir::new().unwrap();
        let mut state = state(&temp);
        state.step = Step::Processing;

        assert!(EventHandler::handle_key_event(key(KeyCode::Char('a')), &state).is_none());
        assert!(EventHandler::handle_key_event(key(KeyCode::Enter), &state).is_none());
    }

    #[test]
    fn test_terminal_step_any_key_exits() {
        let temp = TempDir::new().unwrap();
        let mut state = state(&temp);
        state.step = Step::Error {
            message: "boom".to_string(),
        };

        let event = EventHandler::handle_key_event(key(KeyCode::Char('z')), &state).unwrap();
        EventHandler::process_event(event, &mut state);
        assert!(state.should_quit);
    }

    #[test]
    fn test_text_step_editing() {
        let temp = TempDir::new().unwrap();
        let mut state = state(&temp);
        state.step = Step::Description;

        for code in [KeyCode::Char('h'), KeyCode::Char('i'), KeyCode::Char('!'), KeyCode::Backspace] {
            if let Some(event) = EventHandler::handle_key_event(key(code), &state) {
                EventHandler::process_event(event, &mut state);
            }
        }
        assert_eq!(state.pending_input, "hi");

        let alt_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert!(EventHandler::handle_key_event(alt_x, &state).is_none());
    }
}
