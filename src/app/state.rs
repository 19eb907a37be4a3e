// ABOUTME: Wizard state machine driving the installer
// Steps advance forward only; browser sub-state lives inside the browse steps

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::components::file_browser::{BrowserState, FilterKind, ListError};
use crate::config::{expand_tilde, InstallerConfig, Settings};
use crate::install::{InstallReport, InstallRequest};

/// Preloaded value of the categories step
pub const DEFAULT_CATEGORIES: &str = "Utility;";

/// Separator ending every categories value
pub const CATEGORY_SEPARATOR: char = ';';

/// Typing this alone at the icon step opens the icon browser
const BROWSE_TOKENS: &[&str] = &["b", "B"];

/// Result of the background installation as delivered to the wizard
pub type InstallOutcome = Result<InstallReport, String>;

/// Wizard steps in forward order
#[derive(Debug)]
pub enum Step {
    FileBrowse(BrowserState),
    DirectoryConfig,
    AppName,
    Description,
    Icon,
    IconBrowse(BrowserState),
    Categories,
    Processing,
    Complete(InstallReport),
    Error { message: String },
}

/// Data-free discriminant of `Step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    FileBrowse,
    DirectoryConfig,
    AppName,
    Description,
    Icon,
    IconBrowse,
    Categories,
    Processing,
    Complete,
    Error,
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::FileBrowse(_) => StepKind::FileBrowse,
            Self::DirectoryConfig => StepKind::DirectoryConfig,
            Self::AppName => StepKind::AppName,
            Self::Description => StepKind::Description,
            Self::Icon => StepKind::Icon,
            Self::IconBrowse(_) => StepKind::IconBrowse,
            Self::Categories => StepKind::Categories,
            Self::Processing => StepKind::Processing,
            Self::Complete(_) => StepKind::Complete,
            Self::Error { .. } => StepKind::Error,
        }
    }

    pub fn browser(&self) -> Option<&BrowserState> {
        match self {
            Self::FileBrowse(browser) | Self::IconBrowse(browser) => Some(browser),
            _ => None,
        }
    }

    pub fn browser_mut(&mut self) -> Option<&mut BrowserState> {
        match self {
            Self::FileBrowse(browser) | Self::IconBrowse(browser) => Some(browser),
            _ => None,
        }
    }

    /// Complete and Error; any key exits from here
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error { .. })
    }

    /// Steps that compose `pending_input`
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            Self::DirectoryConfig | Self::AppName | Self::Description | Self::Icon | Self::Categories
        )
    }
}

/// Work the event loop must run outside keystroke handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    RunInstall(InstallRequest),
}

#[derive(Debug)]
pub struct WizardState {
    pub step: Step,
    pub bundle_path: PathBuf,
    pub target_dir: PathBuf,
    pub app_name: String,
    pub description: String,
    pub icon_path: String,
    pub categories: String,
    /// Text being composed by the current step
    pub pending_input: String,
    /// Last validation or runtime error, shown under the current step
    pub error_message: Option<String>,
    /// No configuration file existed at startup
    pub is_first_run: bool,
    pub configured_dir: Option<PathBuf>,
    pub config_path: PathBuf,
    pub home_dir: PathBuf,
    pub default_dir: PathBuf,
    pub pending_async_action: Option<AsyncAction>,
    pub should_quit: bool,
    /// Config file existed but could not be read
    config_error: Option<String>,
    install_dispatched: bool,
}

impl WizardState {
    /// Build the initial state from an optional bundle argument and the config lookup
    pub fn new(bundle_path: Option<PathBuf>, settings: &Settings) -> Self {
        let (configured_dir, config_error) = match InstallerConfig::load(&settings.config_path) {
            Ok(config) => (config.map(|c| c.appimage_dir), None),
            Err(e) => {
                error!("Failed to load config: {}", e);
                (None, Some(format!("Failed to load config: {e}")))
            }
        };
        let is_first_run = configured_dir.is_none() && config_error.is_none();

        let mut state = Self {
            step: Step::Processing,
            bundle_path: PathBuf::new(),
            target_dir: configured_dir.clone().unwrap_or_default(),
            app_name: String::new(),
            description: String::new(),
            icon_path: String::new(),
            categories: DEFAULT_CATEGORIES.to_string(),
            pending_input: String::new(),
            error_message: None,
            is_first_run,
            configured_dir,
            config_path: settings.config_path.clone(),
            home_dir: settings.home_dir.clone(),
            default_dir: settings.default_appimage_dir(),
            pending_async_action: None,
            should_quit: false,
            config_error,
            install_dispatched: false,
        };

        match bundle_path {
            Some(path) => state.accept_bundle(path),
            None => {
                let (browser, listing_error) =
                    BrowserState::open(settings.start_dir.clone(), FilterKind::Bundle);
                state.step = Step::FileBrowse(browser);
                state.record_listing(listing_error.map_or(Ok(()), Err));
            }
        }

        info!("Wizard started at {:?} (first run: {})", state.step.kind(), is_first_run);
        state
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn input_char(&mut self, c: char) {
        if self.step.accepts_text() {
            self.pending_input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.step.accepts_text() {
            self.pending_input.pop();
        }
    }

    /// Enter on a text step
    pub fn confirm(&mut self) {
        match self.step.kind() {
            StepKind::DirectoryConfig => self.confirm_directory(),
            StepKind::AppName => self.confirm_app_name(),
            StepKind::Description => {
                self.description = std::mem::take(&mut self.pending_input);
                self.go_to(Step::Icon);
            }
            StepKind::Icon => self.confirm_icon(),
            StepKind::Categories => self.confirm_categories(),
            StepKind::Complete | StepKind::Error => self.quit(),
            StepKind::FileBrowse | StepKind::IconBrowse => self.browser_select(),
            StepKind::Processing => {}
        }
    }

    pub fn browser_move(&mut self, delta: isize) {
        if let Some(browser) = self.step.browser_mut() {
            browser.move_cursor(delta);
        }
    }

    pub fn browser_start_search(&mut self) {
        if let Some(browser) = self.step.browser_mut() {
            browser.activate_search();
        }
    }

    pub fn browser_cancel_search(&mut self) {
        if let Some(browser) = self.step.browser_mut() {
            browser.deactivate_search();
        }
    }

    pub fn browser_search_char(&mut self, c: char) {
        if let Some(browser) = self.step.browser_mut() {
            browser.type_search_char(c);
        }
    }

    pub fn browser_search_backspace(&mut self) {
        if let Some(browser) = self.step.browser_mut() {
            browser.backspace_search();
        }
    }

    /// Backspace outside search: re-list the parent directory
    pub fn browser_parent(&mut self) {
        let Some(browser) = self.step.browser_mut() else {
            return;
        };
        match browser.enter_parent() {
            Ok(false) => {}
            Ok(true) => self.error_message = None,
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    /// Enter on a browser step: navigate into directories, accept files
    pub fn browser_select(&mut self) {
        let Some(browser) = self.step.browser_mut() else {
            return;
        };
        let Some(entry) = browser.select().cloned() else {
            // Enter always leaves search, even with nothing highlighted
            if browser.search_active {
                browser.deactivate_search();
            }
            return;
        };

        if entry.is_directory {
            let result = browser.enter(entry.path);
            self.record_listing(result);
            return;
        }

        match self.step.kind() {
            StepKind::FileBrowse => {
                info!("Selected AppImage {:?}", entry.path);
                self.accept_bundle(entry.path);
            }
            StepKind::IconBrowse => {
                info!("Selected icon {:?}", entry.path);
                self.icon_path = entry.path.display().to_string();
                self.go_to_categories();
            }
            _ => {}
        }
    }

    /// Apply the single completion message of the installation
    pub fn install_finished(&mut self, outcome: InstallOutcome) {
        if self.step.kind() != StepKind::Processing {
            warn!("Ignoring install outcome outside Processing");
            return;
        }
        match outcome {
            Ok(report) => {
                info!("Installation complete: {:?}", report.desktop_entry_path);
                self.go_to(Step::Complete(report));
            }
            Err(message) => {
                error!("Installation failed: {}", message);
                self.fail(message);
            }
        }
    }

    /// Answers gathered so far, as handed to the pipeline
    pub fn install_request(&self) -> InstallRequest {
        InstallRequest {
            bundle_path: self.bundle_path.clone(),
            target_dir: self.target_dir.clone(),
            app_name: self.app_name.clone(),
            description: self.description.clone(),
            icon_path: self.icon_path.clone(),
            categories: self.categories.clone(),
        }
    }

    fn accept_bundle(&mut self, path: PathBuf) {
        self.bundle_path = path;

        if let Some(message) = self.config_error.clone() {
            self.fail(message);
        } else if let Some(dir) = self.configured_dir.clone() {
            self.target_dir = dir;
            self.go_to(Step::AppName);
        } else {
            self.go_to(Step::DirectoryConfig);
            self.pending_input = self.default_dir.display().to_string();
        }
    }

    fn confirm_directory(&mut self) {
        let input = self.pending_input.trim();
        let dir = if input.is_empty() {
            self.default_dir.clone()
        } else {
            expand_tilde(input, &self.home_dir)
        };

        if let Err(e) = fs::create_dir_all(&dir) {
            self.fail(format!("Failed to create directory: {e}"));
            return;
        }

        if let Err(e) = InstallerConfig::new(dir.clone()).save(&self.config_path) {
            self.fail(format!("Failed to save config: {e}"));
            return;
        }

        info!("AppImage directory set to {:?}", dir);
        self.configured_dir = Some(dir.clone());
        self.target_dir = dir;
        self.go_to(Step::AppName);
    }

    fn confirm_app_name(&mut self) {
        let name = self.pending_input.trim();
        if name.is_empty() {
            self.error_message = Some("Application name is required".to_string());
            return;
        }
        self.app_name = name.to_string();
        self.go_to(Step::Description);
    }

    fn confirm_icon(&mut self) {
        let input = self.pending_input.trim().to_string();

        if BROWSE_TOKENS.contains(&input.as_str()) {
            let (browser, listing_error) =
                BrowserState::open(self.home_dir.clone(), FilterKind::Image);
            self.go_to(Step::IconBrowse(browser));
            self.record_listing(listing_error.map_or(Ok(()), Err));
            return;
        }

        if input.is_empty() {
            self.icon_path.clear();
        } else {
            let path = expand_tilde(&input, &self.home_dir);
            if !path.exists() {
                self.error_message = Some(format!("Icon file not found: {input}"));
                return;
            }
            self.icon_path = path.display().to_string();
        }
        self.go_to_categories();
    }

    fn confirm_categories(&mut self) {
        if self.install_dispatched {
            return;
        }
        self.categories = normalize_categories(&self.pending_input);
        self.go_to(Step::Processing);

        self.install_dispatched = true;
        self.pending_async_action = Some(AsyncAction::RunInstall(self.install_request()));
    }

    fn go_to_categories(&mut self) {
        self.go_to(Step::Categories);
        self.pending_input = DEFAULT_CATEGORIES.to_string();
    }

    fn go_to(&mut self, step: Step) {
        self.step = step;
        self.pending_input.clear();
        self.error_message = None;
    }

    fn fail(&mut self, message: String) {
        self.go_to(Step::Error { message });
    }

    fn record_listing(&mut self, result: Result<(), ListError>) {
        self.error_message = result.err().map(|e| e.to_string());
    }
}

/// Default when empty, otherwise make sure the value ends with `;`
pub fn normalize_categories(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORIES.to_string()
    } else if trimmed.ends_with(CATEGORY_SEPARATOR) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{CATEGORY_SEPARATOR}")
    }
}

/// Display name of the bundle being installed
pub fn bundle_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
