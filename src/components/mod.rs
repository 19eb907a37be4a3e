// ABOUTME: UI components for the installer wizard

pub mod file_browser;
pub mod fuzzy;
pub mod theme;
pub mod wizard;

pub use file_browser::{BrowserState, FileEntry, FilterKind};
pub use fuzzy::FuzzyMatcher;
pub use theme::{Theme, ThemeConfig};
pub use wizard::WizardComponent;
