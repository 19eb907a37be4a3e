// ABOUTME: Navigable directory listing with fuzzy search, used to pick the AppImage and the icon
// Listing is parent entry first, then directories, then files accepted by the filter

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::fuzzy::FuzzyMatcher;

/// Label used for the synthetic parent directory entry
pub const PARENT_ENTRY: &str = "..";

const BUNDLE_EXTENSION: &str = ".appimage";

const IMAGE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".svg", ".ico", ".xpm", ".bmp", ".gif", ".webp",
];

/// Which files a listing keeps (directories are always kept)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Bundle,
    Image,
}

impl FilterKind {
    /// Extension check, case-insensitive
    pub fn accepts(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        match self {
            Self::Bundle => lower.ends_with(BUNDLE_EXTENSION),
            Self::Image => IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)),
        }
    }

    /// What the browser says when a directory has nothing to offer
    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::Bundle => "No .AppImage files or directories found",
            Self::Image => "No image files or directories found",
        }
    }
}

/// One browsable item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
}

impl FileEntry {
    pub fn is_parent(&self) -> bool {
        self.name == PARENT_ENTRY
    }
}

#[derive(Debug, Error)]
#[error("Failed to read directory {}: {source}", path.display())]
pub struct ListError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// List `dir` for the browser.
///
/// Order is `..` (unless `dir` is the filesystem root), then directories,
/// then files accepted by `filter`. Each group is ordered by name.
pub fn list_directory(dir: &Path, filter: FilterKind) -> Result<Vec<FileEntry>, ListError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ListError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut directories = Vec::new();
    let mut files = Vec::new();

    for entry in read_dir.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        let path = entry.path();

        // Follows symlinks so linked folders stay navigable
        if path.is_dir() {
            directories.push(FileEntry {
                name,
                path,
                is_directory: true,
            });
        } else if filter.accepts(&name) {
            files.push(FileEntry {
                name,
                path,
                is_directory: false,
            });
        }
    }

    directories.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));

    let mut entries = Vec::with_capacity(directories.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        entries.push(FileEntry {
            name: PARENT_ENTRY.to_string(),
            path: parent.to_path_buf(),
            is_directory: true,
        });
    }
    entries.extend(directories);
    entries.extend(files);

    debug!("Listed {} entries in {:?}", entries.len(), dir);
    Ok(entries)
}

/// Browser state, embedded in the wizard while a browse step is active
#[derive(Debug)]
pub struct BrowserState {
    pub filter: FilterKind,
    pub current_directory: PathBuf,
    pub all_entries: Vec<FileEntry>,
    pub visible_entries: Vec<FileEntry>,
    pub cursor_index: usize,
    pub search_active: bool,
    pub search_query: String,
    matcher: FuzzyMatcher,
}

impl BrowserState {
    pub fn new(filter: FilterKind) -> Self {
        Self {
            filter,
            current_directory: PathBuf::new(),
            all_entries: Vec::new(),
            visible_entries: Vec::new(),
            cursor_index: 0,
            search_active: false,
            search_query: String::new(),
            matcher: FuzzyMatcher::new(),
        }
    }

    /// Create a browser already listing `directory`, plus the listing error if any
    pub fn open(directory: PathBuf, filter: FilterKind) -> (Self, Option<ListError>) {
        let mut browser = Self::new(filter);
        let error = browser.enter(directory).err();
        (browser, error)
    }

    /// Replace the listing with `directory`'s and reset cursor and search.
    ///
    /// An unreadable directory leaves the browser usable with no entries.
    pub fn enter(&mut self, directory: PathBuf) -> Result<(), ListError> {
        self.cursor_index = 0;
        self.search_active = false;
        self.search_query.clear();

        let listing = list_directory(&directory, self.filter);
        self.current_directory = directory;

        match listing {
            Ok(entries) => {
                self.all_entries = entries;
                self.visible_entries = self.all_entries.clone();
                Ok(())
            }
            Err(e) => {
                warn!("{}", e);
                self.all_entries.clear();
                self.visible_entries.clear();
                Err(e)
            }
        }
    }

    /// Navigate to the parent directory. Returns `Ok(false)` at the root.
    pub fn enter_parent(&mut self) -> Result<bool, ListError> {
        let Some(parent) = self.current_directory.parent().map(Path::to_path_buf) else {
            return Ok(false);
        };
        self.enter(parent)?;
        Ok(true)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.visible_entries.is_empty() {
            self.cursor_index = 0;
            return;
        }
        let last = self.visible_entries.len() - 1;
        self.cursor_index = self.cursor_index.saturating_add_signed(delta).min(last);
    }

    pub fn activate_search(&mut self) {
        self.search_active = true;
        self.search_query.clear();
    }

    pub fn deactivate_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.visible_entries = self.all_entries.clone();
        self.cursor_index = 0;
    }

    pub fn type_search_char(&mut self, ch: char) {
        self.search_query.push(ch);
        self.apply_search();
    }

    pub fn backspace_search(&mut self) {
        if self.search_query.pop().is_some() {
            self.apply_search();
        }
    }

    /// Entry under the cursor, `None` when nothing is visible
    pub fn select(&self) -> Option<&FileEntry> {
        self.visible_entries.get(self.cursor_index)
    }

    /// True when an active query filtered everything out
    pub fn has_no_matches(&self) -> bool {
        self.visible_entries.is_empty() && !self.search_query.is_empty()
    }

    fn apply_search(&mut self) {
        if self.search_query.is_empty() {
            self.visible_entries = self.all_entries.clone();
        } else {
            let labels: Vec<&str> = self.all_entries.iter().map(|e| e.name.as_str()).collect();
            self.visible_entries = self
                .matcher
                .rank(&self.search_query, &labels)
                .into_iter()
                .map(|m| self.all_entries[m.index].clone())
                .collect();
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        if self.cursor_index >= self.visible_entries.len() {
            self.cursor_index = self.visible_entries.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("zeta")).unwrap();
        fs::create_dir(root.join("alpha")).unwrap();
        fs::write(root.join("Krita.AppImage"), "").unwrap();
        fs::write(root.join("editor.appimage"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("logo.PNG"), "").unwrap();
        temp_dir
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_filter_kind_accepts() {
        assert!(FilterKind::Bundle.accepts("App.AppImage"));
        assert!(FilterKind::Bundle.accepts("app.appimage"));
        assert!(!FilterKind::Bundle.accepts("app.AppImage.zip"));
        assert!(FilterKind::Image.accepts("icon.SVG"));
        assert!(FilterKind::Image.accepts("icon.jpeg"));
        assert!(!FilterKind::Image.accepts("icon.tiff"));
    }

    #[test]
    fn test_bundle_listing_order() {
        let temp_dir = fixture();
        let entries = list_directory(temp_dir.path(), FilterKind::Bundle).unwrap();

        assert_eq!(
            names(&entries),
            vec!["..", "alpha", "zeta", "Krita.AppImage", "editor.appimage"]
        );
        assert_eq!(entries[0].path, temp_dir.path().parent().unwrap());
        assert!(entries[0].is_directory);
    }

    #[test]
    fn test_image_listing_filters_files() {
        let temp_dir = fixture();
        let entries = list_directory(temp_dir.path(), FilterKind::Image).unwrap();

        assert_eq!(names(&entries), vec!["..", "alpha", "zeta", "logo.PNG"]);
        for entry in entries.iter().filter(|e| !e.is_directory) {
            assert!(FilterKind::Image.accepts(&entry.name));
        }
    }

    #[test]
    fn test_root_has_no_parent_entry() {
        let entries = list_directory(Path::new("/"), FilterKind::Bundle).unwrap();
        assert!(entries.iter().all(|e| !e.is_parent()));
    }

    #[test]
    fn test_unreadable_directory_leaves_empty_browser() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let (browser, error) = BrowserState::open(missing.clone(), FilterKind::Bundle);
        assert!(error.is_some());
        assert!(browser.visible_entries.is_empty());
        assert_eq!(browser.current_directory, missing);
        assert_eq!(browser.cursor_index, 0);
        assert!(browser.select().is_none());
    }

    #[test]
    fn test_cursor_clamps() {
        let temp_dir = fixture();
        let (mut browser, _) = BrowserState::open(temp_dir.path().to_path_buf(), FilterKind::Bundle);

        browser.move_cursor(-1);
        assert_eq!(browser.cursor_index, 0);

        browser.move_cursor(100);
        assert_eq!(browser.cursor_index, browser.visible_entries.len() - 1);

        browser.move_cursor(-2);
        assert_eq!(browser.cursor_index, browser.visible_entries.len() - 3);
    }

    #[test]
    fn test_search_filters_and_clears() {
        let temp_dir = fixture();
        let (mut browser, _) = BrowserState::open(temp_dir.path().to_path_buf(), FilterKind::Bundle);
        let original = browser.all_entries.clone();

        browser.activate_search();
        for ch in "krita".chars() {
            browser.type_search_char(ch);
        }
        assert_eq!(names(&browser.visible_entries), vec!["Krita.AppImage"]);

        for _ in 0..5 {
            browser.backspace_search();
        }
        assert!(browser.search_query.is_empty());
        assert_eq!(browser.visible_entries, original);
    }

    #[test]
    fn test_search_clamps_cursor_to_last_match() {
        let temp_dir = fixture();
        let (mut browser, _) = BrowserState::open(temp_dir.path().to_path_buf(), FilterKind::Bundle);

        browser.move_cursor(4);
        browser.activate_search();
        browser.type_search_char('z');
        assert_eq!(browser.visible_entries.len(), 1);
        assert_eq!(browser.cursor_index, 0);

        browser.type_search_char('q');
        assert!(browser.has_no_matches());
        assert_eq!(browser.cursor_index, 0);
        assert!(browser.select().is_none());
    }

    #[test]
    fn test_deactivate_search_restores_listing() {
        let temp_dir = fixture();
        let (mut browser, _) = BrowserState::open(temp_dir.path().to_path_buf(), FilterKind::Bundle);

        browser.activate_search();
        browser.type_search_char('e');
        browser.move_cursor(1);
        browser.deactivate_search();

        assert!(!browser.search_active);
        assert!(browser.search_query.is_empty());
        assert_eq!(browser.visible_entries, browser.all_entries);
        assert_eq!(browser.cursor_index, 0);
    }

    #[test]
    fn test_navigation_resets_search() {
        let temp_dir = fixture();
        let (mut browser, _) = BrowserState::open(temp_dir.path().to_path_buf(), FilterKind::Bundle);

        browser.activate_search();
        browser.type_search_char('a');
        browser.enter(temp_dir.path().join("alpha")).unwrap();
        assert!(!browser.search_active);

        assert!(browser.enter_parent().unwrap());
        assert_eq!(browser.current_directory, temp_dir.path());
        assert!(!browser.search_active);
        assert!(browser.search_query.is_empty());
        assert_eq!(browser.visible_entries, browser.all_entries);
    }

    #[test]
    fn test_enter_parent_at_root() {
        let (mut browser, _) = BrowserState::open(PathBuf::from("/"), FilterKind::Image);
        assert!(!browser.enter_parent().unwrap());
        assert_eq!(browser.current_directory, PathBuf::from("/"));
    }
}
