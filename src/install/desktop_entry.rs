// ABOUTME: Desktop entry synthesis for the application launcher

use std::fmt;
use std::path::PathBuf;

/// File suffix launchers look for
pub const DESKTOP_SUFFIX: &str = ".desktop";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub exec: PathBuf,
    pub categories: String,
    pub comment: Option<String>,
    pub icon: Option<String>,
}

impl DesktopEntry {
    /// Empty description or icon are left out of the rendered entry
    pub fn new(
        name: &str,
        exec: PathBuf,
        categories: &str,
        description: &str,
        icon: &str,
    ) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Self {
            name: name.to_string(),
            exec,
            categories: categories.to_string(),
            comment: non_empty(description),
            icon: non_empty(icon),
        }
    }

    /// `My App` becomes `my-app.desktop`; `/` is replaced too so the name stays one path component
    pub fn file_name(&self) -> String {
        let stem: String = self
            .name
            .chars()
            .map(|c| if c == ' ' || c == '/' { '-' } else { c })
            .collect();
        format!("{}{}", stem.to_lowercase(), DESKTOP_SUFFIX)
    }
}

impl fmt::Display for DesktopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Desktop Entry]")?;
        writeln!(f, "Name={}", self.name)?;
        writeln!(f, "Exec={}", self.exec.display())?;
        writeln!(f, "Type=Application")?;
        writeln!(f, "Categories={}", self.categories)?;
        if let Some(comment) = &self.comment {
            writeln!(f, "Comment={comment}")?;
        }
        if let Some(icon) = &self.icon {
            writeln!(f, "Icon={icon}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_entry() {
        let entry = DesktopEntry::new(
            "My App",
            PathBuf::from("/home/u/Apps/App.AppImage"),
            "Utility;",
            "",
            "",
        );

        assert_eq!(
            entry.to_string(),
            "[Desktop Entry]\n\
             Name=My App\n\
             Exec=/home/u/Apps/App.AppImage\n\
             Type=Application\n\
             Categories=Utility;\n"
        );
    }

    #[test]
    fn test_optional_lines_follow_categories() {
        let entry = DesktopEntry::new(
            "Krita",
            PathBuf::from("/opt/krita.AppImage"),
            "Graphics;",
            "Digital painting",
            "/usr/share/icons/krita.png",
        );

        let rendered = entry.to_string();
        let keys: Vec<&str> = rendered
            .lines()
            .skip(1)
            .filter_map(|line| line.split('=').next())
            .collect();
        assert_eq!(keys, vec!["Name", "Exec", "Type", "Categories", "Comment", "Icon"]);
        assert!(rendered.contains("Comment=Digital painting\n"));
        assert!(rendered.contains("Icon=/usr/share/icons/krita.png\n"));
    }

    #[test]
    fn test_file_name() {
        let entry = DesktopEntry::new("My Cool App", PathBuf::from("/x"), "Utility;", "", "");
        assert_eq!(entry.file_name(), "my-cool-app.desktop");
    }

    #[test]
    fn test_file_name_replaces_slashes() {
        let entry = DesktopEntry::new("AC/DC Player", PathBuf::from("/x"), "Utility;", "", "");
        assert_eq!(entry.file_name(), "ac-dc-player.desktop");
    }
}
