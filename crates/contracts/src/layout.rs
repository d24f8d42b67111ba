//! OutputLayout - where previews and run logs live under the shared root

use chrono::NaiveDate;
use std::path::{Component, Path, PathBuf};

use crate::SanitizedName;

const PREVIEW_DIR: [&str; 2] = ["img", "cameras_preview"];
const LOG_DIR: [&str; 3] = ["logs", "scripts", "takeRtspSnapshots"];

/// Filesystem layout rooted at the shared site directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/img/cameras_preview`
    pub fn preview_root(&self) -> PathBuf {
        PREVIEW_DIR.iter().fold(self.root.clone(), |p, c| p.join(c))
    }

    /// `<root>/img/cameras_preview/<tenant>`
    ///
    /// `tenant_id` must satisfy [`is_path_segment`] for the result to stay
    /// under the preview root.
    pub fn tenant_dir(&self, tenant_id: &str) -> PathBuf {
        self.preview_root().join(tenant_id)
    }

    /// `<root>/img/cameras_preview/<tenant>/<name>.webp`
    pub fn image_path(&self, tenant_id: &str, name: &SanitizedName) -> PathBuf {
        self.tenant_dir(tenant_id).join(name.file_name())
    }

    /// `<root>/logs/scripts/takeRtspSnapshots`
    pub fn log_dir(&self) -> PathBuf {
        LOG_DIR.iter().fold(self.root.clone(), |p, c| p.join(c))
    }

    /// One log file per calendar day: `<log_dir>/<DD-MM-YYYY>.txt`
    pub fn log_path(&self, date: NaiveDate) -> PathBuf {
        self.log_dir()
            .join(format!("{}.txt", date.format("%d-%m-%Y")))
    }
}

/// Whether `value` is exactly one plain path component.
///
/// Rejects the empty string, `.`/`..`, absolute paths and anything with a
/// separator.
pub fn is_path_segment(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c.to_str() == Some(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize;

    #[test]
    fn test_image_path() {
        let layout = OutputLayout::new("/data");
        let path = layout.image_path("tenant_a", &sanitize("Back Yard"));
        assert_eq!(
            path,
            Path::new("/data/img/cameras_preview/tenant_a/back_yard.webp")
        );
    }

    #[test]
    fn test_log_path_is_day_first() {
        let layout = OutputLayout::new("/data");
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            layout.log_path(date),
            Path::new("/data/logs/scripts/takeRtspSnapshots/07-03-2024.txt")
        );
    }

    #[test]
    fn test_path_segment() {
        assert!(is_path_segment("tenant_a"));
        assert!(is_path_segment("42"));
        assert!(is_path_segment("front_door_-north-"));

        for bad in ["", ".", "..", "/etc", "a/b", "a/", "./a", "../x", "a/."] {
            assert!(!is_path_segment(bad), "accepted {bad:?}");
        }
    }
}
