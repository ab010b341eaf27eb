use std::path::{self, Path};

/// Helpers that are derived purely from the text of a path and therefore behave the same on
/// every platform.
///
/// Implemented for [`PathEntity`][crate::PathEntity] and for [`Path`], so the same rules apply
/// to entities and to raw paths alike.
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// use path_entity::PathNaming;
///
/// assert_eq!(Path::new("logs/today.txt").name(), "today.txt");
/// assert_eq!(Path::new("logs/").name(), "");
/// assert!(Path::new("").is_invalid());
/// ```
pub trait PathNaming {
    /// The path the helpers operate on.
    fn as_path(&self) -> &Path;

    /// Everything after the last path separator, or the whole path if it has none.
    ///
    /// Unlike [`Path::file_name`], no normalization happens: a path ending with a separator has
    /// an empty name and `a/..` has the name `..`.
    fn name(&self) -> String {
        let text = self.as_path().to_string_lossy();

        text.rsplit(path::is_separator)
            .next()
            .unwrap_or_default()
            .to_owned()
    }

    /// Whether the path can never name a filesystem entry: it is empty or contains a NUL byte.
    ///
    /// Every query or mutation on an invalid path reports the "absent" result without touching
    /// the operating system.
    fn is_invalid(&self) -> bool {
        let bytes = self.as_path().as_os_str().as_encoded_bytes();

        bytes.is_empty() || bytes.contains(&0)
    }
}

impl PathNaming for Path {
    fn as_path(&self) -> &Path {
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn name_is_text_after_last_separator() {
        assert_eq!(Path::new("../x.x").name(), "x.x");
        assert_eq!(Path::new("/tmp/t/sub/b.txt").name(), "b.txt");
        assert_eq!(Path::new("plain").name(), "plain");
    }

    #[test]
    fn name_is_not_normalized() {
        assert_eq!(Path::new("dir/").name(), "");
        assert_eq!(Path::new("a/..").name(), "..");
        assert_eq!(Path::new(".hidden").name(), ".hidden");
    }

    #[cfg(windows)]
    #[test]
    fn name_accepts_both_separators_on_windows() {
        assert_eq!(Path::new(r"C:\data/mixed\file.txt").name(), "file.txt");
        assert_eq!(Path::new("C:/data/file.txt").name(), "file.txt");
    }

    #[test]
    fn empty_and_nul_paths_are_invalid() {
        assert!(Path::new("").is_invalid());
        assert!(Path::new("bad\0name").is_invalid());
        assert!(!Path::new("good name").is_invalid());
        assert!(!Path::new("/").is_invalid());
    }
}
