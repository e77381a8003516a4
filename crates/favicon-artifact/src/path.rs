//! Portable output paths
//!
//! Provides [`OutputPath`], the key under which an asset is stored in the
//! host's asset table. Keys are always forward-slash separated, whatever the
//! host filesystem uses, so the rest of the pipeline sees the same names on
//! every platform.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Path of an asset relative to the bundle output root
///
/// Normalized on construction:
/// - `/` and `\` both separate segments
/// - empty and `.` segments are dropped
/// - `..` removes the preceding segment (leading `..` is kept)
///
/// # Examples
/// - `join("assets", "icon-32.png")` → `assets/icon-32.png`
/// - `join("", "favicons.partial.html")` → `favicons.partial.html`
/// - `join("static\\assets/", "./a.png")` → `static/assets/a.png`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutputPath(String);

impl OutputPath {
    /// Parse and normalize a single path
    ///
    /// # Errors
    /// Returns error if nothing remains after normalization
    pub fn new(path: &str) -> Result<Self, PathError> {
        Self::from_parts(&[path])
    }

    /// Join a directory and a file name, POSIX style
    ///
    /// Unlike POSIX join, `\` is a separator here, never part of a name.
    ///
    /// # Errors
    /// Returns error if the joined path normalizes to nothing
    pub fn join(directory: &str, name: &str) -> Result<Self, PathError> {
        Self::from_parts(&[directory, name])
    }

    fn from_parts(parts: &[&str]) -> Result<Self, PathError> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in parts
            .iter()
            .flat_map(|part| part.split(|c: char| c == '/' || c == '\\'))
        {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.last().is_some_and(|last| *last != "..") {
                        segments.pop();
                    } else {
                        segments.push("..");
                    }
                }
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            return Err(PathError::Empty(parts.join("/")));
        }
        Ok(Self(segments.join("/")))
    }

    /// Path as a forward-slash string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Last segment
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Whether the path climbs above the output root
    #[inline]
    #[must_use]
    pub fn escapes_root(&self) -> bool {
        self.segments().next() == Some("..")
    }

    /// Resolve under a native directory, e.g. the bundle output root
    #[must_use]
    pub fn to_native(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl Display for OutputPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OutputPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OutputPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets tables keyed by OutputPath be queried with plain &str
impl Borrow<str> for OutputPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Errors related to output paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Nothing left after normalization
    #[error("output path '{0}' is empty after normalization")]
    Empty(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn join_directory_and_name() {
        let path = OutputPath::join("assets", "icon-32.png").unwrap();
        assert_eq!(path.as_str(), "assets/icon-32.png");
        assert_eq!(path.file_name(), "icon-32.png");
    }

    #[test]
    fn join_empty_directory() {
        let path = OutputPath::join("", "favicons.partial.html").unwrap();
        assert_eq!(path.as_str(), "favicons.partial.html");
    }

    #[test]
    fn join_nested_directory_with_trailing_slash() {
        let path = OutputPath::join("static/assets/", "apple-touch-icon.png").unwrap();
        assert_eq!(path.as_str(), "static/assets/apple-touch-icon.png");
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        let path = OutputPath::join("static\\assets", "icons\\a.png").unwrap();
        assert_eq!(path.as_str(), "static/assets/icons/a.png");
    }

    #[test]
    fn dot_segments_are_normalized() {
        let path = OutputPath::join("./assets/./icons", "../a.png").unwrap();
        assert_eq!(path.as_str(), "assets/a.png");
    }

    #[test]
    fn leading_parent_segments_are_kept() {
        let path = OutputPath::join("", "../outside.png").unwrap();
        assert_eq!(path.as_str(), "../outside.png");
        assert!(path.escapes_root());
        assert!(!OutputPath::new("assets/a.png").unwrap().escapes_root());
    }

    #[test]
    fn leading_slash_is_relative_to_output_root() {
        let path = OutputPath::new("/assets/a.png").unwrap();
        assert_eq!(path.as_str(), "assets/a.png");
    }

    #[test]
    fn empty_path_rejected() {
        assert!(matches!(OutputPath::join("", ""), Err(PathError::Empty(_))));
        assert!(matches!(OutputPath::new("./"), Err(PathError::Empty(_))));
    }

    #[test]
    fn to_native_resolves_under_root() {
        let path = OutputPath::new("assets/a.png").unwrap();
        let native = path.to_native(Path::new("out"));
        assert_eq!(native, Path::new("out").join("assets").join("a.png"));
    }

    proptest! {
        #[test]
        fn join_of_plain_segments_is_slash_concatenation(
            dir in "[a-z0-9_-]{1,12}(/[a-z0-9_-]{1,12}){0,3}",
            name in "[a-z0-9_-]{1,12}\\.(png|ico|json|xml)",
        ) {
            let path = OutputPath::join(&dir, &name).unwrap();
            prop_assert_eq!(path.as_str(), format!("{dir}/{name}"));
            prop_assert!(!path.as_str().contains('\\'));
            prop_assert!(!path.as_str().contains("//"));
        }
    }
}
